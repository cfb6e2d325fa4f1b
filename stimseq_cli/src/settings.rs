//! Layered run settings: defaults, settings file, environment, flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stimseq::config::{ExecutionTier, RunConfig};
use stimseq::export::Format;
use tracing::warn;

use crate::args::Overrides;
use crate::error::CliError;

pub const ENV_SEED: &str = "STIMSEQ_SEED";
pub const ENV_EXEC_TIER: &str = "STIMSEQ_EXEC_TIER";

/// On-disk settings file. Every field is optional.
///
/// ```json
/// { "ordinary_categories": 2, "presentations_per_category": 6, "blocks": 30,
///   "seed": 7, "tier": "parallel", "format": "column" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    #[serde(flatten)]
    pub run: RunConfig,
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub run: RunConfig,
    pub format: Format,
    /// Settings file that was read, if any.
    pub source: Option<PathBuf>,
}

/// Read a settings file.
pub fn load_file(path: &Path) -> Result<SettingsFile, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve settings from all layers.
///
/// An explicit `--config` must exist; the per-user default file is only read
/// when present.
pub fn resolve(
    overrides: &Overrides,
    default_file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, CliError> {
    let (file, source) = match (&overrides.config, default_file) {
        (Some(explicit), _) => (load_file(explicit)?, Some(explicit.clone())),
        (None, Some(path)) if path.is_file() => (load_file(path)?, Some(path.to_path_buf())),
        _ => (SettingsFile::default(), None),
    };

    let mut run = file.run;
    let mut format = match file.format.as_deref() {
        Some(raw) => Format::parse(raw)
            .ok_or_else(|| CliError::Usage(format!("unknown format in settings file: {raw}")))?,
        None => Format::default(),
    };

    apply_env(&mut run, &env)?;

    let seq = &mut run.sequence;
    if let Some(k) = overrides.categories {
        seq.ordinary_categories = k;
    }
    if let Some(p) = overrides.presentations {
        seq.presentations_per_category = p;
    }
    if let Some(n) = overrides.blocks {
        run.blocks = n;
    }
    if let Some(seed) = overrides.seed {
        run.seed = Some(seed);
    }
    if let Some(tier) = overrides.tier {
        run.tier = tier;
    }
    if let Some(f) = overrides.format {
        format = f;
    }

    Ok(Settings {
        run,
        format,
        source,
    })
}

fn apply_env(run: &mut RunConfig, env: &impl Fn(&str) -> Option<String>) -> Result<(), CliError> {
    if let Some(v) = env(ENV_SEED) {
        let seed = v.trim().parse().map_err(|_| CliError::Env {
            name: ENV_SEED,
            value: v.clone(),
        })?;
        run.seed = Some(seed);
    }

    // Values: sequential|parallel. Unknown values are ignored with a warning.
    if let Some(v) = env(ENV_EXEC_TIER) {
        match ExecutionTier::parse(&v) {
            Some(t) => run.tier = t,
            None => warn!("Unknown {} value: {}", ENV_EXEC_TIER, v),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use stimseq::config::SequenceConfig;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "stimseq-{}-{}.json",
            name,
            std::process::id()
        ));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_without_any_layer() {
        let s = resolve(&Overrides::default(), None, no_env).unwrap();
        assert_eq!(s.run, RunConfig::default());
        assert_eq!(s.format, Format::List);
        assert_eq!(s.source, None);
    }

    #[test]
    fn missing_default_file_is_ignored() {
        let path = std::env::temp_dir().join("stimseq-definitely-missing.json");
        let s = resolve(&Overrides::default(), Some(&path), no_env).unwrap();
        assert_eq!(s.source, None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let o = Overrides {
            config: Some(PathBuf::from("/nonexistent/stimseq.json")),
            ..Default::default()
        };
        assert!(matches!(
            resolve(&o, None, no_env),
            Err(CliError::Read { .. })
        ));
    }

    #[test]
    fn file_then_env_then_flags() {
        let path = temp_file(
            "layers",
            r#"{ "ordinary_categories": 3, "presentations_per_category": 4,
                 "blocks": 5, "seed": 1, "format": "column" }"#,
        );
        let o = Overrides {
            config: Some(path.clone()),
            blocks: Some(9),
            ..Default::default()
        };
        let env = |name: &str| match name {
            ENV_SEED => Some("77".to_string()),
            ENV_EXEC_TIER => Some("parallel".to_string()),
            _ => None,
        };

        let s = resolve(&o, None, env).unwrap();
        assert_eq!(s.run.sequence, SequenceConfig::new(3, 4));
        assert_eq!(s.run.blocks, 9);
        assert_eq!(s.run.seed, Some(77));
        assert_eq!(s.run.tier, ExecutionTier::Parallel);
        assert_eq!(s.format, Format::Column);
        assert_eq!(s.source, Some(path.clone()));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn bad_env_seed_is_rejected() {
        let env = |name: &str| (name == ENV_SEED).then(|| "soon".to_string());
        assert!(matches!(
            resolve(&Overrides::default(), None, env),
            Err(CliError::Env { name: ENV_SEED, .. })
        ));
    }

    #[test]
    fn unknown_env_tier_is_ignored() {
        let env = |name: &str| (name == ENV_EXEC_TIER).then(|| "gpu".to_string());
        let s = resolve(&Overrides::default(), None, env).unwrap();
        assert_eq!(s.run.tier, ExecutionTier::Sequential);
    }

    #[test]
    fn malformed_file_reports_path() {
        let path = temp_file("malformed", "{ not json");
        let o = Overrides {
            config: Some(path.clone()),
            ..Default::default()
        };
        match resolve(&o, None, no_env) {
            Err(CliError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
        let _ = fs::remove_file(path);
    }
}
