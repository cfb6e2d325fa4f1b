//! Cross-platform application paths

use std::path::{Path, PathBuf};

use crate::error::CliError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// Locate the per-user config directory. Nothing is created on disk.
    pub fn new() -> Result<Self, CliError> {
        let base = dirs::config_dir().ok_or(CliError::NoConfigDir)?;
        Ok(Self::with_base(&base))
    }

    pub fn with_base(base: &Path) -> Self {
        Self {
            config_dir: base.join("stimseq"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_under_app_dir() {
        let paths = AppPaths::with_base(Path::new("/tmp/cfg"));
        assert_eq!(paths.config_dir(), Path::new("/tmp/cfg/stimseq"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/cfg/stimseq/config.json")
        );
    }
}
