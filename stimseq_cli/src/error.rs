use std::io;
use std::path::PathBuf;

use stimseq::config::ConfigError;
use stimseq::orchestrator::GenerateError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("writing output: {0}")]
    Output(#[from] io::Error),

    #[error("invalid {name}={value:?}")]
    Env { name: &'static str, value: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("{failed} of {total} blocks failed verification")]
    VerifyFailed { failed: usize, total: usize },
}

impl CliError {
    /// Process exit code: 2 for usage mistakes, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}
