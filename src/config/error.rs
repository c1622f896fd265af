use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or parse a config file or an injected table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {} as YAML", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid binding or builtin table")]
    Table(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Whether the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
