use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("configuration not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("configuration {} is corrupt: {source}", .path.display())]
    ConfigCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no application named {0:?}")]
    UnknownApp(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::ConfigMissing(_))
    }
}

/// Why a launch did not happen. The reason is carried in the `Display` output.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("command is empty")]
    Empty,

    #[error("cannot parse command {0:?}")]
    Parse(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".into()))]
    Exit { command: String, code: Option<i32> },
}

/// Theme problems never leave the theme module; they only decide the fallback.
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("cannot read theme file: {0}")]
    Io(#[from] std::io::Error),

    #[error("theme file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("theme file must hold a JSON object")]
    Shape,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
