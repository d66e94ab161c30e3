//! Error types for model loading, configuration and the frame driver

use std::path::PathBuf;

use crate::driver::FrameState;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model file not found: {0}")]
    MissingModelFile(PathBuf),

    #[error("failed to read model file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed model line {line}: {content:?}")]
    MalformedModelLine { line: usize, content: String },

    #[error("face on line {line} references vertex {index}, but only {available} vertices are loaded")]
    OutOfRangeFaceIndex {
        line: usize,
        index: i64,
        available: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("viewport must be non-empty, got {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("display surface error: {0}")]
    Surface(#[from] std::io::Error),

    #[error("frame driver cannot do that while {0:?}")]
    NotRunning(FrameState),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
