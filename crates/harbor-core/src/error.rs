use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarborError {
    #[error("unable to load from '{}': it is not a directory or a file", .0.display())]
    UnsupportedPath(PathBuf),

    #[error("failed to decode '{source_id}': {reason}")]
    Decode { source_id: String, reason: String },

    #[error("'{}' exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to start '{program}': {reason}")]
    ToolSpawnFailed { program: String, reason: String },

    #[error("'{program}' exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("no environment fetcher registered as '{name}' (known: {known})")]
    UnknownFetcher { name: String, known: String },

    #[error("bot failed: {0}")]
    Bot(String),

    #[error("template '{}' failed to render: {reason}", .path.display())]
    Template { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarborError>;
