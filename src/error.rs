use thiserror::Error;

#[derive(Error, Debug)]
pub enum BugboardError {
    /// Unified failure for any remote operation whose single retry also
    /// failed. Carries a human-readable description of the underlying cause.
    #[error("Something went wrong: {cause}")]
    Remote { cause: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BugboardError>;
