use thiserror::Error;

/// Fatal configuration problems. Any of these aborts a run before fetching.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no usable sources found in {0}")]
    NoSources(String),

    #[error("no keyword rules found in {0}")]
    EmptyKeywords(String),
}
