use thiserror::Error;

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("inbox I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize inbox record {url}: {source}")]
    Serialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
