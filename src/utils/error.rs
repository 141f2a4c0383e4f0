use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid price pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Access denied by {url}")]
    AccessDenied { url: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("State file {path} is corrupt: {source}")]
    StateCorrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Parsing error: {message}")]
    Parse { message: String },
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
