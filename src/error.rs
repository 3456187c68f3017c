use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("unknown command or API: {name}")]
    UnknownCommand {
        name: String,
        suggestions: Vec<String>,
    },
    #[error("discovery payload carries no API list")]
    MalformedDiscovery,
    #[error("{message}")]
    Remote {
        message: String,
        /// Decoded body that accompanied the failure, if any; rendered
        /// before the error is surfaced.
        partial: Option<Value>,
    },
    #[error("async job {job_id} failed")]
    JobFailed {
        job_id: String,
        partial: Option<Value>,
    },
    #[error("async job {job_id} timed out after {seconds}s")]
    JobTimeout { job_id: String, seconds: u64 },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// The decoded response body carried by a remote failure, if one was
    /// produced before the call failed.
    #[must_use]
    pub const fn partial_body(&self) -> Option<&Value> {
        match self {
            Self::Remote { partial, .. } | Self::JobFailed { partial, .. } => partial.as_ref(),
            _ => None,
        }
    }
}
