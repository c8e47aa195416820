use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document store error: {0}")]
    Store(#[from] mongodb::error::Error),

    #[error("BSON encoding error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: missing {field}")]
    MissingConfig { field: String },

    #[error("Configuration error: invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Authentication rejected by the feed (HTTP 403)")]
    AuthRejected,

    #[error("Fetch failed after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    #[error("Document store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("No usable data: {reason}")]
    EmptyData { reason: String },

    #[error("Persistence failed: {message}")]
    Persistence { message: String },
}

impl EtlError {
    /// One-line operator hint shown by the entry point next to the error.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::MissingConfig { .. } | EtlError::InvalidConfigValue { .. } => {
                "Check the environment (.env) and CLI flags"
            }
            EtlError::AuthRejected => "Verify that API_KEY is valid for this feed",
            EtlError::StoreUnavailable { .. } | EtlError::Store(_) | EtlError::Bson(_) => {
                "Check CONNECTION_URI and that the document store is reachable"
            }
            EtlError::AttemptsExhausted { .. } | EtlError::Http(_) => {
                "The feed may be down or rate limiting aggressively; try again later"
            }
            EtlError::EmptyData { .. } => "The feed returned nothing usable; check --resource",
            EtlError::Serialization(_) | EtlError::Persistence { .. } => {
                "Re-run with --verbose for details"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
