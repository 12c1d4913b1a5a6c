use thiserror::Error;

pub type CrmResult<T> = Result<T, CrmError>;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CrmError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CrmError::Validation(msg.into())
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CrmError::Config(_) => "config_error",
            CrmError::Validation(_) => "validation_error",
            CrmError::NotFound(_) => "not_found",
            CrmError::Auth(_) => "auth_failed",
            CrmError::ExternalService(_) => "external_service_error",
            CrmError::Serialization(_) => "serialization_error",
            CrmError::Internal(_) => "internal_error",
        }
    }
}

impl From<config::ConfigError> for CrmError {
    fn from(e: config::ConfigError) -> Self {
        CrmError::Config(e.to_string())
    }
}
