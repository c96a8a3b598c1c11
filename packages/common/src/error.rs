use thiserror::Error;
use trellis_model::PluginError;

/// Common error type that can hold any trellis error
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl From<String> for CommonError {
    fn from(s: String) -> Self {
        CommonError::Generic(s)
    }
}

impl From<&str> for CommonError {
    fn from(s: &str) -> Self {
        CommonError::Generic(s.to_string())
    }
}
