use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown device parameter '{0}'")]
    UnknownParameter(String),

    #[error("Parameter '{name}' must be finite, got {value}")]
    NonFiniteParameter { name: String, value: f64 },

    #[error("Reference depth limit ({depth}) exceeded while flattening '{structure}'")]
    RecursionLimit { structure: String, depth: usize },

    #[error("Device generation failed: {0}")]
    Device(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
