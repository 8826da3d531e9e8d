use thiserror::Error;

#[derive(Error, Debug)]
pub enum VancoError {
    /// An input field is non-positive or non-finite
    #[error("Invalid input: {field} = {value}")]
    InvalidInput { field: String, value: f64 },

    /// The simulation grid cannot be evaluated within bounds
    #[error("Invalid simulation grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("Error reading settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Error installing the log subscriber: {0}")]
    Logger(#[from] tracing_subscriber::util::TryInitError),

    #[error("Error serializing to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error writing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VancoError {
    pub(crate) fn invalid_input(field: &str, value: f64) -> Self {
        VancoError::InvalidInput {
            field: field.to_string(),
            value,
        }
    }
}

/// Fail with [`VancoError::InvalidInput`] unless `value` is finite and strictly positive
pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<(), VancoError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VancoError::invalid_input(field, value))
    }
}
