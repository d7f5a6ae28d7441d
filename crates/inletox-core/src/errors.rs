use thiserror::Error;

/// Error type for invalid inputs and configuration.
///
/// Missing or masked data is not an error: it travels through the
/// calculations as NaN. These variants are reserved for inputs with the
/// wrong shape or for lookups that cannot succeed.
#[derive(Error, Debug)]
pub enum InletError {
    #[error("{0}")]
    Error(String),
    #[error("Inlet '{0}' is not present in the {1} records")]
    MissingInlet(String, String),
    #[error("Quantity '{quantity}' is missing for inlet '{inlet}'")]
    MissingQuantity { inlet: String, quantity: String },
    #[error("Unsupported filter kernel '{0}'. Expected 'hanning' or 'godin'")]
    InvalidKernelKind(String),
    #[error("Filter kernel length must be at least 1, got {0}")]
    InvalidKernelLength(usize),
    #[error("Series '{name}' has {actual} samples but at least {expected} are required")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid month window table: {0}")]
    InvalidMonthWindows(String),
    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),
    #[error("Not enough data: {0}")]
    InsufficientData(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Could not parse configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Could not parse dataset: {0}")]
    Dataset(#[from] serde_json::Error),
}

/// Convenience type for `Result<T, InletError>`.
pub type InletResult<T> = Result<T, InletError>;
