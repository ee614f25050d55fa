use thiserror::Error;

#[derive(Error, Debug)]
pub enum OdoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, OdoError>;
