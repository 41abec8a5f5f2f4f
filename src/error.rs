use thiserror::Error;

#[derive(Error, Debug)]
pub enum CgpError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Wrong number of inputs: expected {expected}, got {actual}")]
    InputArity { expected: usize, actual: usize },

    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CgpError>;
