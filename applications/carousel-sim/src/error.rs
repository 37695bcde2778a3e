/// Simulator error types
use crate::script::ScriptError;
use carousel_core::CarouselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Carousel error: {0}")]
    Carousel(#[from] CarouselError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for SimError {
    fn from(e: config::ConfigError) -> Self {
        SimError::Config(e.to_string())
    }
}
