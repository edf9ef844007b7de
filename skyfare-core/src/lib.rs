pub mod search;
pub mod app_config;

pub use search::{AirportLabel, FareClass, SearchForm, SearchRequest, TripType};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

pub type CoreResult<T> = Result<T, CoreError>;
