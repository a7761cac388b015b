use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),

    #[error("Record payload error: {0}")]
    Records(#[from] field_resolver::ResolverError),
}

pub type EngineResult<T> = Result<T, ComplianceError>;
