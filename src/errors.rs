use std::result::Result as StdResult;

use gestor_config::ConfigError;
use gestor_core::CoreError;
use thiserror::Error;

/// Unified error type for the service, storage and configuration layers.
#[derive(Error, Debug)]
pub enum GestorError {
    #[error("Company not found: {0}")]
    CompanyNotFound(String),
    #[error("Client not found: {0}")]
    ClientNotFound(String),
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Import failed: {0}")]
    Import(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, GestorError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] GestorError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for GestorError {
    fn from(err: std::io::Error) -> Self {
        GestorError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for GestorError {
    fn from(err: serde_json::Error) -> Self {
        GestorError::StorageError(err.to_string())
    }
}

impl From<CoreError> for GestorError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CompanyNotFound(id) => GestorError::CompanyNotFound(id),
            CoreError::ClientNotFound(id) => GestorError::ClientNotFound(id),
            CoreError::EmployeeNotFound(id) => GestorError::EmployeeNotFound(id),
            CoreError::Validation(message) | CoreError::InvalidOperation(message) => {
                GestorError::InvalidInput(message)
            }
            CoreError::Import(message) => GestorError::Import(message),
            CoreError::Storage(message) | CoreError::Serde(message) => {
                GestorError::StorageError(message)
            }
            CoreError::Io(err) => GestorError::StorageError(err.to_string()),
        }
    }
}

impl From<ConfigError> for GestorError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => GestorError::StorageError(io.to_string()),
            ConfigError::Serde(message) => GestorError::ConfigError(message),
            invalid @ ConfigError::InvalidSetting { .. } => {
                GestorError::InvalidInput(invalid.to_string())
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(GestorError::from(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(GestorError::from(err))
    }
}
