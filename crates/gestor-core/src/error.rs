use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Company not found: {0}")]
    CompanyNotFound(String),
    #[error("Client not found: {0}")]
    ClientNotFound(String),
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Import failed: {0}")]
    Import(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
