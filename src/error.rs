#[cfg(feature = "python")]
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GutError {
    #[error("Table not loaded: {0}")]
    NotLoaded(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Missing symbol '{symbol}' in {table} table")]
    MissingSymbol { table: &'static str, symbol: String },

    #[error("Invalid parameter '{symbol}' = {value}: {reason}")]
    InvalidParameter {
        symbol: String,
        value: f64,
        reason: String,
    },

    #[error("Non-finite {stage} flux for component {component}")]
    NonFiniteFlux {
        stage: &'static str,
        component: &'static str,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "python")]
impl From<GutError> for PyErr {
    fn from(err: GutError) -> PyErr {
        match err {
            GutError::MissingSymbol { .. } | GutError::MissingColumn(_) => {
                PyKeyError::new_err(err.to_string())
            }
            GutError::InvalidParameter { .. } => PyValueError::new_err(err.to_string()),
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}
