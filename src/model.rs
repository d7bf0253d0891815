use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::error::GutError;
use crate::pipeline::{self, NanPolicy, PipelineOptions};
use crate::schema::input;
use crate::tables::{load_csv, Components, Diet, Parameters};

#[pyclass]
pub struct GutModel {
    base_path: PathBuf,
    parameters: Option<Parameters>,
    diet: Option<Diet>,
    components: Option<Components>,
    anomalies: Vec<String>,
}

#[pymethods]
impl GutModel {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            base_path: PathBuf::from(base_path),
            parameters: None,
            diet: None,
            components: None,
            anomalies: Vec::new(),
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load the parameters CSV.
    ///
    /// Required columns: Symbol, Value. Other columns (Description, Units,
    /// Note) are kept in the returned frame but ignored.
    #[pyo3(signature = (filename=None))]
    fn load_parameters(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = load_csv(self.base_path.join(filename.unwrap_or(input::PARAMETERS_FILE)))?;
        self.parameters = Some(Parameters::from_frame(&df)?);
        Ok(PyDataFrame(df))
    }

    /// Load the dietary input CSV.
    ///
    /// Required columns: Symbol, Value. Required symbols: NSP, RS, AvSS, PI, FI, CI.
    #[pyo3(signature = (filename=None))]
    fn load_diet(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = load_csv(self.base_path.join(filename.unwrap_or(input::DIET_FILE)))?;
        self.diet = Some(Diet::from_frame(&df)?);
        Ok(PyDataFrame(df))
    }

    /// Load the components CSV.
    ///
    /// Required columns: Compound, gCOD/g, Enthalpy of Combustion.
    /// Required rows: Carbohydrate, Protein, Fat.
    #[pyo3(signature = (filename=None))]
    fn load_components(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let df = load_csv(self.base_path.join(filename.unwrap_or(input::COMPONENTS_FILE)))?;
        self.components = Some(Components::from_frame(&df)?);
        Ok(PyDataFrame(df))
    }

    fn set_parameters(&mut self, df: PyDataFrame) -> PyResult<()> {
        self.parameters = Some(Parameters::from_frame(&df.0)?);
        Ok(())
    }

    fn set_diet(&mut self, df: PyDataFrame) -> PyResult<()> {
        self.diet = Some(Diet::from_frame(&df.0)?);
        Ok(())
    }

    fn set_components(&mut self, df: PyDataFrame) -> PyResult<()> {
        self.components = Some(Components::from_frame(&df.0)?);
        Ok(())
    }

    // ── Mass balance ────────────────────────────────────────────────────────

    /// Run the upper tract, lower tract and ME aggregation.
    ///
    /// Returns `(ugi, lgi, me)`: the two flux tables and the
    /// metabolizable-energy equivalent in gCOD/d. With `propagate_nan=True`
    /// NaN inputs are carried through instead of raising.
    #[pyo3(signature = (propagate_nan=false))]
    fn run(&mut self, propagate_nan: bool) -> PyResult<(PyDataFrame, PyDataFrame, f64)> {
        let parameters = self
            .parameters
            .as_ref()
            .ok_or_else(|| GutError::NotLoaded("parameters".into()))?;
        let diet = self
            .diet
            .as_ref()
            .ok_or_else(|| GutError::NotLoaded("diet".into()))?;
        let components = self
            .components
            .as_ref()
            .ok_or_else(|| GutError::NotLoaded("components".into()))?;

        let options = PipelineOptions {
            nan_policy: if propagate_nan {
                NanPolicy::Propagate
            } else {
                NanPolicy::Fatal
            },
        };

        let balance = pipeline::run(parameters, diet, components, options)?;
        self.anomalies = balance.anomalies.iter().map(|a| a.to_string()).collect();

        Ok((
            PyDataFrame(balance.upper.to_frame()?),
            PyDataFrame(balance.lower.to_frame()?),
            balance.metabolizable_energy,
        ))
    }

    // ── Properties ──────────────────────────────────────────────────────────

    /// Numeric anomalies found by the last `run`.
    #[getter]
    fn anomalies(&self) -> Vec<String> {
        self.anomalies.clone()
    }

    #[getter]
    fn is_loaded(&self) -> bool {
        self.parameters.is_some() && self.diet.is_some() && self.components.is_some()
    }
}
