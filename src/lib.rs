//! Steady-state gCOD mass balance of dietary carbohydrate, protein and fat
//! through an upper-tract (host absorption) and lower-tract (microbial
//! fermentation) compartment.

pub mod aggregate;
pub mod component;
pub mod error;
pub mod lower;
pub mod pipeline;
pub mod schema;
pub mod tables;
pub mod upper;
pub mod validation;

#[cfg(feature = "python")]
mod model;

pub use aggregate::metabolizable_energy;
pub use component::TrackedComponent;
pub use error::GutError;
pub use lower::{LowerTract, LowerTractFlux};
pub use pipeline::{run, MassBalance, NanPolicy, PipelineOptions};
pub use tables::{load_csv, Components, Diet, Macronutrient, Parameters};
pub use upper::{UpperTract, UpperTractFlux};
pub use validation::NumericAnomaly;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Export schema constants as Python submodules
#[cfg(feature = "python")]
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Output columns
    let columns = PyModule::new(m.py(), "columns")?;
    columns.add("COMPONENT", schema::upper::COMPONENT)?;
    columns.add("DIET_INPUT", schema::upper::DIET_INPUT)?;
    columns.add("UGI_ABSORPTION", schema::upper::UGI_ABSORPTION)?;
    columns.add("ILEOCECAL_PASSAGE", schema::upper::ILEOCECAL_PASSAGE)?;
    columns.add("LGI_ABSORPTION", schema::lower::LGI_ABSORPTION)?;
    columns.add("FECAL_OUTPUT", schema::lower::FECAL_OUTPUT)?;
    columns.add(
        "MICROBIAL_PRODUCTION",
        schema::lower::MICROBIAL_PRODUCTION,
    )?;
    columns.add(
        "MICROBIAL_CONVERSION",
        schema::lower::MICROBIAL_CONVERSION,
    )?;
    columns.add("UNITS", schema::upper::UNITS)?;
    m.add_submodule(&columns)?;

    // Tracked components
    let components = PyModule::new(m.py(), "components")?;
    for c in TrackedComponent::LOWER_TRACT {
        components.add(c.label().to_uppercase(), c.label())?;
    }
    m.add_submodule(&components)?;

    m.add("UNITS_GCOD_PER_DAY", schema::UNITS_GCOD_PER_DAY)?;
    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "_core")]
fn gut_balance_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<model::GutModel>()?;
    add_schema_exports(m)?;
    Ok(())
}
