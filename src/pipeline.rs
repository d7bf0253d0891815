//! One steady-state run: validation → upper tract → lower tract → ME total.

use crate::aggregate::metabolizable_energy;
use crate::error::GutError;
use crate::lower::LowerTract;
use crate::tables::{Components, Diet, Parameters};
use crate::upper::UpperTract;
use crate::validation::{self, NumericAnomaly};

/// What to do when a value is NaN or infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NanPolicy {
    /// Reject non-finite inputs and computed fluxes.
    #[default]
    Fatal,
    /// Let non-finite values flow through to the ME total.
    Propagate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub nan_policy: NanPolicy,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct MassBalance {
    pub upper: UpperTract,
    pub lower: LowerTract,
    /// gCOD/d
    pub metabolizable_energy: f64,
    pub anomalies: Vec<NumericAnomaly>,
}

pub fn run(
    params: &Parameters,
    diet: &Diet,
    components: &Components,
    options: PipelineOptions,
) -> Result<MassBalance, GutError> {
    let fatal = options.nan_policy == NanPolicy::Fatal;

    if fatal {
        validation::ensure_finite_inputs(params, diet, components)?;
    }
    validation::validate_inputs(params, diet, components)?;

    let upper = UpperTract::compute(params, diet, components);
    if fatal {
        validation::ensure_finite_upper(&upper)?;
    }

    let lower = LowerTract::compute(&upper, params);
    if fatal {
        validation::ensure_finite_lower(&lower)?;
    }

    let mut anomalies = validation::upper_anomalies(&upper);
    anomalies.extend(validation::lower_anomalies(&lower));
    for anomaly in &anomalies {
        log::warn!("Numeric anomaly: {anomaly}");
    }

    let me = metabolizable_energy(&upper, &lower);
    log::info!("Metabolizable energy: {me:.4} gCOD/d");

    Ok(MassBalance {
        upper,
        lower,
        metabolizable_energy: me,
        anomalies,
    })
}
