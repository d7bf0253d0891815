//! Checks run around the stages: input validation before anything is
//! computed, and anomaly/NaN scans of each computed table.

use std::fmt;

use crate::component::TrackedComponent;
use crate::error::GutError;
use crate::lower::LowerTract;
use crate::tables::{Components, Diet, Parameters};
use crate::upper::UpperTract;

/// Tolerance on yield-fraction sums.
const YIELD_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upper,
    Lower,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Upper => "UGI",
            Stage::Lower => "LGI",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    NegativeFlux,
    FractionAboveOne,
}

/// A computed flux outside its physical range. Reported, never corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericAnomaly {
    pub stage: Stage,
    pub component: TrackedComponent,
    pub field: &'static str,
    pub value: f64,
    pub kind: AnomalyKind,
}

impl fmt::Display for NumericAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            AnomalyKind::NegativeFlux => "negative flux",
            AnomalyKind::FractionAboveOne => "fraction above one",
        };
        write!(
            f,
            "{} {} {}: {} ({})",
            self.stage.label(),
            self.component,
            self.field,
            what,
            self.value
        )
    }
}

// ── Input validation ────────────────────────────────────────────────────────

fn invalid(symbol: &str, value: f64, reason: &str) -> GutError {
    GutError::InvalidParameter {
        symbol: symbol.to_string(),
        value,
        reason: reason.to_string(),
    }
}

fn require_non_negative(symbol: &str, value: f64) -> Result<(), GutError> {
    if value < 0.0 {
        return Err(invalid(symbol, value, "must be non-negative"));
    }
    Ok(())
}

fn require_fraction(symbol: &str, value: f64) -> Result<(), GutError> {
    if !value.is_nan() && !(0.0..=1.0).contains(&value) {
        return Err(invalid(symbol, value, "must lie in [0, 1]"));
    }
    Ok(())
}

fn require_yield_sum(substrate: &str, yields: &[f64]) -> Result<(), GutError> {
    let sum: f64 = yields.iter().sum();
    if sum > 1.0 + YIELD_SUM_TOLERANCE {
        return Err(invalid(
            &format!("fa(*)_{substrate}"),
            sum,
            "yield fractions sum above 1",
        ));
    }
    Ok(())
}

/// Every input value must be a finite number. Blank or unparseable table
/// cells arrive here as NaN.
pub fn ensure_finite_inputs(
    params: &Parameters,
    diet: &Diet,
    components: &Components,
) -> Result<(), GutError> {
    for (symbol, value) in params.entries().into_iter().chain(diet.entries()) {
        if !value.is_finite() {
            return Err(invalid(symbol, value, "must be a finite number"));
        }
    }
    for (name, row) in components.entries() {
        for value in [row.gcod_per_gram, row.enthalpy_of_combustion] {
            if !value.is_finite() {
                return Err(invalid(name, value, "conversion factors must be finite"));
            }
        }
    }
    Ok(())
}

/// Domain checks on the three input tables. Returns the first violation
/// found. NaN values pass; [`ensure_finite_inputs`] is the check for those.
pub fn validate_inputs(
    params: &Parameters,
    diet: &Diet,
    components: &Components,
) -> Result<(), GutError> {
    for (symbol, value) in diet.entries() {
        require_non_negative(symbol, value)?;
    }

    let p = params;
    for (symbol, value) in [
        ("bAvSS", p.b_avss),
        ("ARL_AvSS", p.arl_avss),
        ("bprotein", p.b_protein),
        ("ARL_protein", p.arl_protein),
        ("bfat", p.b_fat),
        ("ARL_fat", p.arl_fat),
        ("SIR", p.sir),
        ("GIS_carb", p.gis_carb),
        ("GIS_protein", p.gis_protein),
        ("GIS_fat", p.gis_fat),
        ("q", p.q),
        ("khyd_NSP", p.khyd_nsp),
        ("khyd_RS", p.khyd_rs),
        ("khyd_P", p.khyd_p),
        ("kabs_F", p.kabs_f),
    ] {
        require_non_negative(symbol, value)?;
    }

    for (symbol, value) in [
        ("aAvSS", p.a_avss),
        ("aprotein", p.a_protein),
        ("afat", p.a_fat),
        ("fs0_C", p.fs0_c),
        ("fs0_P", p.fs0_p),
        ("fa(Ac)_C", p.fa_ac_c),
        ("fa(Pr)_C", p.fa_pr_c),
        ("fa(Bu)_C", p.fa_bu_c),
        ("fa(Ac)_P", p.fa_ac_p),
        ("fa(Pr)_P", p.fa_pr_p),
        ("fa(Bu)_P", p.fa_bu_p),
        ("fa(Aro)_P", p.fa_aro_p),
        ("fabs_SCFA", p.fabs_scfa),
        ("fabs_Aro", p.fabs_aro),
    ] {
        require_fraction(symbol, value)?;
    }

    require_yield_sum("C", &[p.fa_ac_c, p.fa_pr_c, p.fa_bu_c])?;
    require_yield_sum("P", &[p.fa_ac_p, p.fa_pr_p, p.fa_bu_p, p.fa_aro_p])?;

    for (name, row) in components.entries() {
        require_non_negative(name, row.gcod_per_gram)?;
        if row.enthalpy_of_combustion <= 0.0 {
            return Err(invalid(
                name,
                row.enthalpy_of_combustion,
                "enthalpy of combustion must be positive",
            ));
        }
    }

    Ok(())
}

// ── Post-stage scans ────────────────────────────────────────────────────────

fn negative(
    stage: Stage,
    component: TrackedComponent,
    fields: &[(&'static str, f64)],
    out: &mut Vec<NumericAnomaly>,
) {
    for &(field, value) in fields {
        if value < 0.0 {
            out.push(NumericAnomaly {
                stage,
                component,
                field,
                value,
                kind: AnomalyKind::NegativeFlux,
            });
        }
    }
}

fn fraction(
    stage: Stage,
    component: TrackedComponent,
    part: f64,
    whole: f64,
    out: &mut Vec<NumericAnomaly>,
) {
    if whole > 0.0 && part / whole > 1.0 {
        out.push(NumericAnomaly {
            stage,
            component,
            field: "absorbed fraction",
            value: part / whole,
            kind: AnomalyKind::FractionAboveOne,
        });
    }
}

/// Negative fluxes and over-unity absorbed fractions in the upper tract.
/// Negative absorption of secretion pools is how secretion is modelled and
/// is not reported.
pub fn upper_anomalies(upper: &UpperTract) -> Vec<NumericAnomaly> {
    let mut out = Vec::new();
    for r in upper.rows() {
        if r.component.is_secretion() {
            negative(
                Stage::Upper,
                r.component,
                &[("Ileocecal_Passage", r.ileocecal_passage)],
                &mut out,
            );
            continue;
        }
        negative(
            Stage::Upper,
            r.component,
            &[
                ("Diet_Input", r.diet_input),
                ("UGI_Absorption", r.absorption),
                ("Ileocecal_Passage", r.ileocecal_passage),
            ],
            &mut out,
        );
        fraction(Stage::Upper, r.component, r.absorption, r.diet_input, &mut out);
    }
    out
}

pub fn lower_anomalies(lower: &LowerTract) -> Vec<NumericAnomaly> {
    let mut out = Vec::new();
    for r in lower.rows() {
        negative(
            Stage::Lower,
            r.component,
            &[
                ("Ileocecal_Passage", r.ileocecal_passage),
                ("LGI_Absorption", r.absorption),
                ("Fecal Output", r.fecal_output),
                ("Microbial_Production", r.production),
                ("Microbial_Conversion", r.conversion),
            ],
            &mut out,
        );
        fraction(Stage::Lower, r.component, r.absorption, r.inflow(), &mut out);
    }
    out
}

/// First non-finite flux in the upper tract, as an error.
pub fn ensure_finite_upper(upper: &UpperTract) -> Result<(), GutError> {
    for r in upper.rows() {
        if ![r.diet_input, r.absorption, r.ileocecal_passage]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(GutError::NonFiniteFlux {
                stage: Stage::Upper.label(),
                component: r.component.label(),
            });
        }
    }
    Ok(())
}

pub fn ensure_finite_lower(lower: &LowerTract) -> Result<(), GutError> {
    for r in lower.rows() {
        if ![
            r.ileocecal_passage,
            r.production,
            r.conversion,
            r.absorption,
            r.fecal_output,
        ]
        .iter()
        .all(|v| v.is_finite())
        {
            return Err(GutError::NonFiniteFlux {
                stage: Stage::Lower.label(),
                component: r.component.label(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upper::tests::{reference_components, reference_diet, reference_parameters};

    fn check(params: &Parameters) -> Result<(), GutError> {
        validate_inputs(params, &reference_diet(), &reference_components())
    }

    #[test]
    fn reference_inputs_are_valid() {
        assert!(check(&reference_parameters()).is_ok());
    }

    #[test]
    fn negative_rate_constant_is_rejected() {
        let mut p = reference_parameters();
        p.khyd_p = -0.1;
        match check(&p) {
            Err(GutError::InvalidParameter { symbol, value, .. }) => {
                assert_eq!(symbol, "khyd_P");
                assert_eq!(value, -0.1);
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn yields_above_one_are_rejected() {
        let mut p = reference_parameters();
        p.fa_ac_c = 0.7;
        let err = check(&p).unwrap_err();
        assert!(matches!(err, GutError::InvalidParameter { symbol, .. } if symbol == "fa(*)_C"));
    }

    #[test]
    fn nan_parameter_passes_domain_checks_but_not_finiteness() {
        let mut p = reference_parameters();
        p.fs0_c = f64::NAN;
        assert!(check(&p).is_ok());
        let err = ensure_finite_inputs(&p, &reference_diet(), &reference_components())
            .unwrap_err();
        assert!(matches!(err, GutError::InvalidParameter { symbol, .. } if symbol == "fs0_C"));
    }

    #[test]
    fn zero_enthalpy_is_rejected() {
        let mut comps = reference_components();
        comps.fat.enthalpy_of_combustion = 0.0;
        let err =
            validate_inputs(&reference_parameters(), &reference_diet(), &comps).unwrap_err();
        assert!(matches!(err, GutError::InvalidParameter { symbol, .. } if symbol == "Fat"));
    }

    #[test]
    fn secretion_absorption_is_not_an_anomaly() {
        let ugi = UpperTract::compute(
            &reference_parameters(),
            &reference_diet(),
            &reference_components(),
        );
        assert!(upper_anomalies(&ugi).is_empty());
    }

    #[test]
    fn negative_efficiency_is_reported() {
        // Slope large enough to push the efficiency negative.
        let mut p = reference_parameters();
        p.b_fat = 4.0;
        let ugi = UpperTract::compute(&p, &reference_diet(), &reference_components());
        let anomalies = upper_anomalies(&ugi);
        assert!(anomalies.iter().any(|a| a.component == TrackedComponent::F
            && a.field == "UGI_Absorption"
            && a.kind == AnomalyKind::NegativeFlux));
        // Passage now exceeds intake, but that alone is not a fraction anomaly.
        assert!(!anomalies
            .iter()
            .any(|a| a.kind == AnomalyKind::FractionAboveOne));
    }

    #[test]
    fn nan_flux_is_found() {
        let mut p = reference_parameters();
        p.sir = f64::NAN;
        let ugi = UpperTract::compute(&p, &reference_diet(), &reference_components());
        let err = ensure_finite_upper(&ugi).unwrap_err();
        assert!(matches!(
            err,
            GutError::NonFiniteFlux { stage: "UGI", component: "AvSS" }
        ));
    }
}
