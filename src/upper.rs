//! Upper gastrointestinal tract: dietary conversion to gCOD/d and host
//! absorption ahead of the ileocecal junction.

use polars::prelude::*;

use crate::component::TrackedComponent;
use crate::error::GutError;
use crate::schema::{upper, UNITS_GCOD_PER_DAY};
use crate::tables::{Components, Diet, Parameters};

/// Balance of one component across the upper tract (gCOD/d).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpperTractFlux {
    pub component: TrackedComponent,
    pub diet_input: f64,
    /// Negative for secretion pools.
    pub absorption: f64,
    pub ileocecal_passage: f64,
}

impl UpperTractFlux {
    fn new(component: TrackedComponent, diet_input: f64, absorption: f64) -> Self {
        Self {
            component,
            diet_input,
            absorption,
            ileocecal_passage: diet_input - absorption,
        }
    }
}

/// Absorbed share of a dietary pool: baseline `a`, reduced by `b` per unit
/// of transit ratio above the threshold `arl`. The excess is floored at zero
/// so the reduction never raises absorption above `a`.
pub fn absorption_efficiency(a: f64, b: f64, sir: f64, arl: f64) -> f64 {
    let excess = sir - arl;
    // NaN must reach the caller, so no f64::max here.
    let excess = if excess < 0.0 { 0.0 } else { excess };
    a - b * excess
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpperTract {
    rows: Vec<UpperTractFlux>,
}

impl UpperTract {
    pub fn compute(params: &Parameters, diet: &Diet, components: &Components) -> Self {
        let carb = components.carbohydrate.cod_factor();
        let protein = components.protein.cod_factor();
        let fat = components.fat.cod_factor();

        let nsp_in = diet.nsp * diet.ci * carb;
        let rs_in = diet.rs * diet.ci * carb;
        let avss_in = diet.avss * diet.ci * carb;
        let p_in = diet.pi * protein;
        let f_in = diet.fi * fat;

        let avss_abs = avss_in
            * absorption_efficiency(params.a_avss, params.b_avss, params.sir, params.arl_avss);
        let p_abs = p_in
            * absorption_efficiency(
                params.a_protein,
                params.b_protein,
                params.sir,
                params.arl_protein,
            );
        let f_abs =
            f_in * absorption_efficiency(params.a_fat, params.b_fat, params.sir, params.arl_fat);

        // Secretions are net additions to the lumen: negative absorption.
        let c_sec_abs = -params.gis_carb * components.carbohydrate.gcod_per_gram;
        let p_sec_abs = -params.gis_protein * components.protein.gcod_per_gram;
        let f_sec_abs = -params.gis_fat * components.fat.gcod_per_gram;

        use TrackedComponent as C;
        let rows = vec![
            UpperTractFlux::new(C::Nsp, nsp_in, 0.0),
            UpperTractFlux::new(C::Rs, rs_in, 0.0),
            UpperTractFlux::new(C::AvSs, avss_in, avss_abs),
            UpperTractFlux::new(C::CSec, 0.0, c_sec_abs),
            UpperTractFlux::new(C::P, p_in, p_abs),
            UpperTractFlux::new(C::PSec, 0.0, p_sec_abs),
            UpperTractFlux::new(C::F, f_in, f_abs),
            UpperTractFlux::new(C::FSec, 0.0, f_sec_abs),
        ];

        let tract = Self { rows };
        log::debug!(
            "UGI: diet input {:.4} gCOD/d, absorbed {:.4} gCOD/d",
            tract.rows.iter().map(|r| r.diet_input).sum::<f64>(),
            tract.total_absorption()
        );
        tract
    }

    pub fn rows(&self) -> &[UpperTractFlux] {
        &self.rows
    }

    pub fn get(&self, component: TrackedComponent) -> Option<&UpperTractFlux> {
        self.rows.iter().find(|r| r.component == component)
    }

    /// Ileocecal passage of `component`, zero if the upper tract does not carry it.
    pub fn passage(&self, component: TrackedComponent) -> f64 {
        self.get(component).map_or(0.0, |r| r.ileocecal_passage)
    }

    pub fn total_absorption(&self) -> f64 {
        self.rows.iter().map(|r| r.absorption).sum()
    }

    /// Output table: Component, Diet_Input, UGI_Absorption, Ileocecal_Passage, Units.
    pub fn to_frame(&self) -> Result<DataFrame, GutError> {
        let labels: Vec<&str> = self.rows.iter().map(|r| r.component.label()).collect();
        let diet_input: Vec<f64> = self.rows.iter().map(|r| r.diet_input).collect();
        let absorption: Vec<f64> = self.rows.iter().map(|r| r.absorption).collect();
        let passage: Vec<f64> = self.rows.iter().map(|r| r.ileocecal_passage).collect();
        let units = vec![UNITS_GCOD_PER_DAY; self.rows.len()];

        let df = DataFrame::new(vec![
            Column::new(upper::COMPONENT.into(), labels),
            Column::new(upper::DIET_INPUT.into(), diet_input),
            Column::new(upper::UGI_ABSORPTION.into(), absorption),
            Column::new(upper::ILEOCECAL_PASSAGE.into(), passage),
            Column::new(upper::UNITS.into(), units),
        ])?;
        Ok(df)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tables::Macronutrient;
    use approx::assert_relative_eq;

    pub(crate) fn reference_parameters() -> Parameters {
        Parameters {
            a_avss: 0.98,
            b_avss: 0.1,
            arl_avss: 1.0,
            a_protein: 0.9,
            b_protein: 0.05,
            arl_protein: 1.0,
            a_fat: 0.95,
            b_fat: 0.08,
            arl_fat: 1.0,
            sir: 1.5,
            gis_carb: 2.0,
            gis_protein: 10.0,
            gis_fat: 3.0,
            q: 1.5,
            khyd_nsp: 0.8,
            khyd_rs: 4.0,
            khyd_p: 2.0,
            kabs_f: 3.0,
            fs0_c: 0.25,
            fs0_p: 0.2,
            fa_ac_c: 0.55,
            fa_pr_c: 0.25,
            fa_bu_c: 0.2,
            fa_ac_p: 0.4,
            fa_pr_p: 0.2,
            fa_bu_p: 0.2,
            fa_aro_p: 0.2,
            fabs_scfa: 0.95,
            fabs_aro: 0.0,
        }
    }

    pub(crate) fn reference_diet() -> Diet {
        Diet {
            nsp: 350.0,
            rs: 90.0,
            avss: 4200.0,
            pi: 1500.0,
            fi: 2600.0,
            ci: 1.0,
        }
    }

    pub(crate) fn reference_components() -> Components {
        Components {
            carbohydrate: Macronutrient::new(1.185, 17.3),
            protein: Macronutrient::new(1.42, 23.6),
            fat: Macronutrient::new(2.87, 39.3),
        }
    }

    #[test]
    fn efficiency_is_baseline_below_threshold() {
        assert_eq!(absorption_efficiency(0.9, 0.5, 0.8, 1.0), 0.9);
        assert_eq!(absorption_efficiency(0.9, 0.5, 1.0, 1.0), 0.9);
    }

    #[test]
    fn efficiency_drops_above_threshold() {
        assert_relative_eq!(absorption_efficiency(0.9, 0.5, 1.4, 1.0), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn efficiency_propagates_nan() {
        assert!(absorption_efficiency(0.9, 0.5, f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn diet_conversion_uses_intercept_only_for_carbohydrate() {
        let mut diet = reference_diet();
        diet.ci = 2.0;
        let comps = reference_components();
        let ugi = UpperTract::compute(&reference_parameters(), &diet, &comps);

        let nsp = ugi.get(TrackedComponent::Nsp).unwrap();
        assert_relative_eq!(nsp.diet_input, 350.0 * 2.0 * 1.185 / 17.3, max_relative = 1e-12);
        let p = ugi.get(TrackedComponent::P).unwrap();
        assert_relative_eq!(p.diet_input, 1500.0 * 1.42 / 23.6, max_relative = 1e-12);
    }

    #[test]
    fn fibre_is_not_absorbed() {
        let ugi = UpperTract::compute(
            &reference_parameters(),
            &reference_diet(),
            &reference_components(),
        );
        for c in [TrackedComponent::Nsp, TrackedComponent::Rs] {
            let row = ugi.get(c).unwrap();
            assert_eq!(row.absorption, 0.0);
            assert_eq!(row.ileocecal_passage, row.diet_input);
        }
    }

    #[test]
    fn secretions_pass_more_than_they_receive() {
        let ugi = UpperTract::compute(
            &reference_parameters(),
            &reference_diet(),
            &reference_components(),
        );
        let p_sec = ugi.get(TrackedComponent::PSec).unwrap();
        assert_eq!(p_sec.diet_input, 0.0);
        assert_relative_eq!(p_sec.absorption, -10.0 * 1.42, max_relative = 1e-12);
        assert_relative_eq!(p_sec.ileocecal_passage, 14.2, max_relative = 1e-12);
    }

    #[test]
    fn protein_absorption_uses_reduced_efficiency() {
        let ugi = UpperTract::compute(
            &reference_parameters(),
            &reference_diet(),
            &reference_components(),
        );
        let p = ugi.get(TrackedComponent::P).unwrap();
        // 0.9 - 0.05 * (1.5 - 1.0)
        assert_relative_eq!(p.absorption, p.diet_input * 0.875, max_relative = 1e-12);
    }

    #[test]
    fn every_row_balances() {
        let ugi = UpperTract::compute(
            &reference_parameters(),
            &reference_diet(),
            &reference_components(),
        );
        assert_eq!(ugi.rows().len(), 8);
        for r in ugi.rows() {
            assert_relative_eq!(
                r.diet_input,
                r.absorption + r.ileocecal_passage,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn frame_has_contract_columns() {
        let ugi = UpperTract::compute(
            &reference_parameters(),
            &reference_diet(),
            &reference_components(),
        );
        let df = ugi.to_frame().unwrap();
        assert_eq!(df.height(), 8);
        assert_eq!(
            df.get_column_names_str(),
            vec!["Component", "Diet_Input", "UGI_Absorption", "Ileocecal_Passage", "Units"]
        );
        let units = df.column(upper::UNITS).unwrap().str().unwrap();
        assert_eq!(units.get(0), Some("gCOD/d"));
    }
}
