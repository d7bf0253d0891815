//! Lower gastrointestinal tract: microbial hydrolysis and fermentation of
//! the ileocecal passage, product absorption, fat absorption and fecal
//! excretion.
//!
//! The compartment is treated as a continuous stirred reactor with residence
//! time `q`, so first-order kinetics with rate `k` leave an un-reacted
//! residual of `input / (1 + q * k)`.

use polars::prelude::*;

use crate::component::TrackedComponent;
use crate::error::GutError;
use crate::schema::{lower, UNITS_GCOD_PER_DAY};
use crate::tables::Parameters;
use crate::upper::UpperTract;

/// Balance of one component across the lower tract (gCOD/d).
///
/// `ileocecal_passage + production == absorption + conversion + fecal_output`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowerTractFlux {
    pub component: TrackedComponent,
    pub ileocecal_passage: f64,
    /// Formed by the microbiota inside the compartment.
    pub production: f64,
    /// Hydrolysed and handed to fermentation.
    pub conversion: f64,
    pub absorption: f64,
    pub fecal_output: f64,
}

impl LowerTractFlux {
    fn hydrolysed(component: TrackedComponent, passage: f64, residual: f64) -> Self {
        Self {
            component,
            ileocecal_passage: passage,
            production: 0.0,
            conversion: passage - residual,
            absorption: 0.0,
            fecal_output: residual,
        }
    }

    fn absorbed(component: TrackedComponent, passage: f64, residual: f64) -> Self {
        Self {
            component,
            ileocecal_passage: passage,
            production: 0.0,
            conversion: 0.0,
            absorption: passage - residual,
            fecal_output: residual,
        }
    }

    fn product(component: TrackedComponent, production: f64, absorbed_fraction: f64) -> Self {
        let absorption = production * absorbed_fraction;
        Self {
            component,
            ileocecal_passage: 0.0,
            production,
            conversion: 0.0,
            absorption,
            fecal_output: production - absorption,
        }
    }

    /// What enters the row: passage plus in-compartment production.
    pub fn inflow(&self) -> f64 {
        self.ileocecal_passage + self.production
    }

    /// What leaves the row: absorbed, converted and excreted.
    pub fn outflow(&self) -> f64 {
        self.absorption + self.conversion + self.fecal_output
    }
}

/// Un-reacted residual leaving a stirred compartment under first-order kinetics.
pub fn residual(passage: f64, q: f64, k: f64) -> f64 {
    passage / (1.0 + q * k)
}

/// Split of hydrolysed substrate into biomass and soluble products.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fermentation {
    pub biomass_c: f64,
    pub biomass_p: f64,
    pub acetate: f64,
    pub propionate: f64,
    pub n_butyrate: f64,
    pub i_butyrate: f64,
    pub aromatics: f64,
}

impl Fermentation {
    /// Partition pooled hydrolysed carbohydrate and protein. Both substrates
    /// feed acetate and propionate.
    pub fn partition(carbohydrate: f64, protein: f64, params: &Parameters) -> Self {
        let soluble_c = carbohydrate * (1.0 - params.fs0_c);
        let soluble_p = protein * (1.0 - params.fs0_p);

        Self {
            biomass_c: carbohydrate * params.fs0_c,
            biomass_p: protein * params.fs0_p,
            acetate: soluble_c * params.fa_ac_c + soluble_p * params.fa_ac_p,
            propionate: soluble_c * params.fa_pr_c + soluble_p * params.fa_pr_p,
            n_butyrate: soluble_c * params.fa_bu_c,
            i_butyrate: soluble_p * params.fa_bu_p,
            aromatics: soluble_p * params.fa_aro_p,
        }
    }

    pub fn total(&self) -> f64 {
        self.biomass_c
            + self.biomass_p
            + self.acetate
            + self.propionate
            + self.n_butyrate
            + self.i_butyrate
            + self.aromatics
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowerTract {
    rows: Vec<LowerTractFlux>,
    hydrolysed_carbohydrate: f64,
    hydrolysed_protein: f64,
}

impl LowerTract {
    pub fn compute(upper: &UpperTract, params: &Parameters) -> Self {
        use TrackedComponent as C;
        let q = params.q;

        // Only NSP and protein have their own hydrolysis constants; the other
        // carbohydrate pools hydrolyse at the resistant-starch rate.
        let carb_pools = [
            (C::Nsp, params.khyd_nsp),
            (C::Rs, params.khyd_rs),
            (C::AvSs, params.khyd_rs),
            (C::CSec, params.khyd_rs),
        ];
        let protein_pools = [(C::P, params.khyd_p), (C::PSec, params.khyd_p)];
        let fat_pools = [C::F, C::FSec];

        let mut rows = Vec::with_capacity(C::LOWER_TRACT.len());

        let hydrolysed_carbohydrate = hydrolyse_pooled(upper, q, &carb_pools, &mut rows);
        let hydrolysed_protein = hydrolyse_pooled(upper, q, &protein_pools, &mut rows);

        for component in fat_pools {
            let passage = upper.passage(component);
            rows.push(LowerTractFlux::absorbed(
                component,
                passage,
                residual(passage, q, params.kabs_f),
            ));
        }

        let fermentation =
            Fermentation::partition(hydrolysed_carbohydrate, hydrolysed_protein, params);

        // Biomass is excreted, never absorbed.
        rows.push(LowerTractFlux::product(C::XC, fermentation.biomass_c, 0.0));
        rows.push(LowerTractFlux::product(C::XP, fermentation.biomass_p, 0.0));
        rows.push(LowerTractFlux::product(C::Ace, fermentation.acetate, params.fabs_scfa));
        rows.push(LowerTractFlux::product(C::Prop, fermentation.propionate, params.fabs_scfa));
        rows.push(LowerTractFlux::product(C::NBut, fermentation.n_butyrate, params.fabs_scfa));
        rows.push(LowerTractFlux::product(C::IBut, fermentation.i_butyrate, params.fabs_scfa));
        rows.push(LowerTractFlux::product(C::Aro, fermentation.aromatics, params.fabs_aro));

        let tract = Self {
            rows,
            hydrolysed_carbohydrate,
            hydrolysed_protein,
        };
        log::debug!(
            "LGI: hydrolysed carbohydrate {:.4}, protein {:.4}, absorbed {:.4}, fecal {:.4} gCOD/d",
            tract.hydrolysed_carbohydrate,
            tract.hydrolysed_protein,
            tract.total_absorption(),
            tract.total_fecal_output()
        );
        tract
    }

    pub fn rows(&self) -> &[LowerTractFlux] {
        &self.rows
    }

    pub fn get(&self, component: TrackedComponent) -> Option<&LowerTractFlux> {
        self.rows.iter().find(|r| r.component == component)
    }

    /// Pooled hydrolysed carbohydrate feeding fermentation (gCOD/d).
    pub fn hydrolysed_carbohydrate(&self) -> f64 {
        self.hydrolysed_carbohydrate
    }

    /// Pooled hydrolysed protein feeding fermentation (gCOD/d).
    pub fn hydrolysed_protein(&self) -> f64 {
        self.hydrolysed_protein
    }

    pub fn total_absorption(&self) -> f64 {
        self.rows.iter().map(|r| r.absorption).sum()
    }

    pub fn total_fecal_output(&self) -> f64 {
        self.rows.iter().map(|r| r.fecal_output).sum()
    }

    /// Output table: Component, Ileocecal_Passage, LGI_Absorption,
    /// Fecal Output, Microbial_Production, Microbial_Conversion, Units.
    pub fn to_frame(&self) -> Result<DataFrame, GutError> {
        let labels: Vec<&str> = self.rows.iter().map(|r| r.component.label()).collect();
        let column = |f: fn(&LowerTractFlux) -> f64| -> Vec<f64> {
            self.rows.iter().map(f).collect()
        };
        let units = vec![UNITS_GCOD_PER_DAY; self.rows.len()];

        let df = DataFrame::new(vec![
            Column::new(lower::COMPONENT.into(), labels),
            Column::new(
                lower::ILEOCECAL_PASSAGE.into(),
                column(|r| r.ileocecal_passage),
            ),
            Column::new(lower::LGI_ABSORPTION.into(), column(|r| r.absorption)),
            Column::new(lower::FECAL_OUTPUT.into(), column(|r| r.fecal_output)),
            Column::new(lower::MICROBIAL_PRODUCTION.into(), column(|r| r.production)),
            Column::new(lower::MICROBIAL_CONVERSION.into(), column(|r| r.conversion)),
            Column::new(lower::UNITS.into(), units),
        ])?;
        Ok(df)
    }
}

/// Hydrolyse a group of pools, pushing one row per pool. Returns the pooled
/// hydrolysed amount: total passage minus the sum of residuals.
fn hydrolyse_pooled(
    upper: &UpperTract,
    q: f64,
    pools: &[(TrackedComponent, f64)],
    rows: &mut Vec<LowerTractFlux>,
) -> f64 {
    let mut total_passage = 0.0;
    let mut total_residual = 0.0;
    for &(component, k) in pools {
        let passage = upper.passage(component);
        let left = residual(passage, q, k);
        total_passage += passage;
        total_residual += left;
        rows.push(LowerTractFlux::hydrolysed(component, passage, left));
    }
    total_passage - total_residual
}
