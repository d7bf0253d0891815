use crate::lower::LowerTract;
use crate::upper::UpperTract;

/// Metabolizable-energy equivalent: everything absorbed in either tract
/// (gCOD/d). NaN in any absorption row reaches the total.
pub fn metabolizable_energy(upper: &UpperTract, lower: &LowerTract) -> f64 {
    upper.total_absorption() + lower.total_absorption()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upper::tests::{reference_components, reference_diet, reference_parameters};
    use approx::assert_relative_eq;

    #[test]
    fn total_does_not_depend_on_summation_order() {
        let params = reference_parameters();
        let ugi = UpperTract::compute(&params, &reference_diet(), &reference_components());
        let lgi = LowerTract::compute(&ugi, &params);

        let reversed: f64 = lgi.rows().iter().rev().map(|r| r.absorption).sum::<f64>()
            + ugi.rows().iter().rev().map(|r| r.absorption).sum::<f64>();

        assert_relative_eq!(metabolizable_energy(&ugi, &lgi), reversed, max_relative = 1e-9);
    }
}
