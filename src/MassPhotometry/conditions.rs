//! Experimental conditions.
//!
//! A condition carries its nominal concentration (used for labels and file names) and the
//! perturbed concentration used by the physics. The perturbation is a uniform
//! multiplicative error drawn once, when the condition list is built.
use super::random_source::SimRng;
use super::sim_errors::{SimulationError, ensure_positive};
use rand::Rng;

/// nM -> M
pub const NANOMOLAR: f64 = 1e-9;

/// Total concentrations (M) used in the equilibrium computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionTotals {
    Homodimer { monomer_total: f64 },
    Heterocomplex { a_total: f64, b_total: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// position in the input list
    pub index: usize,
    /// unperturbed concentration of the titrated species, nM
    pub nominal_nm: f64,
    /// built from `nominal_nm`, never from the perturbed value
    pub label: String,
    pub totals: ConditionTotals,
}

/// `4nM`, `0.5nM`
pub fn homodimer_label(nominal_nm: f64) -> String {
    format!("{}nM", nominal_nm)
}

/// `B_1.000nM`
pub fn heterocomplex_label(nominal_nm: f64) -> String {
    format!("B_{:.3}nM", nominal_nm)
}

fn check_perturbation(perturbation: f64) -> Result<(), SimulationError> {
    if perturbation.is_finite() && (0.0..1.0).contains(&perturbation) {
        Ok(())
    } else {
        Err(SimulationError::InvalidParameter(format!(
            "perturbation must lie in [0, 1), got {}",
            perturbation
        )))
    }
}

/// Multiplies `value` by `1 + U(-perturbation, perturbation)`.
pub fn perturb(value: f64, perturbation: f64, rng: &mut SimRng) -> f64 {
    if perturbation == 0.0 {
        return value;
    }
    value * (1.0 + rng.random_range(-perturbation..perturbation))
}

/// One condition per total monomer concentration (nM), in input order.
pub fn homodimer_conditions(
    concentrations_nm: &[f64],
    perturbation: f64,
    rng: &mut SimRng,
) -> Result<Vec<Condition>, SimulationError> {
    check_perturbation(perturbation)?;
    if concentrations_nm.is_empty() {
        return Err(SimulationError::InvalidParameter(
            "no monomer concentrations given".to_string(),
        ));
    }
    for &c in concentrations_nm {
        ensure_positive("total monomer concentration", c)?;
    }
    let conditions = concentrations_nm
        .iter()
        .enumerate()
        .map(|(index, &nominal_nm)| Condition {
            index,
            nominal_nm,
            label: homodimer_label(nominal_nm),
            totals: ConditionTotals::Homodimer {
                monomer_total: perturb(nominal_nm * NANOMOLAR, perturbation, rng),
            },
        })
        .collect();
    Ok(conditions)
}

/// One condition per total B concentration (nM) against a fixed total A (M).
///
/// The B perturbations are drawn first, in input order, followed by a single perturbation
/// of A shared by every condition.
pub fn heterocomplex_conditions(
    a_concentration_molar: f64,
    b_concentrations_nm: &[f64],
    perturbation: f64,
    rng: &mut SimRng,
) -> Result<Vec<Condition>, SimulationError> {
    check_perturbation(perturbation)?;
    ensure_positive("total A concentration", a_concentration_molar)?;
    if b_concentrations_nm.is_empty() {
        return Err(SimulationError::InvalidParameter(
            "no B concentrations given".to_string(),
        ));
    }
    for &c in b_concentrations_nm {
        ensure_positive("total B concentration", c)?;
    }
    let b_totals: Vec<f64> = b_concentrations_nm
        .iter()
        .map(|&c| perturb(c * NANOMOLAR, perturbation, rng))
        .collect();
    let a_total = perturb(a_concentration_molar, perturbation, rng);

    let conditions = b_concentrations_nm
        .iter()
        .zip(b_totals)
        .enumerate()
        .map(|(index, (&nominal_nm, b_total))| Condition {
            index,
            nominal_nm,
            label: heterocomplex_label(nominal_nm),
            totals: ConditionTotals::Heterocomplex { a_total, b_total },
        })
        .collect();
    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MassPhotometry::random_source::rng_from_seed;

    #[test]
    fn test_label_ignores_perturbation() {
        let mut rng = rng_from_seed(5);
        let conditions = homodimer_conditions(&[4.0], 0.03, &mut rng).unwrap();
        assert_eq!(conditions[0].label, "4nM");
        let ConditionTotals::Homodimer { monomer_total } = conditions[0].totals else {
            panic!("expected homodimer totals");
        };
        assert!((monomer_total / 4e-9 - 1.0).abs() <= 0.03);
    }

    #[test]
    fn test_label_formats() {
        assert_eq!(homodimer_label(4.0), "4nM");
        assert_eq!(homodimer_label(0.5), "0.5nM");
        assert_eq!(heterocomplex_label(1.0), "B_1.000nM");
        assert_eq!(heterocomplex_label(0.125), "B_0.125nM");
    }

    #[test]
    fn test_heterocomplex_shares_a_total() {
        let mut rng = rng_from_seed(9);
        let conditions =
            heterocomplex_conditions(5e-9, &[0.125, 1.0, 8.0], 0.02, &mut rng).unwrap();
        let a_totals: Vec<f64> = conditions
            .iter()
            .map(|c| match c.totals {
                ConditionTotals::Heterocomplex { a_total, .. } => a_total,
                ConditionTotals::Homodimer { .. } => panic!("expected heterocomplex totals"),
            })
            .collect();
        assert!(a_totals.iter().all(|&a| a == a_totals[0]));
        assert!((a_totals[0] / 5e-9 - 1.0).abs() <= 0.02);
        assert_eq!(conditions[2].label, "B_8.000nM");
    }

    #[test]
    fn test_zero_perturbation_is_exact() {
        let mut rng = rng_from_seed(1);
        let conditions = homodimer_conditions(&[2.0], 0.0, &mut rng).unwrap();
        assert_eq!(
            conditions[0].totals,
            ConditionTotals::Homodimer {
                monomer_total: 2.0 * NANOMOLAR
            }
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = rng_from_seed(1);
        assert!(homodimer_conditions(&[], 0.03, &mut rng).is_err());
        assert!(homodimer_conditions(&[1.0, -2.0], 0.03, &mut rng).is_err());
        assert!(homodimer_conditions(&[1.0], 1.5, &mut rng).is_err());
        assert!(heterocomplex_conditions(0.0, &[1.0], 0.02, &mut rng).is_err());
    }
}
