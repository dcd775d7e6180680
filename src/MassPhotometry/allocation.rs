//! Conversion of resolved concentrations into particle counts.
//!
//! Counts are proportional to the concentration of each observable particle, normalized by
//! the sum of the concentrations actually competing in that condition (not by the nominal
//! total), so the fractions stay well defined under small numeric drift of the resolver.
use super::sim_errors::{SimulationError, ensure_positive};
use serde::{Deserialize, Serialize};

/// How a fractional expected count becomes an integer sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountRounding {
    /// toward zero, the behaviour of an `int()` cast on the expected count
    #[default]
    Truncate,
    RoundHalfUp,
}

impl CountRounding {
    /// Integer sample size for `expected` particles. Negative and NaN values give 0.
    pub fn sample_size(&self, expected: f64) -> usize {
        let value = match self {
            CountRounding::Truncate => expected.trunc(),
            CountRounding::RoundHalfUp => (expected + 0.5).floor(),
        };
        // float -> usize casts saturate: negatives and NaN become 0
        value as usize
    }
}

/// Expected and allocated number of particles of one species in one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesAllocation {
    pub species: String,
    pub fraction: f64,
    pub expected: f64,
    pub allocated: usize,
}

/// Fractions of `concentrations` relative to their sum.
pub fn particle_fractions(concentrations: &[f64]) -> Result<Vec<f64>, SimulationError> {
    let total: f64 = concentrations.iter().sum();
    ensure_positive("sum of species concentrations", total)?;
    Ok(concentrations.iter().map(|c| c / total).collect())
}

/// Splits a budget of `total_counts` particles between `species` in proportion to their
/// concentrations.
pub fn allocate_counts(
    species: &[&str],
    concentrations: &[f64],
    total_counts: usize,
    rounding: CountRounding,
) -> Result<Vec<SpeciesAllocation>, SimulationError> {
    if species.len() != concentrations.len() {
        return Err(SimulationError::InvalidParameter(format!(
            "{} species names for {} concentrations",
            species.len(),
            concentrations.len()
        )));
    }
    let fractions = particle_fractions(concentrations)?;
    let allocation = species
        .iter()
        .zip(fractions)
        .map(|(name, fraction)| {
            let expected = total_counts as f64 * fraction;
            SpeciesAllocation {
                species: name.to_string(),
                fraction,
                expected,
                allocated: rounding.sample_size(expected),
            }
        })
        .collect();
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_truncation_toward_zero() {
        let rounding = CountRounding::Truncate;
        assert_eq!(rounding.sample_size(1079.99), 1079);
        assert_eq!(rounding.sample_size(0.7), 0);
        assert_eq!(rounding.sample_size(-3.2), 0);
        assert_eq!(rounding.sample_size(f64::NAN), 0);
    }

    #[test]
    fn test_round_half_up() {
        let rounding = CountRounding::RoundHalfUp;
        assert_eq!(rounding.sample_size(1079.5), 1080);
        assert_eq!(rounding.sample_size(1079.49), 1079);
        assert_eq!(rounding.sample_size(-0.4), 0);
    }

    #[test]
    fn test_fractions_use_competing_sum() {
        let fractions = particle_fractions(&[1e-9, 3e-9]).unwrap();
        assert_relative_eq!(fractions[0], 0.25, epsilon = 1e-15);
        assert_relative_eq!(fractions[1], 0.75, epsilon = 1e-15);
    }

    #[test]
    fn test_counts_stay_within_budget() {
        let concentrations = [2.2e-9, 0.37e-9, 1.41e-9];
        let allocation = allocate_counts(
            &["A", "B", "AB"],
            &concentrations,
            3200,
            CountRounding::Truncate,
        )
        .unwrap();
        let total: usize = allocation.iter().map(|a| a.allocated).sum();
        assert!(total <= 3200);
        assert!(3200 - total <= allocation.len());
        let fraction_sum: f64 = allocation.iter().map(|a| a.fraction).sum();
        assert_relative_eq!(fraction_sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_concentration_gives_zero_count() {
        let allocation =
            allocate_counts(&["M", "D"], &[1e-9, 0.0], 1800, CountRounding::Truncate).unwrap();
        assert_eq!(allocation[0].allocated, 1800);
        assert_eq!(allocation[1].allocated, 0);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = allocate_counts(&["M"], &[1e-9, 2e-9], 1800, CountRounding::Truncate);
        assert!(matches!(result, Err(SimulationError::InvalidParameter(_))));
        assert!(particle_fractions(&[0.0, 0.0]).is_err());
    }
}
