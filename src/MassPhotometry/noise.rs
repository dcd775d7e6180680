//! Gaussian measurement noise.
use super::random_source::SimRng;
use super::sim_errors::SimulationError;
use super::species::Species;
use rand_distr::{Distribution, Normal};

/// Draws `count` masses (kDa) of `species` from N(mass, cv·mass). A count of zero yields an
/// empty vector without touching the generator.
pub fn synthesize_masses(
    species: &Species,
    count: usize,
    rng: &mut SimRng,
) -> Result<Vec<f64>, SimulationError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let normal = Normal::new(species.mass_kda, species.std_kda()).map_err(|e| {
        SimulationError::Distribution(format!(
            "N({}, {}) for {}: {}",
            species.mass_kda,
            species.std_kda(),
            species.name,
            e
        ))
    })?;
    Ok((0..count).map(|_| normal.sample(rng)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MassPhotometry::random_source::rng_from_seed;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_count_is_empty() {
        let species = Species::new("Monomer", 80.0, 0.16).unwrap();
        let mut rng = rng_from_seed(1);
        assert!(synthesize_masses(&species, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_exact_count() {
        let species = Species::new("Dimer", 160.0, 0.16).unwrap();
        let mut rng = rng_from_seed(2);
        assert_eq!(synthesize_masses(&species, 937, &mut rng).unwrap().len(), 937);
    }

    #[test]
    fn test_sample_moments_converge() {
        let species = Species::new("AB", 180.0, 0.08).unwrap();
        let mut rng = rng_from_seed(3);
        let masses = synthesize_masses(&species, 200_000, &mut rng).unwrap();
        let n = masses.len() as f64;
        let mean = masses.iter().sum::<f64>() / n;
        let var = masses.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / (n - 1.0);
        // standard error of the mean is 14.4 / sqrt(2e5) ~ 0.03
        assert_relative_eq!(mean, 180.0, epsilon = 0.2);
        assert_relative_eq!(var.sqrt(), 14.4, epsilon = 0.2);
    }
}
