//! Species of the two equilibrium topologies.
//!
//! Complex masses are always derived from their constituents: the dimer weighs twice the
//! monomer, the heterocomplex AB weighs A + B.
use super::sim_errors::{SimulationError, ensure_positive};
use serde::{Deserialize, Serialize};

/// A chemical entity seen by the instrument: name, molar mass in kDa and the
/// coefficient of variation of its measured mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub mass_kda: f64,
    pub noise_cv: f64,
}

impl Species {
    pub fn new(name: &str, mass_kda: f64, noise_cv: f64) -> Result<Self, SimulationError> {
        ensure_positive(&format!("mass of {}", name), mass_kda)?;
        ensure_positive(&format!("noise cv of {}", name), noise_cv)?;
        Ok(Self {
            name: name.to_string(),
            mass_kda,
            noise_cv,
        })
    }
    /// standard deviation of the measured mass, kDa
    pub fn std_kda(&self) -> f64 {
        self.noise_cv * self.mass_kda
    }
}

/// 2 M ⇌ D
#[derive(Debug, Clone, PartialEq)]
pub struct HomodimerTopology {
    pub monomer: Species,
    pub dimer: Species,
}

impl HomodimerTopology {
    pub fn new(monomer_mass: f64, noise_cv: f64) -> Result<Self, SimulationError> {
        let monomer = Species::new("Monomer", monomer_mass, noise_cv)?;
        let dimer = Species::new("Dimer", 2.0 * monomer_mass, noise_cv)?;
        Ok(Self { monomer, dimer })
    }
}

/// A + B ⇌ AB
#[derive(Debug, Clone, PartialEq)]
pub struct HeterocomplexTopology {
    pub a: Species,
    pub b: Species,
    pub ab: Species,
}

impl HeterocomplexTopology {
    pub fn new(mass_a: f64, mass_b: f64, noise_cv: f64) -> Result<Self, SimulationError> {
        let a = Species::new("A", mass_a, noise_cv)?;
        let b = Species::new("B", mass_b, noise_cv)?;
        let ab = Species::new("AB", mass_a + mass_b, noise_cv)?;
        Ok(Self { a, b, ab })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimer_mass_is_derived() {
        let topology = HomodimerTopology::new(80.0, 0.16).unwrap();
        assert_relative_eq!(topology.dimer.mass_kda, 160.0);
        assert_relative_eq!(topology.dimer.std_kda(), 25.6, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_mass_is_sum() {
        let topology = HeterocomplexTopology::new(150.0, 30.0, 0.08).unwrap();
        assert_relative_eq!(topology.ab.mass_kda, 180.0);
        assert_relative_eq!(topology.b.std_kda(), 2.4, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_mass_rejected() {
        let err = Species::new("A", 0.0, 0.08).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter(_)));
        assert!(!err.is_internal_fault());
        assert!(Species::new("A", 10.0, -0.1).is_err());
        assert!(Species::new("A", f64::NAN, 0.1).is_err());
    }
}
