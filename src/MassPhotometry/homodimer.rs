//! 2 M ⇌ D pipeline. Every particle is visible to the instrument, so there is no
//! detection filter.
use super::allocation::{CountRounding, allocate_counts};
use super::conditions::{Condition, ConditionTotals, homodimer_conditions};
use super::equilibrium::resolve_homodimer;
use super::noise::synthesize_masses;
use super::random_source::SimRng;
use super::sim_errors::{SimulationError, ensure_positive};
use super::simulation::{MassPhotometrySimulation, SampleSet, SpeciesReport, pool_and_shuffle};
use super::species::HomodimerTopology;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomodimerParams {
    /// dissociation constant, M
    pub kd: f64,
    /// kDa
    pub monomer_mass: f64,
    /// total monomer concentrations, nM
    pub concentrations_nm: Vec<f64>,
    pub noise_cv: f64,
    /// particles per condition
    pub total_counts: usize,
    /// half-width of the uniform multiplicative concentration error
    pub perturbation: f64,
}

impl Default for HomodimerParams {
    fn default() -> Self {
        Self {
            kd: 8.35e-9,
            monomer_mass: 80.0,
            concentrations_nm: vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0],
            noise_cv: 0.16,
            total_counts: 1800,
            perturbation: 0.03,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomodimerSimulation {
    pub params: HomodimerParams,
    pub topology: HomodimerTopology,
    pub rounding: CountRounding,
}

impl HomodimerSimulation {
    pub fn new(params: HomodimerParams, rounding: CountRounding) -> Result<Self, SimulationError> {
        ensure_positive("Kd", params.kd)?;
        if params.total_counts == 0 {
            return Err(SimulationError::InvalidParameter(
                "total counts must be positive".to_string(),
            ));
        }
        let topology = HomodimerTopology::new(params.monomer_mass, params.noise_cv)?;
        Ok(Self {
            params,
            topology,
            rounding,
        })
    }
}

impl MassPhotometrySimulation for HomodimerSimulation {
    fn topology_tag(&self) -> &'static str {
        "homodimer"
    }
    fn file_prefix(&self) -> &'static str {
        "masses_monomer_"
    }
    fn cleanup_pattern(&self) -> &'static str {
        r"^masses_monomer_.*\.csv$"
    }

    fn build_conditions(&self, rng: &mut SimRng) -> Result<Vec<Condition>, SimulationError> {
        homodimer_conditions(
            &self.params.concentrations_nm,
            self.params.perturbation,
            rng,
        )
    }

    fn simulate_condition(
        &self,
        condition: &Condition,
        rng: &mut SimRng,
    ) -> Result<SampleSet, SimulationError> {
        let ConditionTotals::Homodimer { monomer_total } = condition.totals else {
            return Err(SimulationError::ConditionMismatch(format!(
                "condition {} is not a homodimer condition",
                condition.label
            )));
        };
        let state = resolve_homodimer(self.params.kd, monomer_total)?;
        let species = [&self.topology.monomer, &self.topology.dimer];
        let names: Vec<&str> = species.iter().map(|s| s.name.as_str()).collect();
        let allocations = allocate_counts(
            &names,
            &state.species_concentrations(),
            self.params.total_counts,
            self.rounding,
        )?;

        let mut per_species = Vec::with_capacity(species.len());
        let mut reports = Vec::with_capacity(species.len());
        for (s, allocation) in species.iter().zip(allocations) {
            let masses = synthesize_masses(s, allocation.allocated, rng)?;
            reports.push(SpeciesReport {
                detected: masses.len(),
                allocation,
            });
            per_species.push(masses);
        }
        let masses_kda = pool_and_shuffle(per_species, rng);
        info!(
            "{}: monomer fraction {:.3}, {} particles",
            condition.label,
            state.monomer_fraction(),
            masses_kda.len()
        );
        Ok(SampleSet {
            label: condition.label.clone(),
            nominal_nm: condition.nominal_nm,
            species: reports,
            masses_kda,
        })
    }
}
