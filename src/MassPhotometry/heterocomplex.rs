//! A + B ⇌ AB pipeline. Particles lighter than the detection limit are not seen by the
//! instrument and are removed from every species before pooling.
use super::allocation::{CountRounding, allocate_counts};
use super::conditions::{Condition, ConditionTotals, heterocomplex_conditions};
use super::detection::apply_detection_limit;
use super::equilibrium::resolve_heterocomplex;
use super::noise::synthesize_masses;
use super::random_source::SimRng;
use super::sim_errors::{SimulationError, ensure_positive};
use super::simulation::{MassPhotometrySimulation, SampleSet, SpeciesReport, pool_and_shuffle};
use super::species::HeterocomplexTopology;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeterocomplexParams {
    /// kDa
    pub mass_a: f64,
    /// kDa
    pub mass_b: f64,
    /// dissociation constant, M
    pub kd: f64,
    /// total A, M; fixed across conditions
    pub a_concentration_molar: f64,
    /// total B concentrations, nM
    pub b_concentrations_nm: Vec<f64>,
    /// kDa
    pub detection_limit: f64,
    pub noise_cv: f64,
    pub total_counts: usize,
    pub perturbation: f64,
}

impl Default for HeterocomplexParams {
    fn default() -> Self {
        Self {
            mass_a: 150.0,
            mass_b: 30.0,
            kd: 1e-9,
            a_concentration_molar: 5e-9,
            b_concentrations_nm: vec![0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0],
            detection_limit: 40.0,
            noise_cv: 0.08,
            total_counts: 3200,
            perturbation: 0.02,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeterocomplexSimulation {
    pub params: HeterocomplexParams,
    pub topology: HeterocomplexTopology,
    pub rounding: CountRounding,
}

impl HeterocomplexSimulation {
    pub fn new(
        params: HeterocomplexParams,
        rounding: CountRounding,
    ) -> Result<Self, SimulationError> {
        ensure_positive("Kd", params.kd)?;
        if !params.detection_limit.is_finite() {
            return Err(SimulationError::InvalidParameter(format!(
                "detection limit must be finite, got {}",
                params.detection_limit
            )));
        }
        if params.total_counts == 0 {
            return Err(SimulationError::InvalidParameter(
                "total counts must be positive".to_string(),
            ));
        }
        let topology = HeterocomplexTopology::new(params.mass_a, params.mass_b, params.noise_cv)?;
        Ok(Self {
            params,
            topology,
            rounding,
        })
    }
}

impl MassPhotometrySimulation for HeterocomplexSimulation {
    fn topology_tag(&self) -> &'static str {
        "heterocomplex"
    }
    fn file_prefix(&self) -> &'static str {
        "masses_A_"
    }
    fn cleanup_pattern(&self) -> &'static str {
        r"^masses_A_B.*\.csv$"
    }

    fn build_conditions(&self, rng: &mut SimRng) -> Result<Vec<Condition>, SimulationError> {
        heterocomplex_conditions(
            self.params.a_concentration_molar,
            &self.params.b_concentrations_nm,
            self.params.perturbation,
            rng,
        )
    }

    fn simulate_condition(
        &self,
        condition: &Condition,
        rng: &mut SimRng,
    ) -> Result<SampleSet, SimulationError> {
        let ConditionTotals::Heterocomplex { a_total, b_total } = condition.totals else {
            return Err(SimulationError::ConditionMismatch(format!(
                "condition {} is not a heterocomplex condition",
                condition.label
            )));
        };
        let state = resolve_heterocomplex(self.params.kd, a_total, b_total)?;
        let species = [&self.topology.a, &self.topology.b, &self.topology.ab];
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
            let visible = apply_detection_limit(masses, self.params.detection_limit);
            reports.push(SpeciesReport {
                detected: visible.len(),
                allocation,
            });
            per_species.push(visible);
        }
        let masses_kda = pool_and_shuffle(per_species, rng);
        info!(
            "{}: bound A fraction {:.3}, {} particles above {} kDa",
            condition.label,
            state.bound_a_fraction(),
            masses_kda.len(),
            self.params.detection_limit
        );
        Ok(SampleSet {
            label: condition.label.clone(),
            nominal_nm: condition.nominal_nm,
            species: reports,
            masses_kda,
        })
    }
}
