//! Common interface of the homodimer and heterocomplex pipelines.
use super::allocation::SpeciesAllocation;
use super::conditions::Condition;
use super::heterocomplex::HeterocomplexSimulation;
use super::homodimer::HomodimerSimulation;
use super::random_source::SimRng;
use super::sim_errors::SimulationError;
use enum_dispatch::enum_dispatch;
use rand::seq::SliceRandom;

/// Allocation of one species together with the number of particles left after the
/// detection filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesReport {
    pub allocation: SpeciesAllocation,
    pub detected: usize,
}

/// Pooled, shuffled masses of one condition. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub label: String,
    pub nominal_nm: f64,
    pub species: Vec<SpeciesReport>,
    pub masses_kda: Vec<f64>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.masses_kda.len()
    }
    pub fn is_empty(&self) -> bool {
        self.masses_kda.is_empty()
    }
}

#[enum_dispatch]
pub trait MassPhotometrySimulation {
    /// short name of the equilibrium topology
    fn topology_tag(&self) -> &'static str;
    /// prefix of every file written for this topology
    fn file_prefix(&self) -> &'static str;
    /// regex matching the files a previous run of this topology left behind
    fn cleanup_pattern(&self) -> &'static str;
    /// builds the perturbed conditions in input order
    fn build_conditions(&self, rng: &mut SimRng) -> Result<Vec<Condition>, SimulationError>;
    /// resolves, allocates, synthesizes, filters, pools and shuffles one condition
    fn simulate_condition(
        &self,
        condition: &Condition,
        rng: &mut SimRng,
    ) -> Result<SampleSet, SimulationError>;

    fn file_name(&self, label: &str) -> String {
        format!("{}{}.csv", self.file_prefix(), label)
    }
}

/// The two supported equilibrium systems.
#[derive(Debug, Clone)]
#[enum_dispatch(MassPhotometrySimulation)]
pub enum EquilibriumModel {
    Homodimer(HomodimerSimulation),
    Heterocomplex(HeterocomplexSimulation),
}

/// Concatenates the per-species samples and shuffles them so that position carries no
/// information about species identity.
pub fn pool_and_shuffle(per_species: Vec<Vec<f64>>, rng: &mut SimRng) -> Vec<f64> {
    let mut pooled: Vec<f64> = per_species.into_iter().flatten().collect();
    pooled.shuffle(rng);
    pooled
}
