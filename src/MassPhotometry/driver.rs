//! # Condition driver
//!
//! Runs one equilibrium model over its list of conditions:
//!
//! 1. resolve the equilibrium state
//! 2. allocate particle counts
//! 3. synthesize noisy masses per species
//! 4. apply the detection limit (heterocomplex only)
//! 5. pool all species
//! 6. shuffle the pool
//! 7. hand `(label, masses)` to an [`OutputStore`]
//!
//! With [`SeedingStrategy::SharedStream`] a single generator is consumed in a fixed order:
//! condition perturbations first, then the conditions in input order. With
//! [`SeedingStrategy::PerCondition`] the perturbations come from stream 0 of the run seed
//! and condition `i` gets stream `i + 1`, so conditions are simulated in parallel and the
//! result does not depend on scheduling. The two strategies produce different draws for the
//! same seed.
use super::random_source::{SeedingStrategy, derive_seed, resolve_seed, rng_from_seed};
use super::sim_errors::SimulationError;
use super::simulation::{EquilibriumModel, MassPhotometrySimulation, SampleSet};
use crate::Utils::output_store::{MASS_COLUMN, OutputStore};
use log::{info, warn};
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Sample sets of one run together with the seed that reproduces them.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub seed: u64,
    pub sample_sets: Vec<SampleSet>,
}

#[derive(Debug, Clone)]
pub struct ConditionDriver {
    pub model: EquilibriumModel,
    pub seed: Option<u64>,
    pub seeding: SeedingStrategy,
}

impl ConditionDriver {
    pub fn new(model: EquilibriumModel, seed: Option<u64>, seeding: SeedingStrategy) -> Self {
        Self {
            model,
            seed,
            seeding,
        }
    }

    /// Simulates every condition and returns the sample sets in input order.
    pub fn generate(&self) -> Result<RunOutput, SimulationError> {
        let seed = resolve_seed(self.seed);
        if self.seed.is_none() {
            info!("no seed configured, drew seed {}", seed);
        }
        let sample_sets = match self.seeding {
            SeedingStrategy::SharedStream => {
                let mut rng = rng_from_seed(seed);
                let conditions = self.model.build_conditions(&mut rng)?;
                info!(
                    "{} run, seed {}, {} conditions, shared stream",
                    self.model.topology_tag(),
                    seed,
                    conditions.len()
                );
                conditions
                    .iter()
                    .map(|condition| self.model.simulate_condition(condition, &mut rng))
                    .collect::<Result<Vec<_>, _>>()?
            }
            SeedingStrategy::PerCondition => {
                let mut rng = rng_from_seed(derive_seed(seed, 0));
                let conditions = self.model.build_conditions(&mut rng)?;
                info!(
                    "{} run, seed {}, {} conditions, per-condition streams",
                    self.model.topology_tag(),
                    seed,
                    conditions.len()
                );
                conditions
                    .par_iter()
                    .map(|condition| {
                        let mut rng = rng_from_seed(derive_seed(seed, condition.index as u64 + 1));
                        self.model.simulate_condition(condition, &mut rng)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(RunOutput { seed, sample_sets })
    }

    /// Generates the run and replaces the files of any previous run of the same topology in
    /// `directory`. Nothing is touched on disk if the simulation fails.
    pub fn export<S: OutputStore>(
        &self,
        store: &S,
        directory: &Path,
    ) -> Result<(RunOutput, Vec<PathBuf>), SimulationError> {
        let output = self.generate()?;

        store.ensure_directory(directory)?;
        let pattern = Regex::new(self.model.cleanup_pattern())?;
        let removed = store.delete_matching(directory, &pattern)?;
        if removed > 0 {
            info!(
                "removed {} stale file(s) from {}",
                removed,
                directory.display()
            );
        }

        let mut written = Vec::with_capacity(output.sample_sets.len());
        for set in &output.sample_sets {
            if set.is_empty() {
                warn!("{}: no particles survived, writing an empty table", set.label);
            }
            let path = directory.join(self.model.file_name(&set.label));
            store.write_table(&path, MASS_COLUMN, &set.masses_kda)?;
            info!("Generated file: {}", path.display());
            written.push(path);
        }
        Ok((output, written))
    }
}
