//! # Settings Module
//!
//! ## Purpose
//! Holds every parameter of a data-generation run and persists it as a JSON file, so a
//! dataset can be regenerated byte for byte from its settings and seed.
//!
//! ## Key Features
//! - **Defaults**: the reference homodimer and heterocomplex datasets
//! - **Partial files**: missing fields fall back to their defaults (`#[serde(default)]`)
//! - **Missing file**: loading a settings file that does not exist yields the defaults
//! - **Driver construction**: builds validated [`ConditionDriver`]s for either topology
//!
//! ## Configuration Format
//! ```json
//! {
//!   "output_dir": "test_files",
//!   "seed": 42,
//!   "seeding": "SharedStream",
//!   "rounding": "Truncate",
//!   "verbose": false,
//!   "homodimer": { "kd": 8.35e-9, "monomer_mass": 80.0, "concentrations_nm": [1.0, 2.0] },
//!   "heterocomplex": { "detection_limit": 40.0 }
//! }
//! ```

use crate::MassPhotometry::allocation::CountRounding;
use crate::MassPhotometry::driver::ConditionDriver;
use crate::MassPhotometry::heterocomplex::{HeterocomplexParams, HeterocomplexSimulation};
use crate::MassPhotometry::homodimer::{HomodimerParams, HomodimerSimulation};
use crate::MassPhotometry::random_source::SeedingStrategy;
use crate::MassPhotometry::sim_errors::SimulationError;
use crate::MassPhotometry::simulation::EquilibriumModel;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// default settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "photomol_settings.json";

/// Which equilibrium system(s) a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Homodimer,
    Heterocomplex,
}

impl Topology {
    /// Parses `homodimer`/`monomer`/`dimer` and `heterocomplex`/`complex`/`ab`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "homodimer" | "monomer" | "dimer" => Some(Topology::Homodimer),
            "heterocomplex" | "complex" | "ab" => Some(Topology::Heterocomplex),
            _ => None,
        }
    }
}

/// All parameters of a data-generation run.
///
/// # Fields
/// * `output_dir` - directory the CSV tables are written to
/// * `seed` - run seed; `None` draws one from OS entropy (and logs it)
/// * `seeding` - shared generator stream or one stream per condition
/// * `rounding` - how expected particle counts become sample sizes
/// * `verbose` - debug-level logging
/// * `homodimer` - 2 M ⇌ D parameters
/// * `heterocomplex` - A + B ⇌ AB parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
    pub seeding: SeedingStrategy,
    pub rounding: CountRounding,
    pub verbose: bool,
    pub homodimer: HomodimerParams,
    pub heterocomplex: HeterocomplexParams,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("test_files"),
            seed: None,
            seeding: SeedingStrategy::SharedStream,
            rounding: CountRounding::Truncate,
            verbose: false,
            homodimer: HomodimerParams::default(),
            heterocomplex: HeterocomplexParams::default(),
        }
    }
}

impl SimulationSettings {
    /// Loads settings from a JSON file.
    ///
    /// A file that does not exist gives the default settings; a file that exists but cannot
    /// be read or parsed is an error.
    ///
    /// # Arguments
    /// * `path` - Path to the settings file
    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        if !path.exists() {
            info!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: SimulationSettings = serde_json::from_str(&content)?;
        info!("settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Writes the settings as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), SimulationError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validated driver for the given topology.
    pub fn driver(&self, topology: Topology) -> Result<ConditionDriver, SimulationError> {
        let model: EquilibriumModel = match topology {
            Topology::Homodimer => {
                HomodimerSimulation::new(self.homodimer.clone(), self.rounding)?.into()
            }
            Topology::Heterocomplex => {
                HeterocomplexSimulation::new(self.heterocomplex.clone(), self.rounding)?.into()
            }
        };
        Ok(ConditionDriver::new(model, self.seed, self.seeding))
    }
}
