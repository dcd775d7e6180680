//! # Synthetic mass photometry
//!
//! Generates single-molecule mass photometry datasets from two equilibrium systems:
//!
//! | Topology | Reaction | Observed species | Filter |
//! |----------|----------|------------------|--------|
//! | homodimer | 2 M ⇌ D | Monomer, Dimer | none |
//! | heterocomplex | A + B ⇌ AB | A, B, AB | detection limit |
//!
//! Per condition the data flows one way:
//! concentration → equilibrium state → fractions → counts → noisy masses →
//! (detection filter) → shuffled pool.
//!
//! ```no_run
//! use PhotoMolSim::MassPhotometry::allocation::CountRounding;
//! use PhotoMolSim::MassPhotometry::driver::ConditionDriver;
//! use PhotoMolSim::MassPhotometry::homodimer::{HomodimerParams, HomodimerSimulation};
//! use PhotoMolSim::MassPhotometry::random_source::SeedingStrategy;
//! use PhotoMolSim::Utils::output_store::CsvDirectoryStore;
//! use std::path::Path;
//!
//! let simulation = HomodimerSimulation::new(HomodimerParams::default(), CountRounding::Truncate)
//!     .unwrap();
//! let driver = ConditionDriver::new(simulation.into(), Some(42), SeedingStrategy::SharedStream);
//! let (output, files) = driver
//!     .export(&CsvDirectoryStore, Path::new("test_files"))
//!     .unwrap();
//! assert_eq!(output.sample_sets.len(), files.len());
//! ```
pub mod allocation;
pub mod conditions;
pub mod detection;
pub mod driver;
mod driver_tests;
pub mod equilibrium;
pub mod heterocomplex;
pub mod homodimer;
pub mod noise;
pub mod random_source;
pub mod report;
pub mod sim_errors;
pub mod simulation;
pub mod species;
