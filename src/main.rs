use PhotoMolSim::cli::cli_main::{run_interactive_menu, run_topology};
use PhotoMolSim::settings::{SETTINGS_FILE, SimulationSettings, Topology};
use log::{LevelFilter, error};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;

/// `PhotoMolSim [homodimer|heterocomplex|all] [settings.json]`; no arguments opens the menu.
pub fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));

    let settings = SimulationSettings::load(&settings_path);
    let level = match &settings {
        Ok(s) if s.verbose => LevelFilter::Debug,
        _ => LevelFilter::Info,
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!("cannot load {}: {}", settings_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let Some(command) = args.first() else {
        run_interactive_menu(&settings);
        return ExitCode::SUCCESS;
    };
    let topologies = match command.as_str() {
        "all" => vec![Topology::Homodimer, Topology::Heterocomplex],
        other => match Topology::parse(other) {
            Some(topology) => vec![topology],
            None => {
                error!(
                    "unknown command '{}', expected homodimer, heterocomplex or all",
                    other
                );
                return ExitCode::FAILURE;
            }
        },
    };
    for topology in topologies {
        if let Err(e) = run_topology(&settings, topology) {
            error!("{:?} run failed: {}", topology, e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
