use super::cli_examples::examples_menu;
use crate::MassPhotometry::driver::RunOutput;
use crate::MassPhotometry::report::print_summary;
use crate::MassPhotometry::sim_errors::SimulationError;
use crate::MassPhotometry::simulation::MassPhotometrySimulation;
use crate::Utils::output_store::CsvDirectoryStore;
use crate::Utils::show_figure::{DisplayOptions, MassHistogram, display_figure_static};
use crate::settings::{SimulationSettings, Topology};
use log::error;
use std::io::{self, Write};

/// Generates and writes the files of one topology, then prints the run summary.
pub fn run_topology(
    settings: &SimulationSettings,
    topology: Topology,
) -> Result<(&'static str, RunOutput), SimulationError> {
    let driver = settings.driver(topology)?;
    let tag = driver.model.topology_tag();
    let (output, _) = driver.export(&CsvDirectoryStore, &settings.output_dir)?;
    print_summary(tag, output.seed, &output.sample_sets);
    Ok((tag, output))
}

pub fn run_interactive_menu(settings: &SimulationSettings) {
    let mut last_run: Option<(&'static str, RunOutput)> = None;
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" | "2" => {
                let topology = if choice.trim() == "1" {
                    Topology::Homodimer
                } else {
                    Topology::Heterocomplex
                };
                match run_topology(settings, topology) {
                    Ok(run) => last_run = Some(run),
                    Err(e) => error!("{}", e),
                }
            }
            "3" => {
                for topology in [Topology::Homodimer, Topology::Heterocomplex] {
                    match run_topology(settings, topology) {
                        Ok(run) => last_run = Some(run),
                        Err(e) => error!("{}", e),
                    }
                }
            }
            "4" => match &last_run {
                Some((tag, output)) => plot_run(settings, tag, output),
                None => println!("Nothing generated yet."),
            },
            "5" => match serde_json::to_string_pretty(settings) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("{}", e),
            },
            "6" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn plot_run(settings: &SimulationSettings, tag: &str, output: &RunOutput) {
    let fig = MassHistogram::from_sample_sets(tag, &output.sample_sets, 5.0);
    let options = DisplayOptions {
        show_interactive: true,
        output_path: settings.output_dir.join(format!("{}_histogram", tag)),
        ..DisplayOptions::default()
    };
    display_figure_static(&fig, &options);
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!("\x1b[34m\n Synthetic mass photometry data generator \n\x1b[0m");
    println!("\x1b[33m1. Homodimer files (2M ⇌ D)\x1b[0m");
    println!("\x1b[33m2. Heterocomplex files (A + B ⇌ AB)\x1b[0m");
    println!("\x1b[33m3. Both\x1b[0m");
    println!("\x1b[33m4. Plot last run\x1b[0m");
    println!("\x1b[33m5. Show settings\x1b[0m");
    println!("\x1b[33m6. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        error!("failed to read input: {}", e);
        return "0".to_string();
    }
    input
}
