use crate::MassPhotometry::allocation::CountRounding;
use crate::MassPhotometry::equilibrium::{resolve_heterocomplex, resolve_homodimer};
use crate::MassPhotometry::report::print_summary;
use crate::MassPhotometry::sim_errors::SimulationError;
use crate::MassPhotometry::simulation::MassPhotometrySimulation;
use crate::Utils::output_store::CsvDirectoryStore;
use crate::Utils::show_figure::{DisplayOptions, MassHistogram, display_figure_static};
use crate::settings::{SimulationSettings, Topology};
use prettytable::{Table, row};

pub fn photometry_examples(task: usize) {
    match task {
        // the 2 M <-> D reference dataset: Kd = 8.35 nM, 80 kDa monomer, 1..64 nM
        0 => {
            let settings = SimulationSettings::default();
            export_and_summarize(&settings, Topology::Homodimer);
        }
        // the A + B <-> AB reference dataset: B (30 kDa) sits under the 40 kDa detection limit
        1 => {
            let settings = SimulationSettings::default();
            export_and_summarize(&settings, Topology::Heterocomplex);
        }
        // histogram of a seeded homodimer run
        2 => {
            let mut settings = SimulationSettings::default();
            settings.seed = Some(42);
            let output = match settings.driver(Topology::Homodimer).and_then(|d| d.generate()) {
                Ok(output) => output,
                Err(e) => {
                    println!("homodimer run failed: {}", e);
                    return;
                }
            };
            let fig = MassHistogram::from_sample_sets("2M ⇌ D", &output.sample_sets, 5.0);
            let options = DisplayOptions {
                output_path: "homodimer_histogram".into(),
                ..DisplayOptions::default()
            };
            println!("{:?}", display_figure_static(&fig, &options));
        }
        // equilibrium speciation tables
        3 => {
            let grid_nm = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0];
            match homodimer_speciation_table(8.35e-9, &grid_nm) {
                Ok(table) => {
                    table.printstd();
                }
                Err(e) => println!("homodimer speciation failed: {}", e),
            }
            let grid_nm = [0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0];
            match heterocomplex_speciation_table(1e-9, 5e-9, &grid_nm) {
                Ok(table) => {
                    table.printstd();
                }
                Err(e) => println!("heterocomplex speciation failed: {}", e),
            }
        }
        // truncation vs round-half-up on the same seed
        4 => {
            for rounding in [CountRounding::Truncate, CountRounding::RoundHalfUp] {
                let mut settings = SimulationSettings::default();
                settings.seed = Some(1);
                settings.rounding = rounding;
                match settings.driver(Topology::Heterocomplex).and_then(|d| d.generate()) {
                    Ok(output) => {
                        println!("{:?}", rounding);
                        print_summary("heterocomplex", output.seed, &output.sample_sets);
                    }
                    Err(e) => println!("heterocomplex run failed: {}", e),
                }
            }
        }
        _ => println!("no example with number {}", task),
    }
}

fn export_and_summarize(settings: &SimulationSettings, topology: Topology) {
    let result = settings
        .driver(topology)
        .and_then(|driver| {
            let tag = driver.model.topology_tag();
            driver
                .export(&CsvDirectoryStore, &settings.output_dir)
                .map(|(output, _)| (tag, output))
        });
    match result {
        Ok((tag, output)) => print_summary(tag, output.seed, &output.sample_sets),
        Err(e) => println!("{:?} run failed: {}", topology, e),
    }
}

/// Monomer and dimer fractions over a grid of total monomer concentrations (nM).
pub fn homodimer_speciation_table(kd: f64, totals_nm: &[f64]) -> Result<Table, SimulationError> {
    let mut table = Table::new();
    table.add_row(row!["Ct, nM", "monomer fraction", "dimer fraction"]);
    for &ct_nm in totals_nm {
        let state = resolve_homodimer(kd, ct_nm * 1e-9)?;
        table.add_row(row![
            ct_nm,
            format!("{:.4}", state.monomer_fraction()),
            format!("{:.4}", state.dimer_fraction())
        ]);
    }
    Ok(table)
}

/// Bound fractions of A and B at fixed `a_total` (M) over a grid of B totals (nM).
pub fn heterocomplex_speciation_table(
    kd: f64,
    a_total: f64,
    b_totals_nm: &[f64],
) -> Result<Table, SimulationError> {
    let mut table = Table::new();
    table.add_row(row!["Bt, nM", "bound A", "bound B"]);
    for &bt_nm in b_totals_nm {
        let state = resolve_heterocomplex(kd, a_total, bt_nm * 1e-9)?;
        table.add_row(row![
            bt_nm,
            format!("{:.4}", state.bound_a_fraction()),
            format!("{:.4}", state.bound_b_fraction())
        ]);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speciation_tables() {
        let table = homodimer_speciation_table(8.35e-9, &[1.0, 64.0]).unwrap();
        assert_eq!(table.len(), 3);
        let table = heterocomplex_speciation_table(1e-9, 5e-9, &[0.125, 1.0, 8.0]).unwrap();
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_speciation_errors_are_reported() {
        let err = homodimer_speciation_table(-1.0, &[1.0]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter(_)));
        let err = homodimer_speciation_table(8.35e-9, &[1.0, -2.0]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter(_)));
        let err = heterocomplex_speciation_table(1e-9, 0.0, &[1.0]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter(_)));
    }
}
