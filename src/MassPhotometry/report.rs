use super::simulation::SampleSet;
use prettytable::{Cell, Row, Table, row};

/// One row per condition: label, then allocated/detected particles of each species, then
/// the pooled size.
pub fn summary_table(sample_sets: &[SampleSet]) -> Table {
    let mut table = Table::new();
    let mut header = vec![Cell::new("condition")];
    if let Some(first) = sample_sets.first() {
        for report in &first.species {
            header.push(Cell::new(&format!(
                "{} (allocated/detected)",
                report.allocation.species
            )));
        }
    }
    header.push(Cell::new("pooled"));
    table.add_row(Row::new(header));

    for set in sample_sets {
        let mut cells = vec![Cell::new(&set.label)];
        for report in &set.species {
            cells.push(Cell::new(&format!(
                "{}/{}",
                report.allocation.allocated, report.detected
            )));
        }
        cells.push(Cell::new(&set.len().to_string()));
        table.add_row(Row::new(cells));
    }
    table
}

pub fn print_summary(topology: &str, seed: u64, sample_sets: &[SampleSet]) {
    let mut title = Table::new();
    title.add_row(row!["topology", topology, "seed", seed]);
    title.printstd();
    summary_table(sample_sets).printstd();
}
