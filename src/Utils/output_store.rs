//! Flat-table persistence of sample sets.
use log::debug;
use regex::Regex;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Header of the single column of every output table.
pub const MASS_COLUMN: &str = "masses_kDa";

/// Storage the condition driver writes to. Errors are passed back untouched.
pub trait OutputStore {
    fn ensure_directory(&self, path: &Path) -> io::Result<()>;
    fn write_table(&self, path: &Path, column_name: &str, values: &[f64]) -> io::Result<()>;
    /// removes the files in `directory` whose names match `pattern`, returns how many
    fn delete_matching(&self, directory: &Path, pattern: &Regex) -> io::Result<usize>;
}

/// One CSV file per table on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDirectoryStore;

impl OutputStore for CsvDirectoryStore {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_table(&self, path: &Path, column_name: &str, values: &[f64]) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", column_name)?;
        // `{}` on f64 prints the shortest representation that round-trips
        for value in values {
            writeln!(writer, "{}", value)?;
        }
        writer.flush()
    }

    fn delete_matching(&self, directory: &Path, pattern: &Regex) -> io::Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| pattern.is_match(name))
                .unwrap_or(false);
            if matches {
                fs::remove_file(&path)?;
                debug!("deleted {}", path.display());
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Reads back a table written by [`CsvDirectoryStore`].
pub fn read_table(path: &Path) -> io::Result<(String, Vec<f64>)> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();
    let header = lines.next().unwrap_or_default().to_string();
    let values = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.trim().parse::<f64>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bad value '{}' in {}: {}", line, path.display(), e),
                )
            })
        })
        .collect::<io::Result<Vec<f64>>>()?;
    Ok((header, values))
}
