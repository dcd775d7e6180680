//! Static and interactive display of figures.
//!
//! [`display_figure_static`] never fails: a broken static renderer falls back to the
//! interactive view and a missing viewer leaves the static image only.
//! [`MassHistogram`] is drawn with `plotters`: `SVGBackend` for svg, `BitMapBackend` for
//! png, jpeg and bmp.
use crate::MassPhotometry::simulation::SampleSet;
use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("unsupported image format '{0}'")]
    UnsupportedFormat(String),
    #[error("nothing to plot")]
    Empty,
    #[error("invalid binning: {0}")]
    InvalidBinning(String),
    #[error("plotting error: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("viewer unavailable: {0}")]
    Viewer(String),
}

fn render_error<E: std::fmt::Display>(e: E) -> DisplayError {
    DisplayError::Render(e.to_string())
}

/// Something that can be drawn.
pub trait Figure {
    fn title(&self) -> &str;
    /// renders the figure into `path` encoded as `format`
    fn save_static_image(
        &self,
        path: &Path,
        format: &str,
        width: u32,
        height: u32,
    ) -> Result<(), DisplayError>;
    fn show_interactive(&self) -> Result<(), DisplayError>;
}

#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub show_interactive: bool,
    /// where the static image is written; the extension is replaced by `format`
    pub output_path: PathBuf,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            format: "png".to_string(),
            width: 800,
            height: 600,
            show_interactive: false,
            output_path: PathBuf::from("figure.png"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOutcome {
    Static(PathBuf),
    StaticAndInteractive(PathBuf),
    InteractiveOnly,
    Nothing,
}

fn write_static(fig: &dyn Figure, options: &DisplayOptions) -> Result<PathBuf, DisplayError> {
    let path = options
        .output_path
        .with_extension(options.format.to_lowercase());
    fig.save_static_image(&path, &options.format, options.width, options.height)?;
    Ok(path)
}

/// Shows `fig` interactively when asked, then writes its static image. Errors are logged
/// and degrade the outcome, they never reach the caller.
pub fn display_figure_static(fig: &dyn Figure, options: &DisplayOptions) -> DisplayOutcome {
    let mut interactive_shown = false;
    if options.show_interactive {
        match fig.show_interactive() {
            Ok(()) => interactive_shown = true,
            Err(e) => warn!("'{}': interactive view unavailable: {}", fig.title(), e),
        }
    }

    match write_static(fig, options) {
        Ok(path) => {
            info!("'{}' saved to {}", fig.title(), path.display());
            if interactive_shown {
                DisplayOutcome::StaticAndInteractive(path)
            } else {
                DisplayOutcome::Static(path)
            }
        }
        Err(e) => {
            warn!("Error creating static image of '{}': {}", fig.title(), e);
            if !interactive_shown {
                warn!("Showing interactive figure only");
                match fig.show_interactive() {
                    Ok(()) => interactive_shown = true,
                    Err(e) => warn!("'{}': interactive view unavailable: {}", fig.title(), e),
                }
            }
            if interactive_shown {
                DisplayOutcome::InteractiveOnly
            } else {
                DisplayOutcome::Nothing
            }
        }
    }
}

/// upper bound on the number of histogram bins
pub const MAX_BINS: usize = 10_000;

/// Counts of `values` in `n_bins` bins of `bin_width` starting at `start`. Values outside
/// the range are ignored.
pub fn histogram(values: &[f64], start: f64, bin_width: f64, n_bins: usize) -> Vec<usize> {
    let mut counts = vec![0; n_bins];
    for &v in values {
        let position = (v - start) / bin_width;
        if position >= 0.0 && position < n_bins as f64 {
            counts[position as usize] += 1;
        }
    }
    counts
}

/// Step histogram of pooled masses, one trace per condition.
#[derive(Debug, Clone)]
pub struct MassHistogram {
    pub title: String,
    pub series: Vec<(String, Vec<f64>)>,
    /// kDa
    pub bin_width: f64,
    /// file the interactive view is rendered to before it is opened
    pub interactive_path: PathBuf,
}

struct Binned {
    start: f64,
    n_bins: usize,
    counts: Vec<Vec<usize>>,
}

impl MassHistogram {
    pub fn from_sample_sets(title: &str, sample_sets: &[SampleSet], bin_width: f64) -> Self {
        Self {
            title: title.to_string(),
            series: sample_sets
                .iter()
                .map(|s| (s.label.clone(), s.masses_kda.clone()))
                .collect(),
            bin_width,
            interactive_path: std::env::temp_dir().join("photomol_histogram.svg"),
        }
    }

    fn binned(&self) -> Result<Binned, DisplayError> {
        if !(self.bin_width > 0.0 && self.bin_width.is_finite()) {
            return Err(DisplayError::InvalidBinning(format!(
                "bin width {}",
                self.bin_width
            )));
        }
        let all = self.series.iter().flat_map(|(_, v)| v.iter().copied());
        let (lo, hi) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() || !hi.is_finite() {
            return Err(DisplayError::Empty);
        }
        let start = (lo / self.bin_width).floor() * self.bin_width;
        let span = ((hi - start) / self.bin_width).floor();
        if !(span < MAX_BINS as f64) {
            return Err(DisplayError::InvalidBinning(format!(
                "{} kDa bins over {}..{} kDa exceed {} bins",
                self.bin_width, lo, hi, MAX_BINS
            )));
        }
        let n_bins = span as usize + 1;
        let counts = self
            .series
            .iter()
            .map(|(_, v)| histogram(v, start, self.bin_width, n_bins))
            .collect();
        Ok(Binned {
            start,
            n_bins,
            counts,
        })
    }

    /// Outline of one series: a horizontal segment per bin, closed down to zero at both ends.
    fn step_outline(&self, start: f64, counts: &[usize]) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(2 * counts.len() + 2);
        points.push((start, 0.0));
        for (bin, &count) in counts.iter().enumerate() {
            let left = start + bin as f64 * self.bin_width;
            points.push((left, count as f64));
            points.push((left + self.bin_width, count as f64));
        }
        points.push((start + counts.len() as f64 * self.bin_width, 0.0));
        points
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), DisplayError> {
        let binned = self.binned()?;
        let x_end = binned.start + binned.n_bins as f64 * self.bin_width;
        let y_max = binned
            .counts
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or(0)
            .max(1) as f64;

        root.fill(&WHITE).map_err(render_error)?;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(binned.start..x_end, 0.0..(y_max * 1.1))
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Mass (kDa)")
            .y_desc("Counts")
            .draw()
            .map_err(render_error)?;

        for (i, ((label, _), counts)) in self.series.iter().zip(&binned.counts).enumerate() {
            let color = Palette99::pick(i).mix(0.9);
            let points = self.step_outline(binned.start, counts);
            chart
                .draw_series(LineSeries::new(points, &color))
                .map_err(render_error)?
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

impl Figure for MassHistogram {
    fn title(&self) -> &str {
        &self.title
    }

    fn save_static_image(
        &self,
        path: &Path,
        format: &str,
        width: u32,
        height: u32,
    ) -> Result<(), DisplayError> {
        match format.to_lowercase().as_str() {
            "svg" => {
                let root = SVGBackend::new(path, (width, height)).into_drawing_area();
                self.draw(&root)
            }
            // BitMapBackend picks the encoder from the file extension
            "png" | "jpg" | "jpeg" | "bmp" => {
                let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
                self.draw(&root)
            }
            other => Err(DisplayError::UnsupportedFormat(other.to_string())),
        }
    }

    fn show_interactive(&self) -> Result<(), DisplayError> {
        {
            let root = SVGBackend::new(&self.interactive_path, (1000, 700)).into_drawing_area();
            self.draw(&root)?;
        }
        open_with_default_viewer(&self.interactive_path)
    }
}

fn open_with_default_viewer(path: &Path) -> Result<(), DisplayError> {
    let mut command = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "linux") {
        Command::new("xdg-open")
    } else {
        return Err(DisplayError::Viewer(format!(
            "no default viewer known for this platform, image left at {}",
            path.display()
        )));
    };
    command.arg(path).spawn()?;
    Ok(())
}
