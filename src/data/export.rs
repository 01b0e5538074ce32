use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use super::calibration::{find_peak, Calibration};
use super::revision::RevisedSpectrum;

/// Name stamped into every result preamble.
pub const GENERATOR: &str = "rusty-xps";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rendering summary CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("rendering calibration report: {0}")]
    Json(#[from] serde_json::Error),
}

/// One rendered output file, not yet on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

// ---------------------------------------------------------------------------
// Per-category result units
// ---------------------------------------------------------------------------

/// Render one result unit: 4-line preamble naming the category, then
/// `revised  counts  energy` rows in source order.
pub fn render_unit(spectrum: &RevisedSpectrum<'_>) -> String {
    let name = spectrum.spectrum.display_name();
    let mut out = String::new();
    let _ = writeln!(out, "{name} generated by {GENERATOR}");
    let _ = writeln!(out, "Energy(revised)  Counts  Energy");
    let _ = writeln!(out, "eV none eV");
    let _ = writeln!(out, "{name} {name} {name}");
    let sp = spectrum.spectrum;
    for ((revised, counts), energy) in spectrum.revised.iter().zip(&sp.counts).zip(&sp.energy) {
        let _ = writeln!(out, "{revised:.2}  {counts}  {energy:.2}");
    }
    out
}

/// File-safe, unique unit names in source order.
///
/// Empty labels become "whole spectrum"; path separators become `_`; a
/// taken name gets the first free `_2`, `_3`, ... so no unit overwrites another.
pub fn unit_names(spectra: &[RevisedSpectrum<'_>]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    spectra
        .iter()
        .map(|r| {
            let base = r.spectrum.display_name().replace(['/', '\\'], "_");
            let mut name = base.clone();
            let mut n = 1;
            while taken.contains(&name) {
                n += 1;
                name = format!("{base}_{n}");
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// Where the artifacts of one input file go.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub dir: PathBuf,
    pub stem: String,
}

impl OutputLayout {
    /// Outputs sit next to the input unless `out_dir` is given.
    pub fn for_input(input: &Path, out_dir: Option<&Path>) -> Self {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("xps")
            .to_string();
        let dir = match out_dir {
            Some(d) => d.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        OutputLayout { dir, stem }
    }

    pub fn result_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}_{name}_Result.txt", self.stem))
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(format!("{}_calibration.json", self.stem))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(format!("{}_summary.csv", self.stem))
    }
}

// ---------------------------------------------------------------------------
// Summary files
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CategoryEntry<'a> {
    label: &'a str,
    name: &'a str,
    points: usize,
}

#[derive(Debug, Serialize)]
struct CalibrationReport<'a> {
    input: String,
    generator: &'static str,
    calibration: &'a Calibration,
    categories: Vec<CategoryEntry<'a>>,
}

/// Pretty JSON record of the calibration and the categories it was applied to.
pub fn render_report(
    input: &Path,
    calibration: &Calibration,
    spectra: &[RevisedSpectrum<'_>],
    names: &[String],
) -> Result<String, ExportError> {
    let report = CalibrationReport {
        input: input.display().to_string(),
        generator: GENERATOR,
        calibration,
        categories: spectra
            .iter()
            .zip(names)
            .map(|(r, name)| CategoryEntry {
                label: &r.spectrum.label,
                name,
                points: r.spectrum.len(),
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    label: &'a str,
    points: usize,
    energy_start: Option<f64>,
    energy_end: Option<f64>,
    revised_start: Option<f64>,
    revised_end: Option<f64>,
    max_counts: Option<f64>,
    revised_energy_at_max: Option<f64>,
}

/// One CSV row per category: axis ranges and the raw maximum.
pub fn render_summary(spectra: &[RevisedSpectrum<'_>], names: &[String]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (r, name) in spectra.iter().zip(names) {
        let peak = find_peak(&r.spectrum.count_values());
        writer.serialize(SummaryRow {
            label: name,
            points: r.spectrum.len(),
            energy_start: r.spectrum.energy.first().copied(),
            energy_end: r.spectrum.energy.last().copied(),
            revised_start: r.revised.first().copied(),
            revised_end: r.revised.last().copied(),
            max_counts: peak.map(|(_, c)| c),
            revised_energy_at_max: peak.and_then(|(i, _)| r.revised.get(i).copied()),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Assembly and writing
// ---------------------------------------------------------------------------

/// Render every output of a run. Nothing touches the filesystem here.
pub fn build_artifacts(
    layout: &OutputLayout,
    input: &Path,
    calibration: &Calibration,
    spectra: &[RevisedSpectrum<'_>],
) -> Result<Vec<Artifact>, ExportError> {
    let names = unit_names(spectra);
    let mut artifacts: Vec<Artifact> = spectra
        .iter()
        .zip(&names)
        .map(|(r, name)| Artifact {
            path: layout.result_path(name),
            contents: render_unit(r),
        })
        .collect();
    artifacts.push(Artifact {
        path: layout.report_path(),
        contents: render_report(input, calibration, spectra, &names)?,
    });
    artifacts.push(Artifact {
        path: layout.summary_path(),
        contents: render_summary(spectra, &names)?,
    });
    for a in &artifacts {
        debug!("rendered {} ({} bytes)", a.path.display(), a.contents.len());
    }
    Ok(artifacts)
}

/// Write rendered artifacts in order.
///
/// Stops at the first failure; files written before it are left in place.
pub fn write_artifacts(artifacts: &[Artifact]) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        if let Some(dir) = artifact.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&artifact.path, &artifact.contents).map_err(|source| ExportError::Write {
            path: artifact.path.clone(),
            source,
        })?;
        info!("wrote {}", artifact.path.display());
        written.push(artifact.path.clone());
    }
    Ok(written)
}
