use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::config::Config;
use crate::data::calibration::{calibrate, Calibration};
use crate::data::export::{build_artifacts, write_artifacts, OutputLayout};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::revision::{revise_dataset, RevisedSpectrum};

// ---------------------------------------------------------------------------
// Run: Parse → Calibrate → Revise → Export
// ---------------------------------------------------------------------------

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub calibration: Calibration,
    pub written: Vec<PathBuf>,
}

/// Process one export end to end.
///
/// Parsing and calibration complete before any file is written, and all
/// artifacts are rendered in memory before the first write.
pub fn run(input: &Path, out_dir: Option<&Path>, config: &Config) -> Result<RunOutput> {
    info!("processing {}", input.display());
    info!("standard energy of {} is {}", config.reference_label, config.standard_energy);

    let dataset = load_file(input, &config.parser)?;
    let calibration = calibrate(&dataset, &config.reference_label, config.standard_energy)
        .with_context(|| format!("calibrating {}", input.display()))?;

    let revised = revise_dataset(&dataset, calibration.offset);
    let layout = OutputLayout::for_input(input, out_dir);
    let artifacts = build_artifacts(&layout, input, &calibration, &revised)
        .context("rendering results")?;
    let written = write_artifacts(&artifacts)?;

    Ok(RunOutput {
        dataset,
        calibration,
        written,
    })
}

// ---------------------------------------------------------------------------
// Plot selection
// ---------------------------------------------------------------------------

/// One line for the viewer: calibrated energy against counts.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub title: String,
    /// `[revised_energy, counts]` pairs in source order.
    pub points: Vec<[f64; 2]>,
}

/// Series for every category except the reference and the excluded label.
pub fn plot_series(spectra: &[RevisedSpectrum<'_>], config: &Config) -> Vec<PlotSeries> {
    spectra
        .iter()
        .filter(|r| {
            r.spectrum.label != config.reference_label && r.spectrum.label != config.excluded_label
        })
        .map(|r| PlotSeries {
            label: r.spectrum.display_name().to_string(),
            title: format!("XPS spectrum: {}", r.spectrum.display_name()),
            points: r
                .revised
                .iter()
                .zip(&r.spectrum.counts)
                .map(|(&e, c)| [e, c.value])
                .collect(),
        })
        .collect()
}
