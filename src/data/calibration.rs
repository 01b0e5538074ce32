use log::info;
use serde::Serialize;
use thiserror::Error;

use super::model::Dataset;

#[derive(Error, Debug, PartialEq)]
pub enum CalibrationError {
    #[error("reference category `{label}` not found (categories: {available:?})")]
    ReferenceNotFound { label: String, available: Vec<String> },
    #[error("reference category `{label}` is ambiguous: sections {positions:?} all carry it")]
    AmbiguousReference { label: String, positions: Vec<usize> },
    #[error("reference category `{label}` has no comparable counts")]
    NoComparableCounts { label: String },
}

/// Scalar shift between the measured and the standard reference energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationOffset {
    pub delta: f64,
}

/// Outcome of calibrating a dataset against its reference category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    pub reference_label: String,
    /// Position of the reference category in the dataset.
    pub reference_position: usize,
    pub peak_index: usize,
    pub peak_energy: f64,
    pub peak_counts: f64,
    pub standard_energy: f64,
    pub offset: CalibrationOffset,
}

/// Index and value of the first occurrence of the maximum.
///
/// A later value equal to the running maximum does not replace it, so ties
/// resolve to the lowest index. NaN entries never win.
pub fn find_peak(counts: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &c) in counts.iter().enumerate() {
        if c.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if c <= max => {}
            _ => best = Some((i, c)),
        }
    }
    best
}

/// Locate the unique reference category, find its peak and derive the offset.
pub fn calibrate(
    dataset: &Dataset,
    reference_label: &str,
    standard_energy: f64,
) -> Result<Calibration, CalibrationError> {
    let positions = dataset.positions_of(reference_label);
    let reference_position = match positions.as_slice() {
        [] => {
            return Err(CalibrationError::ReferenceNotFound {
                label: reference_label.to_string(),
                available: dataset.labels().into_iter().map(String::from).collect(),
            })
        }
        [only] => *only,
        _ => {
            return Err(CalibrationError::AmbiguousReference {
                label: reference_label.to_string(),
                positions,
            })
        }
    };

    let reference = &dataset.categories[reference_position];
    let (peak_index, peak_counts) =
        find_peak(&reference.count_values()).ok_or_else(|| CalibrationError::NoComparableCounts {
            label: reference_label.to_string(),
        })?;
    let peak_energy = reference.energy[peak_index];
    let delta = peak_energy - standard_energy;

    info!("max position is {peak_energy} (index {peak_index}, counts {peak_counts})");
    info!("delta is {delta}");

    Ok(Calibration {
        reference_label: reference_label.to_string(),
        reference_position,
        peak_index,
        peak_energy,
        peak_counts,
        standard_energy,
        offset: CalibrationOffset { delta },
    })
}
