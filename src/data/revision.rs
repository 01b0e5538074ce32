use super::calibration::CalibrationOffset;
use super::model::{CategorySpectrum, Dataset};

/// Shift every energy by the calibration offset: `revised[i] = energy[i] - delta`.
pub fn revise(energy: &[f64], offset: CalibrationOffset) -> Vec<f64> {
    energy.iter().map(|&e| e - offset.delta).collect()
}

/// A category paired with its calibrated energy axis.
#[derive(Debug, Clone)]
pub struct RevisedSpectrum<'a> {
    pub spectrum: &'a CategorySpectrum,
    /// Calibrated energies, index-aligned with `spectrum.energy`.
    pub revised: Vec<f64>,
}

/// Apply the same offset to every category, the reference one included.
pub fn revise_dataset(dataset: &Dataset, offset: CalibrationOffset) -> Vec<RevisedSpectrum<'_>> {
    dataset
        .iter()
        .map(|spectrum| RevisedSpectrum {
            spectrum,
            revised: revise(&spectrum.energy, offset),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::calibration::calibrate;
    use crate::data::model::CountValue;

    fn spectrum(label: &str, energy: &[f64], counts: &[f64]) -> CategorySpectrum {
        CategorySpectrum::new(
            label,
            energy.to_vec(),
            counts.iter().copied().map(CountValue::from).collect(),
        )
    }

    #[test]
    fn zero_offset_is_identity() {
        let energy = [530.0, 529.0];
        assert_eq!(revise(&energy, CalibrationOffset { delta: 0.0 }), energy.to_vec());
    }

    #[test]
    fn uniform_shift_preserves_order_and_length() {
        let energy = [530.0, 529.0, 531.5];
        let revised = revise(&energy, CalibrationOffset { delta: 1.5 });
        assert_eq!(revised, vec![528.5, 527.5, 530.0]);
    }

    #[test]
    fn revision_round_trips_within_double_precision() {
        let offset = CalibrationOffset { delta: 1.23456789 };
        let energy = [1486.6, 284.6, 0.1, 933.2, 530.05];
        for (r, e) in revise(&energy, offset).iter().zip(energy) {
            assert!((r + offset.delta - e).abs() < 1e-12);
        }
    }

    #[test]
    fn reference_peak_lands_on_standard_energy() {
        let ds = Dataset::new(vec![
            spectrum("C", &[287.1, 285.9, 284.2], &[3.0, 12.0, 4.0]),
            spectrum("O", &[530.0, 529.0], &[1.0, 1.0]),
        ]);
        let cal = calibrate(&ds, "C", 284.6).unwrap();
        let revised = revise_dataset(&ds, cal.offset);
        assert_eq!(revised.len(), 2);
        assert!((revised[0].revised[cal.peak_index] - 284.6).abs() < 1e-9);
        for (r, e) in revised[1].revised.iter().zip(&ds.categories[1].energy) {
            assert!((e - r - cal.offset.delta).abs() < 1e-9);
        }
    }
}
