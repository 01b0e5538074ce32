use crate::color::ColorMap;
use crate::data::calibration::Calibration;
use crate::pipeline::PlotSeries;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Source file shown in the header.
    pub source: String,

    /// Calibrated series, one per plotted category.
    pub series: Vec<PlotSeries>,

    /// Per-series visibility, index-aligned with `series`.
    pub visible: Vec<bool>,

    /// Calibration the series were revised with.
    pub calibration: Calibration,

    /// Colour per category label.
    pub color_map: ColorMap,

    /// Scale every series to [0, 1] before drawing.
    pub minmax_scaling: bool,
}

impl AppState {
    pub fn new(source: String, series: Vec<PlotSeries>, calibration: Calibration) -> Self {
        let color_map = ColorMap::new(series.iter().map(|s| s.label.as_str()));
        let visible = vec![true; series.len()];
        Self {
            source,
            series,
            visible,
            calibration,
            color_map,
            minmax_scaling: false,
        }
    }

    /// Indices of series currently drawn.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| i)
            .collect()
    }

    /// Toggle a single series.
    pub fn toggle(&mut self, index: usize) {
        if let Some(v) = self.visible.get_mut(index) {
            *v = !*v;
        }
    }

    /// Show every series.
    pub fn select_all(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = true);
    }

    /// Hide every series.
    pub fn select_none(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::calibration::CalibrationOffset;

    fn state() -> AppState {
        let series = ["whole spectrum", "N", "Fe"]
            .iter()
            .map(|l| PlotSeries {
                label: l.to_string(),
                title: format!("XPS spectrum: {l}"),
                points: vec![[1.0, 2.0]],
            })
            .collect();
        let calibration = Calibration {
            reference_label: "C".into(),
            reference_position: 1,
            peak_index: 0,
            peak_energy: 285.0,
            peak_counts: 10.0,
            standard_energy: 284.6,
            offset: CalibrationOffset { delta: 0.4 },
        };
        AppState::new("s.txt".into(), series, calibration)
    }

    #[test]
    fn everything_visible_initially() {
        assert_eq!(state().visible_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn toggling_and_bulk_selection() {
        let mut s = state();
        s.toggle(1);
        assert_eq!(s.visible_indices(), vec![0, 2]);
        s.toggle(7);
        s.select_none();
        assert!(s.visible_indices().is_empty());
        s.select_all();
        assert_eq!(s.visible_indices().len(), 3);
    }
}
