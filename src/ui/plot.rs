use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectral plot (central panel)
// ---------------------------------------------------------------------------

/// Render the calibrated spectra in the central panel.
///
/// Binding energy is drawn decreasing left to right, so x values are negated
/// for drawing and the axis formatter shows them back as positive energies.
pub fn spectral_plot(ui: &mut Ui, state: &AppState) {
    if state.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No categories to plot besides the reference and excluded ones");
        });
        return;
    }

    Plot::new("spectral_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Energy (eV)")
        .y_axis_label("Counts")
        .x_axis_formatter(|mark, _range| format!("{:.1}", -mark.value))
        .label_formatter(|name, value| {
            let prefix = if name.is_empty() {
                String::new()
            } else {
                format!("{name}\n")
            };
            format!("{prefix}E = {:.2} eV\ncounts = {:.1}", -value.x, value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for idx in state.visible_indices() {
                let series = &state.series[idx];
                let color = state.color_map.color_for(&series.label);

                let y_values: Vec<f64> = if state.minmax_scaling {
                    let min = series.points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
                    let max = series.points.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
                    let range = max - min;
                    if range.abs() < f64::EPSILON {
                        vec![0.0; series.points.len()]
                    } else {
                        series.points.iter().map(|p| (p[1] - min) / range).collect()
                    }
                } else {
                    series.points.iter().map(|p| p[1]).collect()
                };

                let points: PlotPoints = series
                    .points
                    .iter()
                    .zip(y_values.iter())
                    .map(|(p, &yi)| [-p[0], yi])
                    .collect();

                let line = Line::new(points)
                    .name(&series.title)
                    .color(color)
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
