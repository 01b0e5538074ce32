use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(state.source.as_str());
        ui.separator();
        ui.checkbox(&mut state.minmax_scaling, "Min-max scaling");
    });
}

// ---------------------------------------------------------------------------
// Left side panel – calibration summary and category toggles
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Calibration");
    ui.separator();

    let cal = &state.calibration;
    egui::Grid::new("calibration_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Reference");
            ui.monospace(cal.reference_label.as_str());
            ui.end_row();
            ui.label("Peak energy");
            ui.monospace(format!("{:.2} eV", cal.peak_energy));
            ui.end_row();
            ui.label("Standard");
            ui.monospace(format!("{:.2} eV", cal.standard_energy));
            ui.end_row();
            ui.label("Delta");
            ui.monospace(format!("{:+.3} eV", cal.offset.delta));
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.heading("Categories");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, series) in state.series.iter().enumerate() {
                let color = state.color_map.color_for(&series.label);
                let mut visible = state.visible[i];
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(color));
                    if ui.checkbox(&mut visible, series.label.as_str()).changed() {
                        toggled = Some(i);
                    }
                    ui.label(
                        RichText::new(format!("{} pts", series.points.len()))
                            .small()
                            .color(Color32::GRAY),
                    );
                });
            }
        });
    if let Some(i) = toggled {
        state.toggle(i);
    }
}
