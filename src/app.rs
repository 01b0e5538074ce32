use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyXpsApp {
    pub state: AppState,
}

impl RustyXpsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RustyXpsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: source file and display options ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: calibration and categories ----
        egui::SidePanel::left("category_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectral_plot(ui, &self.state);
        });
    }
}

/// Open the viewer window and block until it is closed.
pub fn show(state: AppState) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = format!("Rusty XPS – {}", state.source);
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(RustyXpsApp::new(state)))),
    )
}
