use crate::QuizApp;
use crate::ui::layout::centered_panel;
use egui::Context;

pub fn ui_loading(app: &mut QuizApp, ctx: &Context) {
    let tier = app
        .controller
        .as_ref()
        .and_then(|c| c.engine().difficulty())
        .map(|d| d.label())
        .unwrap_or("");
    centered_panel(ctx, 120.0, 400.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.spinner();
            ui.add_space(8.0);
            ui.label(format!("⏳ Cargando preguntas {tier}..."));
        });
    });
}
