use crate::QuizApp;
use crate::ui::layout::{centered_panel, two_button_row};
use egui::{Color32, Context, RichText};

pub fn ui_unavailable(app: &mut QuizApp, ctx: &Context) {
    let text = app
        .screen
        .issue
        .as_ref()
        .map(|issue| issue.to_string())
        .unwrap_or_else(|| "No hay preguntas disponibles.".to_string());
    let retry_tier = app.controller.as_ref().and_then(|c| c.engine().difficulty());
    let mut retry = false;
    let mut menu = false;

    centered_panel(ctx, 180.0, 460.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("😕 No se puede continuar");
            ui.add_space(10.0);
            ui.label(RichText::new(&text).color(Color32::LIGHT_RED));
            ui.add_space(16.0);
            (retry, menu) = two_button_row(ui, 360.0, "🔁 Reintentar", "📊 Menú de niveles");
        });
    });

    if retry {
        app.start_tier(retry_tier.unwrap_or(app.progress.unlocked));
    } else if menu {
        app.abandon_quiz();
    }
}
