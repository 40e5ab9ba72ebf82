use crate::QuizApp;
use egui::{Align2, Context, RichText};

/// Aviso modal de nivel superado.
pub fn ui_tier_up(app: &mut QuizApp, ctx: &Context) {
    let Some((from, to)) = app.screen.tier_up else {
        return;
    };
    let goal = app.config.thresholds.goal_for(to);
    let mut acknowledged = false;

    egui::Window::new("🏆 ¡Nivel superado!")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(format!("Has dominado el nivel {}.", from.label())).heading());
            ui.label(format!(
                "Siguiente: {} ({goal} rondas perfectas para superarlo).",
                to.label()
            ));
            ui.add_space(10.0);
            if ui.button(format!("Empezar {}", to.label())).clicked() {
                acknowledged = true;
            }
        });

    if acknowledged {
        app.acknowledge_tier_up();
    }
}
