use crate::QuizApp;
use crate::ui::layout::{centered_panel, two_button_row};
use egui::{Context, RichText};

pub fn ui_finished(app: &mut QuizApp, ctx: &Context) {
    let Some(summary) = app.screen.summary.clone() else {
        return;
    };
    let mut again = false;
    let mut menu = false;

    centered_panel(ctx, 260.0, 460.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🎉 ¡Has completado todos los niveles!");
            ui.add_space(12.0);
            ui.label(format!("Respuestas: {}", summary.answered));
            ui.label(format!(
                "Aciertos: {} ({}%)",
                summary.correct,
                summary.accuracy_percent()
            ));
            ui.label(format!("Tiempo total: {}", summary.duration_label()));
            let mastered: Vec<&str> = summary.mastered.iter().map(|d| d.label()).collect();
            ui.label(RichText::new(format!("Niveles dominados: {}", mastered.join(", "))).strong());
            ui.add_space(16.0);
            (again, menu) = two_button_row(ui, 360.0, "🔄 Jugar otra vez", "📊 Menú de niveles");
        });
    });

    if again {
        app.start_tier(crate::model::Difficulty::Easy);
    } else if menu {
        app.open_tier_menu();
    }
}
