use super::*;
use eframe::egui;
use log::info;

impl QuizApp {
    pub fn reset_progress(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.abandon();
        }
        self.progress = LearnerProgress::default();
        self.screen = Screen::default();
        self.last_tick = None;
        self.run_banked = true;
        self.confirm_reset = false;
        self.message.clear();
        self.state = AppState::Welcome;
        info!("Progreso borrado");
    }

    pub fn confirm_reset(&mut self, ctx: &egui::Context) {
        egui::Window::new("Confirmar reinicio")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("¿Seguro que quieres borrar todo tu progreso? ¡Esta acción no se puede deshacer!");
                ui.horizontal(|ui| {
                    if ui.button("Sí, borrar").clicked() {
                        self.reset_progress();
                    }
                    if ui.button("No").clicked() {
                        self.confirm_reset = false;
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_relocks_everything() {
        let mut app = QuizApp::default();
        app.progress.unlocked = Difficulty::Hard;
        app.progress.answered = 40;
        app.confirm_reset = true;
        app.state = AppState::TierMenu;
        assert!(app.has_saved_progress());

        app.reset_progress();
        assert_eq!(app.progress, LearnerProgress::default());
        assert!(!app.confirm_reset);
        assert_eq!(app.state, AppState::Welcome);
        assert!(!app.is_tier_unlocked(Difficulty::Medium));
    }
}
