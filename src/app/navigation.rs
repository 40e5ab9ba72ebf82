use super::*;

impl QuizApp {
    /// Cierra la partida que hubiera (terminada o no) y muestra los niveles.
    pub fn open_tier_menu(&mut self) {
        self.abandon_quiz();
        self.message.clear();
    }

    pub fn back_to_welcome(&mut self) {
        self.abandon_quiz();
        self.state = AppState::Welcome;
    }

    /// Continúa en el nivel más alto desbloqueado.
    pub fn continue_from_progress(&mut self) {
        let tier = self.progress.unlocked;
        self.start_tier(tier);
    }

    pub fn is_tier_unlocked(&self, difficulty: Difficulty) -> bool {
        difficulty <= self.progress.unlocked
    }

    pub fn has_saved_progress(&self) -> bool {
        self.progress != LearnerProgress::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_with_bank;

    #[test]
    fn menu_after_finishing_stays_on_menu() {
        let mut app = app_with_bank(&[41], Difficulty::Hard, 1);
        app.progress.unlocked = Difficulty::Hard;
        app.start_tier(Difficulty::Hard);
        app.choose(0);
        app.submit();
        app.continue_quiz();
        assert_eq!(app.state, AppState::Finished);

        app.open_tier_menu();
        app.sync();
        assert_eq!(app.state, AppState::TierMenu);
    }
}
