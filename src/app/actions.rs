use super::*;
use crate::engine::{Notice, Phase};
use crate::presenter::{Presenter, dispatch};
use log::info;

impl QuizApp {
    /// Empieza (o reinicia) una partida en el nivel elegido.
    pub fn start_tier(&mut self, difficulty: Difficulty) {
        if !self.is_tier_unlocked(difficulty) {
            self.message = format!("🔒 {} aún está bloqueado.", difficulty.label());
            return;
        }

        self.bank_run();
        self.screen = Screen::default();
        self.message.clear();
        self.last_tick = None;

        let Some(controller) = self.ensure_controller() else {
            return;
        };
        controller.abandon();
        controller.start(difficulty);
        self.run_banked = false;
        info!("▶ Partida nueva en {difficulty}");
        self.sync();
    }

    pub fn choose(&mut self, index: usize) {
        if let Some(controller) = self.controller.as_mut() {
            controller.select_choice(index);
        }
        self.sync();
    }

    pub fn submit(&mut self) {
        self.screen.warning = None;
        if let Some(controller) = self.controller.as_mut() {
            controller.submit_answer();
        }
        self.sync();
    }

    /// Botón "Continuar" tras el feedback.
    pub fn continue_quiz(&mut self) {
        self.screen.feedback = None;
        if let Some(controller) = self.controller.as_mut() {
            controller.advance();
        }
        self.sync();
    }

    pub fn acknowledge_tier_up(&mut self) {
        self.screen.tier_up = None;
        self.screen.question = None;
        if let Some(controller) = self.controller.as_mut() {
            controller.acknowledge_tier_up();
        }
        self.sync();
    }

    /// Deja la partida y vuelve al menú de niveles.
    pub fn abandon_quiz(&mut self) {
        self.bank_run();
        if let Some(controller) = self.controller.as_mut() {
            controller.abandon();
        }
        self.screen = Screen::default();
        self.last_tick = None;
        self.state = AppState::TierMenu;
    }

    /// Convierte el tiempo de reloj en ticks de un segundo.
    /// Devuelve `true` mientras haya cuenta atrás activa.
    pub fn drive_clock(&mut self, now: f64) -> bool {
        let running = self
            .controller
            .as_ref()
            .map(|c| c.engine().is_presenting() && c.engine().has_active_countdown())
            .unwrap_or(false);
        if !running {
            self.last_tick = None;
            return false;
        }

        let mut last = *self.last_tick.get_or_insert(now);
        let mut ticked = false;
        while now - last >= 1.0 {
            last += 1.0;
            ticked = true;
            if let Some(controller) = self.controller.as_mut() {
                controller.timer_tick();
                if !controller.engine().is_presenting() {
                    break;
                }
            }
        }
        self.last_tick = Some(last);
        if ticked {
            self.sync();
        }
        true
    }

    /// Recoge completions y avisos pendientes y actualiza la pantalla.
    pub fn sync(&mut self) {
        let notices: Vec<Notice> = match self.controller.as_mut() {
            Some(controller) => {
                controller.pump();
                controller.take_notices()
            }
            None => return,
        };
        for notice in &notices {
            dispatch(self, notice);
        }
        self.state = self.state_for_phase();
    }

    fn state_for_phase(&self) -> AppState {
        let Some(controller) = self.controller.as_ref() else {
            return self.state;
        };
        match controller.phase() {
            Phase::Idle => match self.state {
                AppState::Quiz | AppState::Loading | AppState::TierUp => AppState::TierMenu,
                other => other,
            },
            Phase::Loading { .. } => AppState::Loading,
            Phase::Presenting | Phase::Feedback(_) => AppState::Quiz,
            Phase::TierComplete { .. } => AppState::TierUp,
            Phase::Finished => AppState::Finished,
            Phase::Unavailable(_) => AppState::Unavailable,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.controller
            .as_ref()
            .map(|c| c.is_busy() || matches!(c.phase(), Phase::Loading { .. }))
            .unwrap_or(false)
    }
}

impl Presenter for QuizApp {
    fn render(&mut self, view: &QuestionView) {
        let same_step = self
            .screen
            .question
            .as_ref()
            .is_some_and(|q| (q.round_number, q.step) == (view.round_number, view.step));
        if !same_step {
            self.screen.warning = None;
        }
        self.screen.question = Some(view.clone());
    }

    fn show_feedback(&mut self, view: &FeedbackView) {
        self.screen.warning = None;
        self.screen.feedback = Some(view.clone());
        if let Some(question) = self.screen.question.as_mut() {
            question.locked = true;
        }
    }

    fn show_tier_up(&mut self, from: Difficulty, to: Difficulty) {
        self.unlock_after_mastery(from, to);
        self.screen.tier_up = Some((from, to));
    }

    fn show_finished(&mut self, summary: &FinishSummary) {
        self.finish_run(summary);
        self.screen.summary = Some(summary.clone());
    }

    fn show_issue(&mut self, issue: &QuizIssue) {
        if issue.is_terminal() {
            self.screen.issue = Some(issue.clone());
        } else if matches!(issue, QuizIssue::MalformedQuestion { .. }) {
            // Lo pinta la vista de la pregunta
        } else if issue.is_user_visible() {
            self.screen.warning = Some(issue.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app_with_bank, app_with_questions};

    #[test]
    fn locked_tiers_cannot_be_started() {
        let mut app = app_with_bank(&[41], Difficulty::Hard, 3);
        app.start_tier(Difficulty::Hard);
        assert!(app.message.contains("bloqueado"));
        assert_eq!(app.state, AppState::Welcome);
    }

    #[test]
    fn full_round_unlocks_next_tier() {
        let mut app = app_with_bank(&[1], Difficulty::Easy, 2);
        app.start_tier(Difficulty::Easy);
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.screen.question.as_ref().map(|q| q.step), Some(1));

        app.submit();
        assert!(app.screen.warning.is_some());

        for _ in 0..2 {
            app.choose(0);
            app.submit();
            assert!(app.screen.feedback.as_ref().is_some_and(|f| f.correct));
            app.continue_quiz();
        }
        assert_eq!(app.state, AppState::TierUp);
        assert_eq!(app.screen.tier_up, Some((Difficulty::Easy, Difficulty::Medium)));
        assert_eq!(app.progress.unlocked, Difficulty::Medium);
        assert!(app.progress.mastered.contains(&Difficulty::Easy));

        // El banco no tiene preguntas de Intermedio
        app.acknowledge_tier_up();
        assert_eq!(app.state, AppState::Unavailable);
        assert_eq!(app.screen.issue, Some(QuizIssue::ContentUnavailable));
    }

    #[test]
    fn clock_turns_seconds_into_ticks() {
        let mut app = app_with_bank(&[1], Difficulty::Easy, 2);
        app.start_tier(Difficulty::Easy);
        assert!(app.drive_clock(10.0));
        assert!(app.drive_clock(11.5));
        assert_eq!(app.screen.question.as_ref().map(|q| q.remaining_seconds), Some(2));

        // Dos segundos más agotan los 3 de presupuesto
        app.drive_clock(13.2);
        let feedback = app.screen.feedback.clone().unwrap();
        assert!(feedback.timed_out);
        assert!(!app.drive_clock(20.0));
    }

    #[test]
    fn timeout_clears_the_selection_prompt() {
        let mut app = app_with_bank(&[1], Difficulty::Easy, 2);
        app.start_tier(Difficulty::Easy);
        app.submit();
        assert!(app.screen.warning.is_some());

        app.drive_clock(0.0);
        app.drive_clock(3.5);
        assert!(app.screen.feedback.as_ref().is_some_and(|f| f.timed_out));
        assert_eq!(app.screen.warning, None);

        app.continue_quiz();
        assert_eq!(app.screen.question.as_ref().map(|q| q.step), Some(2));
        assert_eq!(app.screen.warning, None);
    }

    #[test]
    fn malformed_warning_travels_with_the_question() {
        let mut questions = crate::engine::test_support::batch(&[1], Difficulty::Easy, 2);
        questions[0].sub_questions[0].correct_answer = "X".into();
        let mut app = app_with_questions(questions);
        app.start_tier(Difficulty::Easy);

        let warning = app.screen.question.as_ref().and_then(|q| q.warning.clone());
        assert!(warning.is_some_and(|w| w.contains("no aparece")));
        assert_eq!(app.screen.warning, None);

        app.choose(0);
        app.submit();
        assert!(app.screen.feedback.as_ref().is_some_and(|f| !f.correct));
        app.continue_quiz();
        assert_eq!(app.screen.question.as_ref().and_then(|q| q.warning.clone()), None);
    }

    #[test]
    fn abandoning_returns_to_menu() {
        let mut app = app_with_bank(&[1], Difficulty::Easy, 2);
        app.start_tier(Difficulty::Easy);
        app.choose(1);
        app.submit();
        app.abandon_quiz();
        assert_eq!(app.state, AppState::TierMenu);
        assert_eq!(app.progress.answered, 1);
        assert!(app.screen.question.is_none());
    }
}
