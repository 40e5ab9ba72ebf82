use super::*;
use log::{debug, info};

impl QuizEngine {
    /// Marca una opción. Fuera de rango o fuera de `Presenting` no hace nada.
    pub fn select_choice(&mut self, index: usize) -> Vec<Effect> {
        if !self.is_presenting() {
            return Vec::new();
        }
        let session = match self.session.as_mut() {
            Some(s) if !s.submit_locked => s,
            _ => return Vec::new(),
        };
        let in_range = session
            .current_sub()
            .map(|sub| index < sub.choices.len())
            .unwrap_or(false);
        if !in_range || session.selected == Some(index) {
            return Vec::new();
        }
        session.selected = Some(index);
        self.question_view()
            .map(|view| vec![Effect::Notify(Notice::Render(view))])
            .unwrap_or_default()
    }

    /// Envía la opción marcada. Sin selección sólo avisa y sigue presentando.
    pub fn submit_answer(&mut self) -> Vec<Effect> {
        if !self.is_presenting() {
            return Vec::new();
        }
        let selected = match self.session.as_ref() {
            Some(s) if !s.submit_locked => s.selected,
            _ => return Vec::new(),
        };
        match selected {
            Some(choice) => self.finish_sub_question(Some(choice)),
            None => vec![Effect::Notify(Notice::Issue(QuizIssue::InvalidSelection))],
        }
    }

    /// Se agotó el tiempo: cuenta como fallo con el presupuesto completo.
    pub fn on_timeout(&mut self) -> Vec<Effect> {
        if !self.is_presenting() {
            return Vec::new();
        }
        match self.session.as_ref() {
            Some(s) if !s.submit_locked => {}
            _ => return Vec::new(),
        }
        info!("⏰ Tiempo agotado");
        self.finish_sub_question(None)
    }

    /// Un segundo de reloj. Al llegar a cero dispara `on_timeout`.
    pub fn timer_tick(&mut self) -> Vec<Effect> {
        if !self.is_presenting() {
            return Vec::new();
        }
        let expired = match self.session.as_mut().and_then(|s| s.countdown.as_mut()) {
            Some(countdown) => countdown.tick(),
            None => return Vec::new(),
        };
        if expired {
            return self.on_timeout();
        }
        self.question_view()
            .map(|view| vec![Effect::Notify(Notice::Render(view))])
            .unwrap_or_default()
    }

    fn finish_sub_question(&mut self, choice: Option<usize>) -> Vec<Effect> {
        let budget = self.settings.question_seconds;
        let student_id = self.settings.student_id.clone();
        let session = match self.session.as_mut() {
            Some(s) => s,
            None => return Vec::new(),
        };
        session.submit_locked = true;
        let countdown = session.cancel_countdown();

        let (main_question_id, sub_question_id, correct) =
            match (session.current_main(), session.current_sub()) {
                (Some(main), Some(sub)) => {
                    // Mal formada: nunca puede acertarse
                    let correct = sub.malformed().is_none()
                        && choice.map(|c| sub.is_correct_choice(c)).unwrap_or(false);
                    (main.id, sub.id, correct)
                }
                _ => return Vec::new(),
            };

        let elapsed = match (choice, countdown) {
            (Some(_), Some(c)) => c.elapsed(),
            _ => budget,
        };

        if let Some(slot) = session.results.get_mut(session.sub_idx) {
            *slot = if correct {
                SubResult::Correct
            } else {
                SubResult::Incorrect
            };
        }
        if !correct {
            session.round_perfect = false;
        }
        let difficulty = session.difficulty;

        self.stats.answered += 1;
        if correct {
            self.stats.correct += 1;
        }
        self.stats.seconds_spent += u64::from(elapsed);

        debug!("Subpregunta {sub_question_id}: correcta={correct} en {elapsed}s");

        let verdict = Verdict {
            chosen: choice,
            correct,
            timed_out: choice.is_none(),
        };
        self.phase = Phase::Feedback(verdict);

        let mut effects = vec![Effect::Record(AnswerRecord {
            student_id,
            sub_question_id,
            main_question_id,
            is_correct: correct,
            time_taken_seconds: elapsed,
            difficulty,
        })];
        if let Some(view) = self.feedback_view(verdict) {
            effects.push(Effect::Notify(Notice::Feedback(view)));
        }
        effects
    }
}
