use super::timer::Countdown;
use crate::model::{Difficulty, MainQuestion, QuestionId, SubQuestion};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubResult {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

/// Estado de un nivel en curso. Se sustituye por uno nuevo al subir de nivel.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub difficulty: Difficulty,
    pub questions: Vec<MainQuestion>,
    pub main_idx: usize, // Índice de la principal dentro del lote
    pub sub_idx: usize,  // Índice de la subpregunta dentro de la principal
    pub score: u32,      // Rondas perfectas en este nivel
    pub round_perfect: bool,
    pub results: Vec<SubResult>,
    pub completed_ids: BTreeSet<QuestionId>,
    pub countdown: Option<Countdown>,
    pub selected: Option<usize>,
    pub submit_locked: bool,
    pub rounds_played: u32,
}

impl QuizSession {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            questions: Vec::new(),
            main_idx: 0,
            sub_idx: 0,
            score: 0,
            round_perfect: true,
            results: Vec::new(),
            completed_ids: BTreeSet::new(),
            countdown: None,
            selected: None,
            submit_locked: false,
            rounds_played: 0,
        }
    }

    pub fn current_main(&self) -> Option<&MainQuestion> {
        self.questions.get(self.main_idx)
    }

    pub fn current_sub(&self) -> Option<&SubQuestion> {
        self.current_main()?.sub_questions.get(self.sub_idx)
    }

    pub fn has_next_sub(&self) -> bool {
        self.current_main()
            .map(|mq| self.sub_idx + 1 < mq.sub_questions.len())
            .unwrap_or(false)
    }

    /// Nuevo lote: vuelve a la principal 0 con la ronda limpia.
    pub fn load_batch(&mut self, questions: Vec<MainQuestion>) {
        self.questions = questions;
        self.main_idx = 0;
        self.reset_round();
    }

    pub fn reset_round(&mut self) {
        self.sub_idx = 0;
        self.round_perfect = true;
        let steps = self
            .current_main()
            .map(|mq| mq.sub_questions.len())
            .unwrap_or(0);
        self.results = vec![SubResult::Unanswered; steps];
    }

    /// Arranca una cuenta atrás nueva; la anterior queda cancelada.
    /// Devuelve `true` si había otra activa.
    pub fn restart_countdown(&mut self, budget: u32) -> bool {
        self.countdown.replace(Countdown::start(budget)).is_some()
    }

    pub fn cancel_countdown(&mut self) -> Option<Countdown> {
        self.countdown.take()
    }

    pub fn exclude_ids(&self) -> Vec<QuestionId> {
        self.completed_ids.iter().copied().collect()
    }
}

/// Totales de toda la partida; sobreviven a los cambios de nivel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub answered: u32,
    pub correct: u32,
    pub seconds_spent: u64,
    pub perfect_rounds: u32,
    pub mastered: Vec<Difficulty>,
}
