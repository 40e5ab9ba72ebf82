// src/view_models.rs

use crate::engine::SubResult;
use crate::model::Difficulty;

/// Un nodo de la barra de progreso de la ronda.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressNode {
    pub result: SubResult,
    pub active: bool,
}

impl ProgressNode {
    pub fn symbol(&self) -> &'static str {
        match (self.result, self.active) {
            (SubResult::Correct, _) => "✔",
            (SubResult::Incorrect, _) => "✖",
            (SubResult::Unanswered, true) => "●",
            (SubResult::Unanswered, false) => "○",
        }
    }
}

/// Lo que se pinta de la subpregunta actual.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionView {
    pub difficulty: Difficulty,
    pub topic: String,
    pub round_number: u32, // 1-based dentro del nivel
    pub main_prompt: String,
    pub sub_prompt: String,
    pub step: usize, // 1-based
    pub step_count: usize,
    pub choices: Vec<String>,
    pub selected: Option<usize>,
    pub progress: Vec<ProgressNode>,
    pub remaining_seconds: u32,
    pub budget_seconds: u32,
    pub score: u32,
    pub goal: u32,
    pub warning: Option<String>,
    pub locked: bool,
}

impl QuestionView {
    pub fn header(&self) -> String {
        format!(
            "{} · {} · Ronda {}",
            self.difficulty.label(),
            self.topic,
            self.round_number
        )
    }

    pub fn step_label(&self) -> String {
        format!("Paso {} de {}", self.step, self.step_count)
    }

    pub fn timer_label(&self) -> String {
        format!("⏱ {}s", self.remaining_seconds)
    }

    /// Fracción de tiempo restante, para la barra del temporizador.
    pub fn time_fraction(&self) -> f32 {
        if self.budget_seconds == 0 {
            0.0
        } else {
            self.remaining_seconds as f32 / self.budget_seconds as f32
        }
    }
}

/// Resultado de una subpregunta ya enviada.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackView {
    pub correct: bool,
    pub timed_out: bool,
    pub chosen: Option<usize>,
    /// Sólo se desvela cuando se acertó.
    pub correct_index: Option<usize>,
    pub incorrect_feedback: Option<String>,
    pub hint: Option<String>,
    pub last_step: bool,
}

impl FeedbackView {
    pub fn headline(&self) -> &'static str {
        if self.correct {
            "✅ ¡Correcto!"
        } else if self.timed_out {
            "⏰ Se acabó el tiempo"
        } else {
            "❌ Incorrecto"
        }
    }

    pub fn continue_label(&self) -> &'static str {
        if self.last_step {
            "Terminar ronda"
        } else {
            "Siguiente paso"
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinishSummary {
    pub answered: u32,
    pub correct: u32,
    pub seconds: u64,
    pub mastered: Vec<Difficulty>,
    pub final_tier: Difficulty,
}

impl FinishSummary {
    pub fn accuracy_percent(&self) -> u32 {
        if self.answered == 0 {
            0
        } else {
            self.correct * 100 / self.answered
        }
    }

    pub fn duration_label(&self) -> String {
        format!("{}m {:02}s", self.seconds / 60, self.seconds % 60)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TierInfo {
    pub difficulty: Difficulty,
    pub unlocked: bool,
    pub mastered: bool,
    pub goal: u32,
}

impl TierInfo {
    pub fn label(&self) -> String {
        if self.mastered {
            format!("{} ✅", self.difficulty.label())
        } else if self.unlocked {
            format!("{} 🔓 ({} rondas perfectas)", self.difficulty.label(), self.goal)
        } else {
            format!("{} 🔒", self.difficulty.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_labels_show_lock_state() {
        let mut info = TierInfo {
            difficulty: Difficulty::Medium,
            unlocked: false,
            mastered: false,
            goal: 7,
        };
        assert_eq!(info.label(), "Intermedio 🔒");
        info.unlocked = true;
        assert_eq!(info.label(), "Intermedio 🔓 (7 rondas perfectas)");
        info.mastered = true;
        assert_eq!(info.label(), "Intermedio ✅");
    }

    #[test]
    fn summary_formats_time_and_accuracy() {
        let summary = FinishSummary {
            answered: 8,
            correct: 6,
            seconds: 125,
            mastered: vec![Difficulty::Easy],
            final_tier: Difficulty::Medium,
        };
        assert_eq!(summary.accuracy_percent(), 75);
        assert_eq!(summary.duration_label(), "2m 05s");
    }

    #[test]
    fn progress_symbols_follow_results() {
        let node = |result, active| ProgressNode { result, active }.symbol();
        assert_eq!(node(SubResult::Correct, true), "✔");
        assert_eq!(node(SubResult::Incorrect, false), "✖");
        assert_eq!(node(SubResult::Unanswered, true), "●");
        assert_eq!(node(SubResult::Unanswered, false), "○");
    }
}
