use crate::config::{QuizConfig, TierThresholds};
use crate::error::QuizIssue;
use crate::model::{AnswerRecord, Difficulty, QuestionId};
use crate::view_models::{FeedbackView, FinishSummary, QuestionView};

// Submódulos
pub mod actions;
pub mod completion;
pub mod navigation;
pub mod session;
pub mod timer;
pub mod view_models;

pub use completion::tier_goal_met;
pub use session::{QuizSession, SessionStats, SubResult};
pub use timer::Countdown;

/// Ajustes del motor tomados de la configuración.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub question_seconds: u32,
    pub thresholds: TierThresholds,
    pub student_id: Option<String>,
}

impl From<&QuizConfig> for EngineSettings {
    fn from(config: &QuizConfig) -> Self {
        Self {
            question_seconds: config.question_seconds.max(1),
            thresholds: config.thresholds,
            student_id: config.student_id.clone(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings::from(&QuizConfig::default())
    }
}

/// Resultado de la última subpregunta cerrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub chosen: Option<usize>,
    pub correct: bool,
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Loading { difficulty: Difficulty, retried: bool },
    Presenting,
    Feedback(Verdict),
    TierComplete { from: Difficulty, to: Difficulty },
    Finished,
    Unavailable(QuizIssue),
}

/// Lo que el motor pide al controlador tras cada evento.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch {
        difficulty: Difficulty,
        exclude: Vec<QuestionId>,
    },
    Record(AnswerRecord),
    Notify(Notice),
}

/// Avisos para la capa de presentación.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Render(QuestionView),
    Feedback(FeedbackView),
    TierUp { from: Difficulty, to: Difficulty },
    Finished(FinishSummary),
    Issue(QuizIssue),
}

pub struct QuizEngine {
    pub settings: EngineSettings,
    pub phase: Phase,
    pub session: Option<QuizSession>,
    pub stats: SessionStats,
}

impl QuizEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            session: None,
            stats: SessionStats::default(),
        }
    }

    // Accesores
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map(|s| s.score).unwrap_or(0)
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match &self.phase {
            Phase::Loading { difficulty, .. } => Some(*difficulty),
            _ => self.session.as_ref().map(|s| s.difficulty),
        }
    }

    pub fn goal(&self, difficulty: Difficulty) -> u32 {
        self.settings.thresholds.goal_for(difficulty)
    }

    pub fn is_presenting(&self) -> bool {
        matches!(self.phase, Phase::Presenting)
    }

    pub fn has_active_countdown(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.countdown.is_some())
            .unwrap_or(false)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Finished | Phase::Unavailable(_))
    }
}
