use crate::config::QuizConfig;
use crate::controller::QuizController;
use crate::error::QuizIssue;
use crate::model::{AppState, Difficulty};
use crate::view_models::{FeedbackView, FinishSummary, QuestionView};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// Submódulos
pub mod actions;
pub mod completion;
pub mod navigation;
pub mod resets;
pub mod view_models;

// Re-export de view models
pub use crate::view_models::TierInfo;

/// Lo que se guarda entre sesiones con la persistencia de eframe.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LearnerProgress {
    pub unlocked: Difficulty, // Nivel más alto desbloqueado
    pub mastered: BTreeSet<Difficulty>,
    pub answered: u32,
    pub correct: u32,
    pub seconds: u64,
    pub finished_runs: u32,
}

impl Default for LearnerProgress {
    fn default() -> Self {
        Self {
            unlocked: Difficulty::Easy,
            mastered: BTreeSet::new(),
            answered: 0,
            correct: 0,
            seconds: 0,
            finished_runs: 0,
        }
    }
}

/// Último estado pintable recibido del controlador.
#[derive(Clone, Debug, Default)]
pub struct Screen {
    pub question: Option<QuestionView>,
    pub feedback: Option<FeedbackView>,
    pub tier_up: Option<(Difficulty, Difficulty)>,
    pub summary: Option<FinishSummary>,
    pub issue: Option<QuizIssue>,
    pub warning: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct QuizApp {
    pub progress: LearnerProgress,
    pub message: String,
    #[serde(skip)]
    pub state: AppState,
    #[serde(skip)]
    pub config: QuizConfig,
    #[serde(skip)]
    pub controller: Option<QuizController>,
    #[serde(skip)]
    pub screen: Screen,
    #[serde(skip)]
    pub last_tick: Option<f64>,
    #[serde(skip)]
    pub run_banked: bool,
    #[serde(skip)]
    pub confirm_reset: bool,
}

impl Default for QuizApp {
    fn default() -> Self {
        QuizApp::new(QuizConfig::default())
    }
}

impl QuizApp {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            progress: LearnerProgress::default(),
            message: String::new(),
            state: AppState::Welcome,
            config,
            controller: None,
            screen: Screen::default(),
            last_tick: None,
            run_banked: true,
            confirm_reset: false,
        }
    }

    /// Recupera el progreso guardado y aplica la configuración actual.
    pub fn restored(saved: Option<QuizApp>, config: QuizConfig) -> Self {
        let mut app = QuizApp::new(config);
        if let Some(saved) = saved {
            app.progress = saved.progress;
        }
        app
    }

    /// Crea el controlador la primera vez que hace falta.
    pub(crate) fn ensure_controller(&mut self) -> Option<&mut QuizController> {
        if self.controller.is_none() {
            match QuizController::from_config(&self.config) {
                Ok(controller) => self.controller = Some(controller),
                Err(err) => {
                    warn!("No se pudo preparar el backend: {err}");
                    self.screen.issue = Some(QuizIssue::StoreUnavailable(err.to_string()));
                    self.state = AppState::Unavailable;
                    return None;
                }
            }
        }
        self.controller.as_mut()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::controller::{Backends, Executor};
    use crate::data::EmbeddedStore;
    use crate::engine::EngineSettings;
    use crate::engine::test_support::batch;
    use crate::recorder::{OfflineRecorder, ReplayQueue};
    use std::sync::Arc;

    /// App con un banco fijo y ejecución en línea.
    pub(crate) fn app_with_bank(ids: &[i64], difficulty: Difficulty, steps: u32) -> QuizApp {
        app_with_questions(batch(ids, difficulty, steps))
    }

    pub(crate) fn app_with_questions(questions: Vec<crate::model::MainQuestion>) -> QuizApp {
        let mut app = QuizApp::new(QuizConfig::default());
        let settings = EngineSettings {
            question_seconds: 3,
            thresholds: crate::config::TierThresholds {
                easy: 1,
                medium: 1,
                hard: 1,
            },
            student_id: None,
        };
        let backends = Backends {
            store: Arc::new(EmbeddedStore::with_questions(questions, 5)),
            recorder: Arc::new(OfflineRecorder),
            queue: ReplayQueue::in_memory(),
        };
        app.controller = Some(QuizController::new(settings, backends, Executor::Inline));
        app
    }

    #[test]
    fn restoring_keeps_only_progress() {
        let mut saved = QuizApp::default();
        saved.progress.unlocked = Difficulty::Hard;
        saved.state = AppState::Quiz;
        let app = QuizApp::restored(Some(saved), QuizConfig::default());
        assert_eq!(app.progress.unlocked, Difficulty::Hard);
        assert_eq!(app.state, AppState::Welcome);
        assert!(app.controller.is_none());
    }

    #[test]
    fn progress_survives_serialization() {
        let mut app = QuizApp::default();
        app.progress.mastered.insert(Difficulty::Easy);
        app.progress.unlocked = Difficulty::Medium;
        let json = serde_json::to_string(&app).unwrap();
        let back: QuizApp = serde_json::from_str(&json).unwrap();
        assert_eq!(back.progress, app.progress);
    }
}
