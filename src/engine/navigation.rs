use super::*;
use crate::error::StoreError;
use crate::model::MainQuestion;
use log::{debug, error, info, warn};

impl QuizEngine {
    /// Empieza una partida nueva en `difficulty` (totales a cero).
    pub fn start(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        self.stats = SessionStats::default();
        self.start_tier(difficulty)
    }

    /// Sesión nueva para el nivel (puntuación 0) y petición del primer lote.
    pub fn start_tier(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        self.cancel_countdown();
        info!("🎯 Empezando nivel {difficulty}");
        self.session = Some(QuizSession::new(difficulty));
        self.request_batch(difficulty)
    }

    /// Pide otro lote del mismo nivel conservando puntuación y completadas.
    fn refill_tier(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        self.cancel_countdown();
        debug!("Lote agotado en {difficulty}, se pide otro");
        self.request_batch(difficulty)
    }

    fn request_batch(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        let exclude = self
            .session
            .as_ref()
            .map(|s| s.exclude_ids())
            .unwrap_or_default();
        self.phase = Phase::Loading {
            difficulty,
            retried: false,
        };
        vec![Effect::Fetch {
            difficulty,
            exclude,
        }]
    }

    /// Llega la respuesta del banco. Fuera de `Loading` se ignora.
    pub fn questions_loaded(
        &mut self,
        result: Result<Vec<MainQuestion>, StoreError>,
    ) -> Vec<Effect> {
        let (difficulty, retried) = match self.phase {
            Phase::Loading {
                difficulty,
                retried,
            } => (difficulty, retried),
            _ => {
                debug!("Lote de preguntas fuera de tiempo, se descarta");
                return Vec::new();
            }
        };

        let batch = match result {
            Ok(batch) => batch,
            Err(err) => {
                error!("No se pudieron cargar preguntas de {difficulty}: {err}");
                return self.become_unavailable(QuizIssue::StoreUnavailable(err.to_string()));
            }
        };

        let batch: Vec<MainQuestion> = batch
            .into_iter()
            .filter(|mq| {
                if mq.sub_questions.is_empty() {
                    warn!("La principal {} no tiene subpreguntas, se omite", mq.id);
                    false
                } else {
                    true
                }
            })
            .collect();

        let session = match self.session.as_mut() {
            Some(s) => s,
            None => return self.become_unavailable(QuizIssue::ContentUnavailable),
        };

        if batch.is_empty() {
            // Contenido agotado: se recicla una sola vez
            if !retried && !session.completed_ids.is_empty() {
                info!("♻️ Sin preguntas nuevas en {difficulty}, se reciclan las completadas");
                session.completed_ids.clear();
                self.phase = Phase::Loading {
                    difficulty,
                    retried: true,
                };
                return vec![Effect::Fetch {
                    difficulty,
                    exclude: Vec::new(),
                }];
            }
            warn!("No hay preguntas para {difficulty}");
            return self.become_unavailable(QuizIssue::ContentUnavailable);
        }

        debug!("Lote de {} principales para {difficulty}", batch.len());
        session.load_batch(batch);
        self.present_current()
    }

    /// Presenta la subpregunta actual con una cuenta atrás nueva.
    pub(crate) fn present_current(&mut self) -> Vec<Effect> {
        let budget = self.settings.question_seconds;
        let session = match self.session.as_mut() {
            Some(s) => s,
            None => return Vec::new(),
        };

        let malformed = match session.current_sub() {
            Some(sub) => sub.malformed().map(|reason| (sub.id, reason)),
            None => {
                // No debería pasar: las principales vacías se filtran al cargar
                warn!("Índices fuera del lote ({}, {})", session.main_idx, session.sub_idx);
                return self.next_main();
            }
        };

        if session.restart_countdown(budget) {
            debug!("Cuenta atrás anterior cancelada");
        }
        session.selected = None;
        session.submit_locked = false;
        self.phase = Phase::Presenting;

        let mut effects = Vec::new();
        if let Some((sub_question_id, reason)) = malformed {
            warn!("Subpregunta {sub_question_id} mal formada: {reason}");
            effects.push(Effect::Notify(Notice::Issue(QuizIssue::MalformedQuestion {
                sub_question_id,
                reason,
            })));
        }
        if let Some(view) = self.question_view() {
            effects.push(Effect::Notify(Notice::Render(view)));
        }
        effects
    }

    /// "Continuar" tras el feedback. Sólo vale en `Feedback`; repetirlo no hace nada.
    pub fn advance(&mut self) -> Vec<Effect> {
        if !matches!(self.phase, Phase::Feedback(_)) {
            return Vec::new();
        }
        let has_next_sub = match self.session.as_mut() {
            Some(session) => {
                if session.has_next_sub() {
                    session.sub_idx += 1;
                    true
                } else {
                    false
                }
            }
            None => return Vec::new(),
        };

        if has_next_sub {
            self.present_current()
        } else {
            self.complete_round()
        }
    }

    /// Siguiente principal del lote, o un lote nuevo si se acabó.
    pub(crate) fn next_main(&mut self) -> Vec<Effect> {
        let (difficulty, exhausted) = match self.session.as_mut() {
            Some(session) => {
                session.main_idx += 1;
                session.reset_round();
                (
                    session.difficulty,
                    session.main_idx >= session.questions.len(),
                )
            }
            None => return Vec::new(),
        };

        if exhausted {
            self.refill_tier(difficulty)
        } else {
            self.present_current()
        }
    }

    /// Tras el aviso de subida de nivel, arranca el siguiente con puntuación 0.
    pub fn acknowledge_tier_up(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::TierComplete { to, .. } => self.start_tier(to),
            _ => Vec::new(),
        }
    }

    /// Abandono: sin cuenta atrás ni sesión.
    pub fn abandon(&mut self) {
        self.cancel_countdown();
        self.session = None;
        self.phase = Phase::Idle;
        debug!("Sesión abandonada");
    }

    fn cancel_countdown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel_countdown();
        }
    }

    fn become_unavailable(&mut self, issue: QuizIssue) -> Vec<Effect> {
        self.cancel_countdown();
        self.phase = Phase::Unavailable(issue.clone());
        vec![Effect::Notify(Notice::Issue(issue))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;

    #[test]
    fn start_requests_a_batch_without_exclusions() {
        let mut engine = QuizEngine::new(settings(10));
        let effects = engine.start(Difficulty::Easy);
        assert_eq!(fetches(&effects), vec![(Difficulty::Easy, vec![])]);
        assert!(matches!(engine.phase, Phase::Loading { retried: false, .. }));
    }

    #[test]
    fn loaded_batch_presents_first_sub_question() {
        let mut engine = QuizEngine::new(settings(10));
        engine.start(Difficulty::Easy);
        let effects = engine.questions_loaded(Ok(batch(&[1, 2], Difficulty::Easy, 2)));
        assert!(engine.is_presenting());
        assert!(has_notice(&effects, |n| matches!(n, Notice::Render(v) if v.step == 1)));
        let session = engine.session().unwrap();
        assert_eq!((session.main_idx, session.sub_idx), (0, 0));
        assert_eq!(session.countdown.map(|c| c.remaining()), Some(60));
    }

    #[test]
    fn store_failure_is_terminal() {
        let mut engine = QuizEngine::new(settings(10));
        engine.start(Difficulty::Medium);
        let effects = engine.questions_loaded(Err(StoreError::Connection("caído".into())));
        assert!(matches!(
            engine.phase,
            Phase::Unavailable(QuizIssue::StoreUnavailable(_))
        ));
        assert!(fetches(&effects).is_empty());
        assert!(engine.is_terminal());
    }

    #[test]
    fn empty_store_without_exclusions_does_not_retry() {
        let mut engine = QuizEngine::new(settings(10));
        engine.start(Difficulty::Hard);
        let effects = engine.questions_loaded(Ok(vec![]));
        assert!(fetches(&effects).is_empty());
        assert_eq!(engine.phase, Phase::Unavailable(QuizIssue::ContentUnavailable));
    }

    #[test]
    fn exhausted_content_is_recycled_once() {
        let mut engine = presenting(settings(10), Difficulty::Easy, batch(&[1], Difficulty::Easy, 1));
        // Ronda fallada: la principal queda completada y se pide otro lote
        let effects = answer(&mut engine, false);
        assert_eq!(fetches(&effects), vec![(Difficulty::Easy, vec![1])]);

        let retry = engine.questions_loaded(Ok(vec![]));
        assert_eq!(fetches(&retry), vec![(Difficulty::Easy, vec![])]);
        assert!(engine.session().unwrap().completed_ids.is_empty());

        // Segunda vez vacío: se acabó, sin bucle infinito
        let last = engine.questions_loaded(Ok(vec![]));
        assert!(fetches(&last).is_empty());
        assert_eq!(engine.phase, Phase::Unavailable(QuizIssue::ContentUnavailable));
    }

    #[test]
    fn main_questions_without_steps_are_skipped() {
        let mut engine = QuizEngine::new(settings(10));
        engine.start(Difficulty::Easy);
        let mut questions = batch(&[1, 2], Difficulty::Easy, 2);
        questions[0].sub_questions.clear();
        engine.questions_loaded(Ok(questions));
        assert_eq!(engine.session().unwrap().current_main().map(|m| m.id), Some(2));
    }

    #[test]
    fn late_batches_are_ignored() {
        let mut engine = presenting(settings(10), Difficulty::Easy, batch(&[1], Difficulty::Easy, 2));
        let effects = engine.questions_loaded(Ok(batch(&[7], Difficulty::Easy, 2)));
        assert!(effects.is_empty());
        assert_eq!(engine.session().unwrap().current_main().map(|m| m.id), Some(1));
    }

    #[test]
    fn advance_is_idempotent() {
        let mut engine = presenting(settings(10), Difficulty::Easy, batch(&[1], Difficulty::Easy, 3));
        engine.select_choice(0);
        engine.submit_answer();
        assert!(!engine.advance().is_empty());
        let snapshot = engine.session().cloned();
        assert!(engine.advance().is_empty());
        assert_eq!(engine.session().cloned(), snapshot);
        assert_eq!(engine.session().unwrap().sub_idx, 1);
    }

    #[test]
    fn abandon_cancels_the_countdown() {
        let mut engine = presenting(settings(10), Difficulty::Easy, batch(&[1], Difficulty::Easy, 2));
        assert!(engine.has_active_countdown());
        engine.abandon();
        assert!(!engine.has_active_countdown());
        assert_eq!(engine.phase, Phase::Idle);
        assert!(engine.timer_tick().is_empty());
        assert!(engine.submit_answer().is_empty());
    }

    #[test]
    fn exhausted_batch_refetches_excluding_completed() {
        let mut engine = presenting(settings(10), Difficulty::Easy, batch(&[1, 2, 3], Difficulty::Easy, 2));
        let mut effects = Vec::new();
        for _ in 0..3 {
            // ronda imperfecta: no suma y no alcanza el objetivo
            assert!(fetches(&answer(&mut engine, false)).is_empty());
            effects = answer(&mut engine, true);
        }
        assert_eq!(fetches(&effects), vec![(Difficulty::Easy, vec![1, 2, 3])]);
        assert_eq!(engine.score(), 0);
        assert!(matches!(engine.phase, Phase::Loading { difficulty: Difficulty::Easy, .. }));

        engine.questions_loaded(Ok(batch(&[4], Difficulty::Easy, 2)));
        let session = engine.session().unwrap();
        assert_eq!(session.main_idx, 0);
        assert_eq!(session.current_main().map(|m| m.id), Some(4));
    }
}
