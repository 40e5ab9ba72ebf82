use crate::config::QuizConfig;
use crate::data::EmbeddedStore;
use crate::engine::{Effect, EngineSettings, Notice, Phase, QuizEngine};
use crate::error::{QuizIssue, RecordError, StoreError};
use crate::model::{AnswerRecord, Difficulty, MainQuestion};
use crate::presenter::{Presenter, dispatch};
use crate::recorder::{
    AnswerRecorder, OfflineRecorder, ReplayQueue, ReplayReport, deliver_in_order,
};
use crate::store::QuestionStore;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Dónde se ejecutan las llamadas al banco y al registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executor {
    /// En el mismo hilo (wasm y tests).
    Inline,
    /// Un hilo por trabajo.
    #[cfg(not(target_arch = "wasm32"))]
    Threaded,
}

impl Executor {
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Executor::Inline => job(),
            #[cfg(not(target_arch = "wasm32"))]
            Executor::Threaded => {
                std::thread::spawn(job);
            }
        }
    }

    pub fn for_platform() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Executor::Threaded
        }
        #[cfg(target_arch = "wasm32")]
        {
            Executor::Inline
        }
    }
}

/// Resultado de un trabajo de IO, de vuelta al hilo de eventos.
#[derive(Debug)]
pub enum Completion {
    Fetched {
        epoch: u64,
        result: Result<Vec<MainQuestion>, StoreError>,
    },
    Recorded {
        epoch: u64,
        record: AnswerRecord,
        result: Result<(), RecordError>,
    },
    Replayed(ReplayReport),
}

pub struct Backends {
    pub store: Arc<dyn QuestionStore>,
    pub recorder: Arc<dyn AnswerRecorder>,
    pub queue: ReplayQueue,
}

impl Backends {
    /// Backend REST si hay URL configurada; si no, el banco embebido.
    pub fn from_config(config: &QuizConfig) -> Result<Self, StoreError> {
        #[cfg(not(target_arch = "wasm32"))]
        let queue = ReplayQueue::open(Box::new(crate::recorder::FileQueueStorage::new(
            &config.replay_queue_path,
        )));
        #[cfg(target_arch = "wasm32")]
        let queue = ReplayQueue::open(Box::new(crate::recorder::LocalStorageQueue::new(
            "mastery_quiz_queue",
        )));

        #[cfg(not(target_arch = "wasm32"))]
        if config.backend.url.is_some() {
            let backend = Arc::new(crate::remote::RestBackend::new(
                &config.backend,
                config.batch_size,
            )?);
            info!("🌐 Usando backend remoto {}", backend.base_url());
            return Ok(Self {
                store: backend.clone(),
                recorder: backend,
                queue,
            });
        }

        info!("📚 Usando el banco de preguntas embebido");
        Ok(Self {
            store: Arc::new(EmbeddedStore::new(config.batch_size)?),
            recorder: Arc::new(OfflineRecorder),
            queue,
        })
    }
}

/// Dueño del motor: ejecuta sus efectos y devuelve los resultados como eventos.
pub struct QuizController {
    engine: QuizEngine,
    store: Arc<dyn QuestionStore>,
    recorder: Arc<dyn AnswerRecorder>,
    queue: ReplayQueue,
    executor: Executor,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    epoch: u64,
    replay_in_flight: bool,
    // Respuestas nuevas retenidas hasta que termine el reenvío
    held: Vec<(u64, AnswerRecord)>,
    in_flight: usize,
    notices: Vec<Notice>,
}

impl QuizController {
    pub fn new(settings: EngineSettings, backends: Backends, executor: Executor) -> Self {
        let (tx, rx) = channel();
        Self {
            engine: QuizEngine::new(settings),
            store: backends.store,
            recorder: backends.recorder,
            queue: backends.queue,
            executor,
            tx,
            rx,
            epoch: 0,
            replay_in_flight: false,
            held: Vec::new(),
            in_flight: 0,
            notices: Vec::new(),
        }
    }

    pub fn from_config(config: &QuizConfig) -> Result<Self, StoreError> {
        Ok(Self::new(
            EngineSettings::from(config),
            Backends::from_config(config)?,
            Executor::for_platform(),
        ))
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn phase(&self) -> &Phase {
        self.engine.phase()
    }

    pub fn pending_records(&self) -> usize {
        self.queue.len()
    }

    /// Hay trabajos de IO sin completar.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    // Eventos

    /// Partida nueva: primero reenvía lo pendiente y luego pide preguntas.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.replay_pending();
        let effects = self.engine.start(difficulty);
        self.handle(effects);
        self.pump();
    }

    pub fn select_choice(&mut self, index: usize) {
        let effects = self.engine.select_choice(index);
        self.handle(effects);
        self.pump();
    }

    pub fn submit_answer(&mut self) {
        let effects = self.engine.submit_answer();
        self.handle(effects);
        self.pump();
    }

    pub fn timer_tick(&mut self) {
        let effects = self.engine.timer_tick();
        self.handle(effects);
        self.pump();
    }

    pub fn advance(&mut self) {
        let effects = self.engine.advance();
        self.handle(effects);
        self.pump();
    }

    pub fn acknowledge_tier_up(&mut self) {
        let effects = self.engine.acknowledge_tier_up();
        self.handle(effects);
        self.pump();
    }

    /// Deja la partida; lo que esté en vuelo se descartará al llegar.
    pub fn abandon(&mut self) {
        self.engine.abandon();
        self.epoch += 1;
        self.notices.clear();
        debug!("Controlador en época {}", self.epoch);
    }

    /// Procesa las completions recibidas. Devuelve `true` si hubo alguna.
    pub fn pump(&mut self) -> bool {
        let mut any = false;
        while let Ok(completion) = self.rx.try_recv() {
            any = true;
            self.in_flight = self.in_flight.saturating_sub(1);
            self.on_completion(completion);
        }
        any
    }

    /// Entrega los avisos acumulados a la capa de presentación.
    pub fn present(&mut self, presenter: &mut impl Presenter) {
        for notice in std::mem::take(&mut self.notices) {
            dispatch(presenter, &notice);
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn handle(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch {
                    difficulty,
                    exclude,
                } => {
                    let store = Arc::clone(&self.store);
                    let tx = self.tx.clone();
                    let epoch = self.epoch;
                    self.in_flight += 1;
                    self.executor.spawn(move || {
                        let result = store.fetch_questions(difficulty, &exclude);
                        let _ = tx.send(Completion::Fetched { epoch, result });
                    });
                }
                Effect::Record(record) if self.replay_in_flight => {
                    debug!("Respuesta {} en espera del reenvío", record.sub_question_id);
                    self.held.push((self.epoch, record));
                }
                Effect::Record(record) => self.spawn_record(self.epoch, record),
                Effect::Notify(notice) => self.notices.push(notice),
            }
        }
    }

    fn spawn_record(&mut self, epoch: u64, record: AnswerRecord) {
        let recorder = Arc::clone(&self.recorder);
        let tx = self.tx.clone();
        self.in_flight += 1;
        self.executor.spawn(move || {
            let result = recorder.record_answer(&record);
            let _ = tx.send(Completion::Recorded {
                epoch,
                record,
                result,
            });
        });
    }

    /// Suelta las respuestas retenidas. Si el reenvío se cortó van a la cola, detrás.
    fn release_held(&mut self, replay_failed: bool) {
        for (epoch, record) in std::mem::take(&mut self.held) {
            if replay_failed {
                self.queue.enqueue(record);
            } else {
                self.spawn_record(epoch, record);
            }
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched { epoch, result } => {
                if epoch != self.epoch {
                    debug!("Lote de una partida abandonada, se descarta");
                    return;
                }
                let effects = self.engine.questions_loaded(result);
                self.handle(effects);
            }
            Completion::Recorded {
                epoch,
                record,
                result,
            } => match result {
                Ok(()) => debug!("Respuesta {} registrada", record.sub_question_id),
                Err(_) if epoch != self.epoch => {
                    debug!("Registro fallido de una partida abandonada, se descarta");
                }
                Err(err) => {
                    let issue = QuizIssue::RecordingDeferred {
                        sub_question_id: record.sub_question_id,
                        reason: err.to_string(),
                    };
                    warn!("{issue}");
                    self.queue.enqueue(record);
                }
            },
            Completion::Replayed(report) => {
                self.replay_in_flight = false;
                self.queue.acknowledge(report.delivered);
                self.release_held(report.failure.is_some());
                match report.failure {
                    Some(err) => warn!(
                        "Reenvío detenido tras {} respuestas: {err}",
                        report.delivered
                    ),
                    None if report.delivered > 0 => {
                        info!("📤 {} respuestas pendientes sincronizadas", report.delivered)
                    }
                    None => {}
                }
            }
        }
    }

    fn replay_pending(&mut self) {
        if self.replay_in_flight || self.queue.is_empty() {
            return;
        }
        let pending = self.queue.snapshot();
        let recorder = Arc::clone(&self.recorder);
        let tx = self.tx.clone();
        self.replay_in_flight = true;
        self.in_flight += 1;
        info!("🔁 Reenviando {} respuestas pendientes", pending.len());
        self.executor.spawn(move || {
            let report = deliver_in_order(recorder.as_ref(), &pending);
            let _ = tx.send(Completion::Replayed(report));
        });
    }
}
