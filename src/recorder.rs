use crate::error::{QueueError, RecordError};
use crate::model::AnswerRecord;
use log::{info, warn};
use std::collections::VecDeque;

/// Destino de cada subpregunta respondida.
pub trait AnswerRecorder: Send + Sync {
    fn record_answer(&self, record: &AnswerRecord) -> Result<(), RecordError>;
}

/// Sin backend: deja constancia en el log y da la respuesta por registrada.
pub struct OfflineRecorder;

impl AnswerRecorder for OfflineRecorder {
    fn record_answer(&self, record: &AnswerRecord) -> Result<(), RecordError> {
        info!(
            "📝 Respuesta local: subpregunta {} ({}) correcta={} en {}s",
            record.sub_question_id, record.difficulty, record.is_correct, record.time_taken_seconds
        );
        Ok(())
    }
}

/// Persistencia de la cola de reenvío.
pub trait QueueStorage: Send {
    fn load(&self) -> Result<Vec<AnswerRecord>, QueueError>;
    fn save(&self, records: &[AnswerRecord]) -> Result<(), QueueError>;
}

#[derive(Default)]
pub struct MemoryQueueStorage {
    records: std::sync::Mutex<Vec<AnswerRecord>>,
}

impl MemoryQueueStorage {
    pub fn with_records(records: Vec<AnswerRecord>) -> Self {
        Self {
            records: std::sync::Mutex::new(records),
        }
    }
}

impl QueueStorage for MemoryQueueStorage {
    fn load(&self) -> Result<Vec<AnswerRecord>, QueueError> {
        self.records
            .lock()
            .map(|r| r.clone())
            .map_err(|e| QueueError::Storage(e.to_string()))
    }

    fn save(&self, records: &[AnswerRecord]) -> Result<(), QueueError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| QueueError::Storage(e.to_string()))?;
        *guard = records.to_vec();
        Ok(())
    }
}

/// Cola en un fichero JSON; una ruta relativa se resuelve desde el directorio de trabajo.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileQueueStorage {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileQueueStorage {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl QueueStorage for FileQueueStorage {
    fn load(&self) -> Result<Vec<AnswerRecord>, QueueError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, records: &[AnswerRecord]) -> Result<(), QueueError> {
        if records.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        let json = serde_json::to_string(records)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Cola en `localStorage` del navegador.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageQueue {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageQueue {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<web_sys::Storage, QueueError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| QueueError::Storage("localStorage no disponible".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl QueueStorage for LocalStorageQueue {
    fn load(&self) -> Result<Vec<AnswerRecord>, QueueError> {
        let item = self
            .storage()?
            .get_item(&self.key)
            .map_err(|e| QueueError::Storage(format!("{e:?}")))?;
        match item {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[AnswerRecord]) -> Result<(), QueueError> {
        let storage = self.storage()?;
        let result = if records.is_empty() {
            storage.remove_item(&self.key)
        } else {
            storage.set_item(&self.key, &serde_json::to_string(records)?)
        };
        result.map_err(|e| QueueError::Storage(format!("{e:?}")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub delivered: usize,
    pub failure: Option<RecordError>,
}

/// Envía en orden y se detiene en el primer fallo para no desordenar la sincronización.
pub fn deliver_in_order(recorder: &dyn AnswerRecorder, records: &[AnswerRecord]) -> ReplayReport {
    let mut delivered = 0;
    for record in records {
        if let Err(err) = recorder.record_answer(record) {
            return ReplayReport {
                delivered,
                failure: Some(err),
            };
        }
        delivered += 1;
    }
    ReplayReport {
        delivered,
        failure: None,
    }
}

/// Respuestas que no llegaron al backend, de la más antigua a la más reciente.
pub struct ReplayQueue {
    storage: Box<dyn QueueStorage>,
    pending: VecDeque<AnswerRecord>,
}

impl ReplayQueue {
    pub fn open(storage: Box<dyn QueueStorage>) -> Self {
        let pending = match storage.load() {
            Ok(records) => records.into(),
            Err(err) => {
                warn!("No se pudo leer la cola de reenvío, se empieza vacía: {err}");
                VecDeque::new()
            }
        };
        if !pending.is_empty() {
            info!("📦 {} respuestas pendientes de sincronizar", pending.len());
        }
        Self { storage, pending }
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryQueueStorage::default()))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn snapshot(&self) -> Vec<AnswerRecord> {
        self.pending.iter().cloned().collect()
    }

    pub fn enqueue(&mut self, record: AnswerRecord) {
        self.pending.push_back(record);
        self.persist();
    }

    /// Retira las `delivered` más antiguas, ya confirmadas por el backend.
    pub fn acknowledge(&mut self, delivered: usize) {
        let n = delivered.min(self.pending.len());
        if n == 0 {
            return;
        }
        self.pending.drain(..n);
        self.persist();
    }

    pub fn replay_queued(&mut self, recorder: &dyn AnswerRecorder) -> ReplayReport {
        let report = deliver_in_order(recorder, &self.snapshot());
        self.acknowledge(report.delivered);
        report
    }

    fn persist(&self) {
        let records: Vec<AnswerRecord> = self.pending.iter().cloned().collect();
        if let Err(err) = self.storage.save(&records) {
            warn!("No se pudo guardar la cola de reenvío: {err}");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Difficulty;
    use std::sync::Mutex;

    pub(crate) fn record(sub_id: i64) -> AnswerRecord {
        AnswerRecord {
            student_id: None,
            sub_question_id: sub_id,
            main_question_id: 1,
            is_correct: true,
            time_taken_seconds: 5,
            difficulty: Difficulty::Easy,
        }
    }

    /// Acepta las primeras `accept` respuestas y luego falla.
    pub(crate) struct FlakyRecorder {
        pub accept: Mutex<usize>,
        pub seen: Mutex<Vec<AnswerRecord>>,
    }

    impl FlakyRecorder {
        pub(crate) fn new(accept: usize) -> Self {
            Self {
                accept: Mutex::new(accept),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnswerRecorder for FlakyRecorder {
        fn record_answer(&self, record: &AnswerRecord) -> Result<(), RecordError> {
            let mut accept = self.accept.lock().unwrap();
            if *accept == 0 {
                return Err(RecordError::Connection("sin red".into()));
            }
            *accept -= 1;
            self.seen.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn replay_drains_oldest_first() {
        let mut queue = ReplayQueue::in_memory();
        for id in 1..=3 {
            queue.enqueue(record(id));
        }
        let recorder = FlakyRecorder::new(10);
        let report = queue.replay_queued(&recorder);
        assert_eq!(report, ReplayReport { delivered: 3, failure: None });
        assert!(queue.is_empty());
        let order: Vec<i64> = recorder.seen.lock().unwrap().iter().map(|r| r.sub_question_id).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn replay_stops_at_first_failure() {
        let mut queue = ReplayQueue::in_memory();
        for id in 1..=4 {
            queue.enqueue(record(id));
        }
        let report = queue.replay_queued(&FlakyRecorder::new(2));
        assert_eq!(report.delivered, 2);
        assert!(report.failure.is_some());
        let left: Vec<i64> = queue.snapshot().iter().map(|r| r.sub_question_id).collect();
        assert_eq!(left, vec![3, 4]);
    }

    #[test]
    fn queue_survives_reopen() {
        let storage = MemoryQueueStorage::with_records(vec![record(9)]);
        let mut queue = ReplayQueue::open(Box::new(storage));
        assert_eq!(queue.len(), 1);
        queue.enqueue(record(10));
        queue.acknowledge(1);
        assert_eq!(queue.snapshot(), vec![record(10)]);
        queue.acknowledge(5);
        assert!(queue.is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_storage_roundtrips_and_clears() {
        let path = std::env::temp_dir().join(format!("mastery_quiz_queue_{}.json", std::process::id()));
        let storage = FileQueueStorage::new(&path);
        assert!(storage.load().unwrap().is_empty());
        storage.save(&[record(1), record(2)]).unwrap();
        assert_eq!(storage.load().unwrap().len(), 2);
        storage.save(&[]).unwrap();
        assert!(!path.exists());
    }
}
