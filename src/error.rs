use crate::model::{MalformedReason, QuestionId};
use thiserror::Error;

/// Fallos del banco de preguntas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Error conectando con el backend: {0}")]
    Connection(String),
    #[error("El backend devolvió HTTP {status} en {url}")]
    Status { status: u16, url: String },
    #[error("Respuesta inválida del backend: {0}")]
    Decode(String),
    #[error("Banco de preguntas ilegible: {0}")]
    Bank(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Error conectando con el backend: {0}")]
    Connection(String),
    #[error("El backend rechazó la respuesta (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("No se pudo serializar la respuesta: {0}")]
    Encode(String),
}

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Error de E/S en la cola local: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cola local corrupta: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Almacenamiento local no disponible: {0}")]
    Storage(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No se pudo leer {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuración YAML inválida: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Valor inválido para {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Incidencias del quiz. `RecordingDeferred` sólo va al log; el resto se avisa al alumno.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuizIssue {
    #[error("No hay preguntas disponibles para este nivel.")]
    ContentUnavailable,
    #[error("No se pudieron cargar las preguntas: {0}")]
    StoreUnavailable(String),
    #[error("Respuesta de la pregunta {sub_question_id} pendiente de sincronizar: {reason}")]
    RecordingDeferred {
        sub_question_id: QuestionId,
        reason: String,
    },
    #[error("Debes elegir una respuesta antes de enviar.")]
    InvalidSelection,
    #[error("La pregunta {sub_question_id} está mal formada: {reason}")]
    MalformedQuestion {
        sub_question_id: QuestionId,
        reason: MalformedReason,
    },
}

impl QuizIssue {
    /// Las incidencias que se muestran al alumno.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, QuizIssue::RecordingDeferred { .. })
    }

    /// Tras estas no hay forma de seguir con el quiz.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuizIssue::ContentUnavailable | QuizIssue::StoreUnavailable(_)
        )
    }
}
