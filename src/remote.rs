//! Backend REST estilo PostgREST (tablas `main_questions`, `sub_questions`, `user_answers`).

use crate::authoring::NewQuiz;
use crate::config::BackendConfig;
use crate::error::{RecordError, StoreError};
use crate::model::{AnswerRecord, Difficulty, MainQuestion, QuestionId, SubQuestion};
use crate::recorder::AnswerRecorder;
use crate::store::{QuestionStore, sort_steps};
use log::{debug, info, warn};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    legacy_tables: Vec<String>,
    batch_size: usize,
}

/// Quita barras finales y añade `/rest/v1` si falta.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/rest/v1") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/rest/v1")
    }
}

fn id_list(ids: &[QuestionId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Consulta de principales: dificultad, exclusiones, orden por id y límite.
pub fn main_questions_query(difficulty: Difficulty, exclude: &[QuestionId], limit: usize) -> String {
    let mut query = format!("difficulty=eq.{difficulty}&order=id.asc&limit={limit}");
    if !exclude.is_empty() {
        query.push_str(&format!("&id=not.in.({})", id_list(exclude)));
    }
    query
}

pub fn sub_questions_query(main_ids: &[QuestionId]) -> String {
    format!(
        "main_question_id=in.({})&order=step_number.asc",
        id_list(main_ids)
    )
}

#[derive(Deserialize, Debug)]
struct MainRow {
    id: QuestionId,
    #[serde(default)]
    topic: Option<String>,
    difficulty: Difficulty,
    #[serde(default)]
    main_question: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SubRow {
    main_question_id: QuestionId,
    #[serde(flatten)]
    sub: SubQuestion,
}

/// Une cada paso con su principal; los pasos huérfanos se descartan.
fn assemble_questions(mains: Vec<MainRow>, subs: Vec<SubRow>) -> Vec<MainQuestion> {
    let mut questions: Vec<MainQuestion> = mains
        .into_iter()
        .map(|row| MainQuestion {
            id: row.id,
            topic: row.topic.unwrap_or_else(|| "Unknown".to_string()),
            difficulty: row.difficulty,
            main_question: row.main_question.unwrap_or_default(),
            sub_questions: Vec::new(),
        })
        .collect();
    for row in subs {
        match questions.iter_mut().find(|q| q.id == row.main_question_id) {
            Some(mq) => mq.sub_questions.push(row.sub),
            None => debug!(
                "Subpregunta {} sin principal {} en el lote",
                row.sub.id, row.main_question_id
            ),
        }
    }
    sort_steps(&mut questions);
    questions
}

/// Fila de las tablas antiguas: una pregunta, un solo paso.
pub fn legacy_row_to_main(row: &Value) -> Option<MainQuestion> {
    let id = row.get("id")?.as_i64()?;
    let text = |key: &str| row.get(key).and_then(Value::as_str).map(str::to_string);

    let difficulty = text("difficulty")
        .and_then(|d| d.parse().ok())
        .unwrap_or(Difficulty::Easy);
    let topic = text("math-topic")
        .or_else(|| text("topic"))
        .or_else(|| text("math_topic"))
        .unwrap_or_else(|| "Unknown".to_string());
    let question = text("question").unwrap_or_else(|| "Pregunta sin enunciado".to_string());
    let correct_answer = text("answer")
        .or_else(|| text("correct_answer"))
        .unwrap_or_default();

    let sub_json = serde_json::json!({
        "id": id,
        "step_number": 1,
        "question": question,
        "choices": row.get("choices").cloned().unwrap_or(Value::Null),
        "correct_answer": correct_answer,
    });
    let sub: SubQuestion = match serde_json::from_value(sub_json) {
        Ok(sub) => sub,
        Err(err) => {
            warn!("Fila antigua {id} ilegible: {err}");
            return None;
        }
    };

    Some(MainQuestion {
        id,
        topic,
        difficulty,
        main_question: question,
        sub_questions: vec![sub],
    })
}

impl RestBackend {
    pub fn new(config: &BackendConfig, batch_size: usize) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| StoreError::Connection("no hay URL de backend configurada".into()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(url),
            api_key: config.api_key.clone(),
            legacy_tables: config.legacy_tables.clone(),
            batch_size: batch_size.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    fn get_rows<T: for<'de> Deserialize<'de>>(&self, table: &str, query: &str) -> Result<Vec<T>, StoreError> {
        let url = format!("{}?{query}", self.table_url(table));
        debug!("GET {url}");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                url,
            });
        }
        response
            .json::<Vec<T>>()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn fetch_structured(
        &self,
        difficulty: Difficulty,
        exclude: &[QuestionId],
    ) -> Result<Vec<MainQuestion>, StoreError> {
        let mains: Vec<MainRow> = self.get_rows(
            "main_questions",
            &main_questions_query(difficulty, exclude, self.batch_size),
        )?;
        if mains.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<QuestionId> = mains.iter().map(|m| m.id).collect();
        let subs: Vec<SubRow> = self.get_rows("sub_questions", &sub_questions_query(&ids))?;

        Ok(assemble_questions(mains, subs))
    }

    /// Tablas planas antiguas, probadas en orden hasta que una responda.
    fn fetch_legacy(
        &self,
        difficulty: Difficulty,
        exclude: &[QuestionId],
    ) -> Result<Vec<MainQuestion>, StoreError> {
        let mut last_error = None;
        for table in &self.legacy_tables {
            let rows: Vec<Value> = match self.get_rows(table, "order=id.asc") {
                Ok(rows) => rows,
                Err(err @ StoreError::Status { status: 404, .. }) => {
                    debug!("La tabla {table} no existe");
                    last_error = Some(err);
                    continue;
                }
                Err(err) => return Err(err),
            };
            if rows.is_empty() {
                continue;
            }
            info!("Usando la tabla antigua {table} ({} filas)", rows.len());
            return Ok(rows
                .iter()
                .filter_map(legacy_row_to_main)
                .filter(|q| q.difficulty == difficulty && !exclude.contains(&q.id))
                .take(self.batch_size)
                .collect());
        }
        match last_error {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        }
    }

    /// Mayor id de la tabla más uno (1 si está vacía).
    fn next_id(&self, table: &str) -> Result<QuestionId, StoreError> {
        #[derive(Deserialize)]
        struct IdRow {
            id: QuestionId,
        }
        let rows: Vec<IdRow> = self.get_rows(table, "select=id&order=id.desc&limit=1")?;
        Ok(rows.first().map(|r| r.id).unwrap_or(0) + 1)
    }

    fn insert<T: serde::Serialize + ?Sized>(&self, table: &str, body: &T) -> Result<(), RecordError> {
        let url = self.table_url(table);
        let response = self
            .authorize(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .map_err(|e| RecordError::Connection(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(RecordError::Rejected {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }

    /// Inserta la principal y después sus pasos. Devuelve el id de la principal.
    pub fn publish_quiz(&self, quiz: &NewQuiz) -> Result<QuestionId, RecordError> {
        let main_id = self
            .next_id("main_questions")
            .map_err(|e| RecordError::Connection(e.to_string()))?;
        let mut main = serde_json::to_value(&quiz.main).map_err(|e| RecordError::Encode(e.to_string()))?;
        main["id"] = Value::from(main_id);
        self.insert("main_questions", &main)?;

        let first_sub_id = self
            .next_id("sub_questions")
            .map_err(|e| RecordError::Connection(e.to_string()))?;
        self.insert("sub_questions", &quiz.sub_rows(main_id, first_sub_id))?;
        info!(
            "✅ Quiz {main_id} publicado con {} subpreguntas",
            quiz.subs.len()
        );
        Ok(main_id)
    }
}

impl QuestionStore for RestBackend {
    fn fetch_questions(
        &self,
        difficulty: Difficulty,
        exclude: &[QuestionId],
    ) -> Result<Vec<MainQuestion>, StoreError> {
        match self.fetch_structured(difficulty, exclude) {
            Err(StoreError::Status { status: 404, .. }) if !self.legacy_tables.is_empty() => {
                warn!("main_questions no existe, probando tablas antiguas");
                self.fetch_legacy(difficulty, exclude)
            }
            other => other,
        }
    }
}

impl AnswerRecorder for RestBackend {
    fn record_answer(&self, record: &AnswerRecord) -> Result<(), RecordError> {
        self.insert("user_answers", record)
    }
}
