// src/data.rs

use crate::error::StoreError;
use crate::model::{Difficulty, MainQuestion, QuestionId};
use crate::store::{QuestionStore, sort_steps};

/// Carga el banco de preguntas desde el YAML embebido
pub fn read_questions_embedded() -> Result<Vec<MainQuestion>, StoreError> {
    let file_content = include_str!("data/question_bank.yaml");
    parse_bank(file_content)
}

pub fn parse_bank(text: &str) -> Result<Vec<MainQuestion>, StoreError> {
    let mut questions: Vec<MainQuestion> =
        serde_yaml::from_str(text).map_err(|e| StoreError::Bank(e.to_string()))?;
    sort_steps(&mut questions);
    Ok(questions)
}

/// Banco local: sin backend configurado y en la versión web.
pub struct EmbeddedStore {
    questions: Vec<MainQuestion>,
    batch_size: usize,
}

impl EmbeddedStore {
    pub fn new(batch_size: usize) -> Result<Self, StoreError> {
        Ok(Self::with_questions(read_questions_embedded()?, batch_size))
    }

    pub fn with_questions(mut questions: Vec<MainQuestion>, batch_size: usize) -> Self {
        questions.sort_by_key(|q| q.id);
        Self {
            questions,
            batch_size: batch_size.max(1),
        }
    }

    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .count()
    }
}

impl QuestionStore for EmbeddedStore {
    fn fetch_questions(
        &self,
        difficulty: Difficulty,
        exclude: &[QuestionId],
    ) -> Result<Vec<MainQuestion>, StoreError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.difficulty == difficulty && !exclude.contains(&q.id))
            .take(self.batch_size)
            .cloned()
            .collect())
    }
}
