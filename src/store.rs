use crate::error::StoreError;
use crate::model::{Difficulty, MainQuestion, QuestionId};

/// Origen de las preguntas principales.
///
/// Un conjunto `exclude` que cubra todo el contenido devuelve `Ok(vec![])`, no un error.
/// Las subpreguntas vienen ordenadas por `step_number` y las principales en el orden
/// del banco; el motor nunca las reordena.
pub trait QuestionStore: Send + Sync {
    fn fetch_questions(
        &self,
        difficulty: Difficulty,
        exclude: &[QuestionId],
    ) -> Result<Vec<MainQuestion>, StoreError>;
}

/// Ordena las subpreguntas de cada principal por paso.
pub fn sort_steps(questions: &mut [MainQuestion]) {
    for q in questions.iter_mut() {
        q.sub_questions.sort_by_key(|s| s.step_number);
    }
}
