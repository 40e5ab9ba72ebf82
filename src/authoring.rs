//! Alta de preguntas nuevas: borrador en YAML, validación y filas listas para insertar.

use crate::model::{Difficulty, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const CHOICES_PER_SUB_QUESTION: usize = 4;

/// Subpreguntas que exige cada nivel.
pub fn sub_question_count(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy | Difficulty::Medium => 2,
        Difficulty::Hard => 3,
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    #[error("Falta el enunciado principal")]
    MissingMainQuestion,
    #[error("Un quiz {difficulty} necesita {expected} subpreguntas y tiene {found}")]
    WrongStepCount {
        difficulty: Difficulty,
        expected: usize,
        found: usize,
    },
    #[error("Paso {step}: falta la pregunta")]
    MissingPrompt { step: usize },
    #[error("Paso {step}: hacen falta {expected} opciones no vacías")]
    IncompleteChoices { step: usize, expected: usize },
    #[error("Paso {step}: falta la respuesta correcta")]
    MissingAnswer { step: usize },
    #[error("Paso {step}: la respuesta correcta debe ser una de las opciones")]
    AnswerNotInChoices { step: usize },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizDraft {
    pub main_question: String,
    #[serde(default)]
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    pub sub_questions: Vec<SubQuestionDraft>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubQuestionDraft {
    pub question: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub incorrect_feedback: Option<String>,
}

/// Fila de `main_questions`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewMainQuestion {
    pub main_question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub difficulty: Difficulty,
}

/// Fila de `sub_questions`, sin ids hasta que se conozcan los del backend.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewSubQuestion {
    pub step_number: u32,
    pub question: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
    pub hint: Option<String>,
    pub incorrect_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuiz {
    pub main: NewMainQuestion,
    pub subs: Vec<NewSubQuestion>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubQuestionRow<'a> {
    pub id: QuestionId,
    pub main_question_id: QuestionId,
    #[serde(flatten)]
    pub sub: &'a NewSubQuestion,
}

impl NewQuiz {
    /// Filas de subpreguntas con ids consecutivos a partir de `first_id`.
    pub fn sub_rows(&self, main_question_id: QuestionId, first_id: QuestionId) -> Vec<SubQuestionRow<'_>> {
        self.subs
            .iter()
            .enumerate()
            .map(|(i, sub)| SubQuestionRow {
                id: first_id + i as QuestionId,
                main_question_id,
                sub,
            })
            .collect()
    }
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_ref()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl QuizDraft {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn validate(&self) -> Result<NewQuiz, DraftError> {
        let main_question = self.main_question.trim();
        if main_question.is_empty() {
            return Err(DraftError::MissingMainQuestion);
        }

        let expected = sub_question_count(self.difficulty);
        if self.sub_questions.len() != expected {
            return Err(DraftError::WrongStepCount {
                difficulty: self.difficulty,
                expected,
                found: self.sub_questions.len(),
            });
        }

        let mut used_feedback = HashSet::new();
        let mut subs = Vec::with_capacity(expected);
        for (i, draft) in self.sub_questions.iter().enumerate() {
            let step = i + 1;
            let question = draft.question.trim();
            if question.is_empty() {
                return Err(DraftError::MissingPrompt { step });
            }

            let choices: Vec<String> = draft
                .choices
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if choices.len() != CHOICES_PER_SUB_QUESTION {
                return Err(DraftError::IncompleteChoices {
                    step,
                    expected: CHOICES_PER_SUB_QUESTION,
                });
            }

            let correct_answer = draft.correct_answer.trim();
            if correct_answer.is_empty() {
                return Err(DraftError::MissingAnswer { step });
            }
            if !choices.iter().any(|c| c == correct_answer) {
                return Err(DraftError::AnswerNotInChoices { step });
            }

            // El backend exige feedback único: los repetidos llevan el paso
            let incorrect_feedback = non_blank(&draft.incorrect_feedback).map(|text| {
                let text = if used_feedback.contains(&text) {
                    format!("{text} (Step {step})")
                } else {
                    text
                };
                used_feedback.insert(text.clone());
                text
            });

            subs.push(NewSubQuestion {
                step_number: step as u32,
                question: question.to_string(),
                choices,
                correct_answer: correct_answer.to_string(),
                hint: non_blank(&draft.hint),
                incorrect_feedback,
            });
        }

        Ok(NewQuiz {
            main: NewMainQuestion {
                main_question: main_question.to_string(),
                topic: non_blank(&self.topic),
                difficulty: self.difficulty,
            },
            subs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(answer: &str, feedback: Option<&str>) -> SubQuestionDraft {
        SubQuestionDraft {
            question: "¿Cuánto es 6 ÷ 2?".into(),
            choices: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            correct_answer: answer.into(),
            hint: Some("  ".into()),
            incorrect_feedback: feedback.map(str::to_string),
        }
    }

    fn draft(difficulty: Difficulty, steps: Vec<SubQuestionDraft>) -> QuizDraft {
        QuizDraft {
            main_question: "Reparte 6 caramelos".into(),
            topic: None,
            difficulty,
            sub_questions: steps,
        }
    }

    #[test]
    fn hard_quizzes_need_three_steps() {
        let d = draft(Difficulty::Hard, vec![step("3", None), step("3", None)]);
        assert_eq!(
            d.validate(),
            Err(DraftError::WrongStepCount {
                difficulty: Difficulty::Hard,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn answer_must_be_one_of_four_choices() {
        let d = draft(Difficulty::Easy, vec![step("3", None), step("7", None)]);
        assert_eq!(d.validate(), Err(DraftError::AnswerNotInChoices { step: 2 }));

        let mut short = step("3", None);
        short.choices[3] = " ".into();
        let d = draft(Difficulty::Easy, vec![step("3", None), short]);
        assert_eq!(
            d.validate(),
            Err(DraftError::IncompleteChoices { step: 2, expected: 4 })
        );
    }

    #[test]
    fn repeated_feedback_gets_step_suffix() {
        let d = draft(
            Difficulty::Medium,
            vec![step("3", Some("Repasa la división")), step("3", Some("Repasa la división"))],
        );
        let quiz = d.validate().unwrap();
        assert_eq!(quiz.subs[0].incorrect_feedback.as_deref(), Some("Repasa la división"));
        assert_eq!(
            quiz.subs[1].incorrect_feedback.as_deref(),
            Some("Repasa la división (Step 2)")
        );
        assert_eq!(quiz.subs[1].step_number, 2);
        assert_eq!(quiz.subs[0].hint, None);
    }

    #[test]
    fn sub_rows_get_consecutive_ids() {
        let quiz = draft(Difficulty::Easy, vec![step("3", None), step("2", None)])
            .validate()
            .unwrap();
        let rows = quiz.sub_rows(12, 40);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![40, 41]);
        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["main_question_id"], 12);
        assert_eq!(json["step_number"], 2);
        assert_eq!(json["correct_answer"], "2");
    }

    #[test]
    fn drafts_parse_from_yaml() {
        let yaml = r#"
main_question: "Ana tiene 3 manzanas"
difficulty: easy
sub_questions:
  - question: "¿Cuántas tiene?"
    choices: ["1", "2", "3", "4"]
    correct_answer: "3"
  - question: "¿Y si come una?"
    choices: ["1", "2", "3", "4"]
    correct_answer: "2"
    incorrect_feedback: "Resta una"
"#;
        let quiz = QuizDraft::from_yaml(yaml).unwrap().validate().unwrap();
        assert_eq!(quiz.main.difficulty, Difficulty::Easy);
        assert_eq!(quiz.subs.len(), 2);
    }
}
