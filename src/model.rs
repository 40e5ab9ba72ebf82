use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type QuestionId = i64;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Difficulty {
    #[serde(alias = "easy")]
    Easy,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Nivel siguiente en la escalada; `None` en Hard.
    pub fn next(self) -> Option<Difficulty> {
        match self {
            Difficulty::Easy => Some(Difficulty::Medium),
            Difficulty::Medium => Some(Difficulty::Hard),
            Difficulty::Hard => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Intermedio",
            Difficulty::Hard => "Difícil",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("dificultad desconocida: {other}")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MainQuestion {
    pub id: QuestionId,
    #[serde(default = "unknown_topic")]
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub main_question: String,
    #[serde(default)]
    pub sub_questions: Vec<SubQuestion>,
}

fn unknown_topic() -> String {
    "Unknown".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubQuestion {
    pub id: QuestionId,
    #[serde(default = "first_step")]
    pub step_number: u32,
    #[serde(default, deserialize_with = "text_or_null")]
    pub question: String,
    #[serde(default, deserialize_with = "choices_from_array_or_json")]
    pub choices: Vec<String>,
    #[serde(default, deserialize_with = "text_or_null")]
    pub correct_answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub incorrect_feedback: Option<String>,
}

fn first_step() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    NoChoices,
    AnswerNotInChoices,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::NoChoices => f.write_str("la pregunta no tiene opciones"),
            MalformedReason::AnswerNotInChoices => {
                f.write_str("la respuesta correcta no aparece entre las opciones")
            }
        }
    }
}

impl SubQuestion {
    /// `Some(motivo)` si la pregunta no puede responderse correctamente nunca.
    pub fn malformed(&self) -> Option<MalformedReason> {
        if self.choices.is_empty() {
            Some(MalformedReason::NoChoices)
        } else if !self.choices.iter().any(|c| *c == self.correct_answer) {
            Some(MalformedReason::AnswerNotInChoices)
        } else {
            None
        }
    }

    /// Igualdad exacta entre el valor elegido y la respuesta correcta.
    pub fn is_correct_choice(&self, choice: usize) -> bool {
        self.choices
            .get(choice)
            .map(|c| *c == self.correct_answer)
            .unwrap_or(false)
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.choices.iter().position(|c| *c == self.correct_answer)
    }
}

/// `null` o ausente queda como texto vacío; `malformed()` se encarga del resto.
fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Acepta `choices` como array JSON/YAML o como string con un array JSON dentro.
fn choices_from_array_or_json<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawChoices {
        List(Vec<String>),
        Encoded(String),
        Missing(Option<()>),
    }

    Ok(match RawChoices::deserialize(deserializer)? {
        RawChoices::List(list) => list,
        RawChoices::Encoded(text) => match serde_json::from_str::<Vec<String>>(&text) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("choices ilegibles ({err}): {text}");
                Vec::new()
            }
        },
        RawChoices::Missing(_) => Vec::new(),
    })
}

/// Una respuesta registrada; los nombres coinciden con las columnas de `user_answers`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub student_id: Option<String>,
    pub sub_question_id: QuestionId,
    pub main_question_id: QuestionId,
    pub is_correct: bool,
    pub time_taken_seconds: u32,
    pub difficulty: Difficulty,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Welcome,
    TierMenu,
    Loading,
    Quiz,
    TierUp,
    Finished,
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(choices: &[&str], answer: &str) -> SubQuestion {
        SubQuestion {
            id: 1,
            step_number: 1,
            question: "2 + 2".into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_answer: answer.into(),
            hint: None,
            incorrect_feedback: None,
        }
    }

    #[test]
    fn difficulty_escalates_until_hard() {
        assert_eq!(Difficulty::Easy.next(), Some(Difficulty::Medium));
        assert_eq!(Difficulty::Medium.next(), Some(Difficulty::Hard));
        assert_eq!(Difficulty::Hard.next(), None);
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("imposible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn judging_uses_exact_value_equality() {
        let q = sub(&["3", "4", "5", "6"], "4");
        assert!(q.is_correct_choice(1));
        assert!(!q.is_correct_choice(0));
        assert!(!q.is_correct_choice(9));
        assert_eq!(q.correct_index(), Some(1));
        assert_eq!(q.malformed(), None);
    }

    #[test]
    fn answer_missing_from_choices_is_malformed() {
        let q = sub(&["1", "2"], "X");
        assert_eq!(q.malformed(), Some(MalformedReason::AnswerNotInChoices));
        assert!(!q.is_correct_choice(0));
        assert!(!q.is_correct_choice(1));
        assert_eq!(sub(&[], "X").malformed(), Some(MalformedReason::NoChoices));
    }

    #[test]
    fn choices_accept_json_encoded_strings() {
        let json = r#"{"id": 7, "question": "3 x 3", "choices": "[\"6\", \"9\"]", "correct_answer": "9"}"#;
        let q: SubQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.choices, vec!["6".to_string(), "9".to_string()]);
        assert_eq!(q.step_number, 1);

        let broken = r#"{"id": 8, "question": "?", "choices": "not json", "correct_answer": "1"}"#;
        let q: SubQuestion = serde_json::from_str(broken).unwrap();
        assert!(q.choices.is_empty());
        assert_eq!(q.malformed(), Some(MalformedReason::NoChoices));
    }

    #[test]
    fn null_answer_decodes_as_malformed() {
        let json = r#"{"id": 9, "question": null, "choices": ["1", "2"], "correct_answer": null}"#;
        let q: SubQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_answer, "");
        assert!(q.question.is_empty());
        assert_eq!(q.malformed(), Some(MalformedReason::AnswerNotInChoices));
    }

    #[test]
    fn difficulty_accepts_lowercase_aliases() {
        let d: Difficulty = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(d, Difficulty::Medium);
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"Hard\"");
    }
}
