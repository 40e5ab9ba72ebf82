use crate::error::ConfigError;
use crate::model::Difficulty;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_VAR: &str = "MASTERY_QUIZ_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct QuizConfig {
    pub question_seconds: u32,
    pub batch_size: usize,
    pub thresholds: TierThresholds,
    pub backend: BackendConfig,
    pub student_id: Option<String>,
    pub replay_queue_path: String,
}

/// Rondas perfectas necesarias para dominar cada nivel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct TierThresholds {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub legacy_tables: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_seconds: 60,
            batch_size: 5,
            thresholds: TierThresholds::default(),
            backend: BackendConfig::default(),
            student_id: None,
            replay_queue_path: "mastery_quiz_queue.json".to_string(),
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            easy: 10,
            medium: 7,
            hard: 5,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            legacy_tables: vec![
                "questions".to_string(),
                "questions_test_two".to_string(),
                "quiz_questions".to_string(),
                "math_questions".to_string(),
            ],
            timeout_secs: 10,
        }
    }
}

impl TierThresholds {
    pub fn goal_for(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

impl QuizConfig {
    /// Valores por defecto → YAML opcional (`MASTERY_QUIZ_CONFIG`) → variables de entorno.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env_value(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(env_value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Aplica overrides; `lookup` devuelve `None` para claves ausentes o vacías.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MASTERY_QUIZ_BACKEND_URL") {
            self.backend.url = Some(url);
        }
        if let Some(key) = lookup("MASTERY_QUIZ_API_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Some(student) = lookup("MASTERY_QUIZ_STUDENT_ID") {
            self.student_id = Some(student);
        }
        if let Some(secs) = lookup("MASTERY_QUIZ_QUESTION_SECONDS") {
            self.question_seconds = parse_number("MASTERY_QUIZ_QUESTION_SECONDS", &secs)?;
        }
        if let Some(v) = lookup("MASTERY_QUIZ_THRESHOLD_EASY") {
            self.thresholds.easy = parse_number("MASTERY_QUIZ_THRESHOLD_EASY", &v)?;
        }
        if let Some(v) = lookup("MASTERY_QUIZ_THRESHOLD_MEDIUM") {
            self.thresholds.medium = parse_number("MASTERY_QUIZ_THRESHOLD_MEDIUM", &v)?;
        }
        if let Some(v) = lookup("MASTERY_QUIZ_THRESHOLD_HARD") {
            self.thresholds.hard = parse_number("MASTERY_QUIZ_THRESHOLD_HARD", &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.question_seconds == 0 {
            return Err(invalid("question_seconds", "0"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "0"));
        }
        for difficulty in Difficulty::ALL {
            if self.thresholds.goal_for(difficulty) == 0 {
                return Err(invalid(
                    &format!("thresholds.{}", difficulty.as_str().to_lowercase()),
                    "0",
                ));
            }
        }
        Ok(())
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = QuizConfig::from_yaml("question_seconds: 45\nthresholds:\n  hard: 3\n").unwrap();
        assert_eq!(config.question_seconds, 45);
        assert_eq!(config.thresholds.hard, 3);
        assert_eq!(config.thresholds.easy, 10);
        assert_eq!(config.batch_size, 5);
        assert!(config.backend.legacy_tables.contains(&"questions".to_string()));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let vars: HashMap<&str, &str> = [
            ("MASTERY_QUIZ_BACKEND_URL", "https://db.example.org"),
            ("MASTERY_QUIZ_THRESHOLD_EASY", "4"),
            ("MASTERY_QUIZ_STUDENT_ID", "alumno-1"),
        ]
        .into_iter()
        .collect();

        let mut config = QuizConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.backend.url.as_deref(), Some("https://db.example.org"));
        assert_eq!(config.thresholds.goal_for(Difficulty::Easy), 4);
        assert_eq!(config.student_id.as_deref(), Some("alumno-1"));
    }

    #[test]
    fn non_numeric_override_is_rejected() {
        let mut config = QuizConfig::default();
        let err = config
            .apply_overrides(|k| (k == "MASTERY_QUIZ_QUESTION_SECONDS").then(|| "mucho".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn zero_thresholds_fail_validation() {
        let mut config = QuizConfig::default();
        config.thresholds.medium = 0;
        assert!(config.validate().is_err());
        assert!(QuizConfig::default().validate().is_ok());
    }
}
