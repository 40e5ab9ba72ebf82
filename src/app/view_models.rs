use super::*;

impl QuizApp {
    pub fn tier_infos(&self) -> Vec<TierInfo> {
        Difficulty::ALL
            .iter()
            .map(|&difficulty| TierInfo {
                difficulty,
                unlocked: self.is_tier_unlocked(difficulty),
                mastered: self.progress.mastered.contains(&difficulty),
                goal: self.config.thresholds.goal_for(difficulty),
            })
            .collect()
    }

    /// Porcentaje de aciertos acumulado, si ya hay respuestas.
    pub fn lifetime_accuracy(&self) -> Option<u32> {
        (self.progress.answered > 0).then(|| self.progress.correct * 100 / self.progress.answered)
    }

    /// Línea de resumen para la bienvenida.
    pub fn lifetime_summary(&self) -> Option<String> {
        let pct = self.lifetime_accuracy()?;
        let mut text = format!(
            "Llevas {} respuestas con un {pct}% de aciertos",
            self.progress.answered
        );
        if self.progress.finished_runs > 0 {
            text.push_str(&format!(
                " · 🏆 {} partidas completadas",
                self.progress.finished_runs
            ));
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_infos_reflect_progress() {
        let mut app = QuizApp::default();
        app.progress.unlocked = Difficulty::Medium;
        app.progress.mastered.insert(Difficulty::Easy);
        let infos = app.tier_infos();
        assert_eq!(infos.len(), 3);
        assert!(infos[0].mastered);
        assert!(infos[1].unlocked && !infos[1].mastered);
        assert!(!infos[2].unlocked);
        assert_eq!(infos[2].goal, 5);
        assert_eq!(app.lifetime_accuracy(), None);
        assert_eq!(app.lifetime_summary(), None);
    }

    #[test]
    fn summary_mentions_completed_runs() {
        let mut app = QuizApp::default();
        app.progress.answered = 4;
        app.progress.correct = 3;
        assert_eq!(
            app.lifetime_summary().as_deref(),
            Some("Llevas 4 respuestas con un 75% de aciertos")
        );
        app.progress.finished_runs = 2;
        assert!(app.lifetime_summary().is_some_and(|s| s.ends_with("2 partidas completadas")));
    }
}
