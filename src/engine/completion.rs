use super::*;
use log::{debug, info};

/// ¿Bastan `score` rondas perfectas para dominar el nivel?
pub fn tier_goal_met(difficulty: Difficulty, score: u32, thresholds: &TierThresholds) -> bool {
    score >= thresholds.goal_for(difficulty)
}

impl QuizEngine {
    /// Cierra la ronda tras la última subpregunta de la principal.
    pub(crate) fn complete_round(&mut self) -> Vec<Effect> {
        let thresholds = self.settings.thresholds;
        let session = match self.session.as_mut() {
            Some(s) => s,
            None => return Vec::new(),
        };

        if session.round_perfect {
            session.score += 1;
            self.stats.perfect_rounds += 1;
        }
        if let Some(id) = session.current_main().map(|mq| mq.id) {
            session.completed_ids.insert(id);
        }
        session.rounds_played += 1;
        let (difficulty, score) = (session.difficulty, session.score);
        debug!(
            "Ronda {} cerrada en {difficulty}: puntuación {score}/{}",
            session.rounds_played,
            thresholds.goal_for(difficulty)
        );

        if !tier_goal_met(difficulty, score, &thresholds) {
            return self.next_main();
        }

        session.reset_round();
        if !self.stats.mastered.contains(&difficulty) {
            self.stats.mastered.push(difficulty);
        }
        match difficulty.next() {
            Some(to) => {
                info!("🏆 Nivel {difficulty} dominado, se pasa a {to}");
                self.phase = Phase::TierComplete {
                    from: difficulty,
                    to,
                };
                vec![Effect::Notify(Notice::TierUp {
                    from: difficulty,
                    to,
                })]
            }
            None => {
                info!("🎉 Quiz completado");
                self.phase = Phase::Finished;
                vec![Effect::Notify(Notice::Finished(self.finish_summary()))]
            }
        }
    }
}
