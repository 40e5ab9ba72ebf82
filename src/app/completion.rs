use super::*;
use log::info;

impl QuizApp {
    /// Al dominar un nivel, desbloquea el siguiente.
    pub fn unlock_after_mastery(&mut self, from: Difficulty, to: Difficulty) {
        self.progress.mastered.insert(from);
        if to > self.progress.unlocked {
            self.progress.unlocked = to;
            info!("🔓 Desbloqueado {}", to.label());
        }
    }

    pub fn finish_run(&mut self, summary: &FinishSummary) {
        for tier in &summary.mastered {
            self.progress.mastered.insert(*tier);
        }
        self.progress.unlocked = self.progress.unlocked.max(summary.final_tier);
        self.bank_run();
        self.progress.finished_runs += 1;
    }

    /// Suma los totales de la partida en curso al progreso guardado (una sola vez).
    pub(crate) fn bank_run(&mut self) {
        if self.run_banked {
            return;
        }
        if let Some(controller) = self.controller.as_ref() {
            let stats = &controller.engine().stats;
            self.progress.answered += stats.answered;
            self.progress.correct += stats.correct;
            self.progress.seconds += stats.seconds_spent;
        }
        self.run_banked = true;
    }
}
