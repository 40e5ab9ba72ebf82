use super::*;
use crate::view_models::ProgressNode;

impl QuizEngine {
    pub fn question_view(&self) -> Option<QuestionView> {
        let session = self.session.as_ref()?;
        let main = session.current_main()?;
        let sub = session.current_sub()?;
        let budget = self.settings.question_seconds;

        let progress = session
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| ProgressNode {
                result: *result,
                active: i == session.sub_idx,
            })
            .collect();

        Some(QuestionView {
            difficulty: session.difficulty,
            topic: main.topic.clone(),
            round_number: session.rounds_played + 1,
            main_prompt: main.main_question.clone(),
            sub_prompt: sub.question.clone(),
            step: session.sub_idx + 1,
            step_count: main.sub_questions.len(),
            choices: sub.choices.clone(),
            selected: session.selected,
            progress,
            remaining_seconds: session.countdown.map(|c| c.remaining()).unwrap_or(0),
            budget_seconds: budget,
            score: session.score,
            goal: self.goal(session.difficulty),
            warning: sub.malformed().map(|reason| reason.to_string()),
            locked: session.submit_locked,
        })
    }

    pub fn feedback_view(&self, verdict: Verdict) -> Option<FeedbackView> {
        let session = self.session.as_ref()?;
        let sub = session.current_sub()?;
        Some(FeedbackView {
            correct: verdict.correct,
            timed_out: verdict.timed_out,
            chosen: verdict.chosen,
            correct_index: if verdict.correct {
                sub.correct_index()
            } else {
                None
            },
            incorrect_feedback: if verdict.correct {
                None
            } else {
                sub.incorrect_feedback.clone()
            },
            hint: if verdict.correct { None } else { sub.hint.clone() },
            last_step: !session.has_next_sub(),
        })
    }

    pub fn finish_summary(&self) -> FinishSummary {
        FinishSummary {
            answered: self.stats.answered,
            correct: self.stats.correct,
            seconds: self.stats.seconds_spent,
            mastered: self.stats.mastered.clone(),
            final_tier: self
                .session
                .as_ref()
                .map(|s| s.difficulty)
                .unwrap_or(Difficulty::Easy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;

    #[test]
    fn question_view_tracks_round_progress() {
        let mut engine = presenting(settings(10), Difficulty::Hard, batch(&[41], Difficulty::Hard, 3));
        answer(&mut engine, false);
        let view = engine.question_view().unwrap();
        assert_eq!(view.step, 2);
        assert_eq!(view.step_count, 3);
        assert_eq!(view.round_number, 1);
        assert_eq!(view.goal, 1);
        assert_eq!(view.progress[0].result, SubResult::Incorrect);
        assert!(view.progress[1].active);
        assert_eq!(view.remaining_seconds, 60);
        assert_eq!(view.warning, None);
    }

    #[test]
    fn feedback_reveals_answer_only_when_correct() {
        let mut engine = presenting(settings(10), Difficulty::Easy, batch(&[1], Difficulty::Easy, 2));
        engine.select_choice(1);
        let effects = engine.submit_answer();
        assert!(has_notice(&effects, |n| matches!(
            n,
            Notice::Feedback(FeedbackView { correct: false, correct_index: None, hint: Some(_), last_step: false, .. })
        )));
        engine.advance();
        engine.select_choice(0);
        let effects = engine.submit_answer();
        assert!(has_notice(&effects, |n| matches!(
            n,
            Notice::Feedback(FeedbackView { correct: true, correct_index: Some(0), last_step: true, .. })
        )));
    }
}
