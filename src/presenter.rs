use crate::engine::Notice;
use crate::error::QuizIssue;
use crate::model::Difficulty;
use crate::view_models::{FeedbackView, FinishSummary, QuestionView};

/// Capa de presentación: la UI egui o un doble de test.
pub trait Presenter {
    fn render(&mut self, view: &QuestionView);
    fn show_feedback(&mut self, view: &FeedbackView);
    fn show_tier_up(&mut self, from: Difficulty, to: Difficulty);
    fn show_finished(&mut self, summary: &FinishSummary);
    fn show_issue(&mut self, issue: &QuizIssue);
}

pub fn dispatch(presenter: &mut impl Presenter, notice: &Notice) {
    match notice {
        Notice::Render(view) => presenter.render(view),
        Notice::Feedback(view) => presenter.show_feedback(view),
        Notice::TierUp { from, to } => presenter.show_tier_up(*from, *to),
        Notice::Finished(summary) => presenter.show_finished(summary),
        Notice::Issue(issue) => presenter.show_issue(issue),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Guarda cada llamada como texto.
    #[derive(Default)]
    pub(crate) struct Transcript {
        pub lines: Vec<String>,
        pub last_feedback: Option<FeedbackView>,
    }

    impl Presenter for Transcript {
        fn render(&mut self, view: &QuestionView) {
            self.lines.push(format!("render {}", view.sub_prompt));
        }

        fn show_feedback(&mut self, view: &FeedbackView) {
            self.lines.push(format!("feedback {}", view.correct));
            self.last_feedback = Some(view.clone());
        }

        fn show_tier_up(&mut self, from: Difficulty, to: Difficulty) {
            self.lines.push(format!("tier {from}->{to}"));
        }

        fn show_finished(&mut self, summary: &FinishSummary) {
            self.lines.push(format!("finished {}", summary.answered));
        }

        fn show_issue(&mut self, issue: &QuizIssue) {
            self.lines.push(format!("issue {issue}"));
        }
    }

    #[test]
    fn notices_route_to_matching_calls() {
        let mut transcript = Transcript::default();
        dispatch(
            &mut transcript,
            &Notice::TierUp {
                from: Difficulty::Easy,
                to: Difficulty::Medium,
            },
        );
        dispatch(&mut transcript, &Notice::Issue(QuizIssue::InvalidSelection));
        assert_eq!(transcript.lines[0], "tier Easy->Medium");
        assert!(transcript.lines[1].starts_with("issue Debes elegir"));
    }
}
