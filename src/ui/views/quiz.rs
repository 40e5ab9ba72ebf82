use crate::QuizApp;
use crate::ui::helpers::{choice_color, progress_nodes};
use egui::{Align, Button, CentralPanel, Context, ProgressBar, RichText, ScrollArea};

enum QuizAction {
    Choose(usize),
    Submit,
    Continue,
}

pub fn ui_quiz(app: &mut QuizApp, ctx: &Context) {
    let Some(question) = app.screen.question.clone() else {
        return;
    };
    let feedback = app.screen.feedback.clone();
    let warning = app.screen.warning.clone();
    let mut action = None;

    CentralPanel::default().show(ctx, |ui| {
        let max_width = 650.0;
        let panel_width = (ui.available_width() * 0.97).min(max_width);

        egui::Frame::default()
            .fill(ui.visuals().window_fill())
            .inner_margin(egui::Margin::symmetric(24, 20))
            .show(ui, |ui| {
                ui.set_width(panel_width);
                ui.vertical_centered(|ui| {
                    ui.heading(format!("🌀 {}", question.header()));
                    ui.label(format!(
                        "⭐ Rondas perfectas: {}/{}",
                        question.score, question.goal
                    ));
                    ui.add_space(6.0);
                    progress_nodes(ui, &question.progress);
                });
                ui.add_space(6.0);

                // Temporizador
                ui.add(
                    ProgressBar::new(question.time_fraction())
                        .text(question.timer_label())
                        .desired_width(panel_width),
                );
                ui.add_space(10.0);

                ScrollArea::vertical()
                    .max_height(120.0)
                    .id_salt("main_prompt")
                    .show(ui, |ui| {
                        ui.label(RichText::new(&question.main_prompt).italics());
                    });
                ui.add_space(6.0);
                ui.label(RichText::new(question.step_label()).weak());
                ui.label(RichText::new(&question.sub_prompt).heading().strong());
                ui.add_space(10.0);

                let answered = feedback.is_some() || question.locked;
                for (i, choice) in question.choices.iter().enumerate() {
                    let mut text = RichText::new(choice).size(18.0);
                    if let Some(color) = feedback.as_ref().and_then(|f| choice_color(f, i)) {
                        text = text.color(color).strong();
                    }
                    let selected = match feedback.as_ref() {
                        Some(f) => f.chosen == Some(i),
                        None => question.selected == Some(i),
                    };
                    let response = ui.add_enabled(!answered, egui::RadioButton::new(selected, text));
                    if response.clicked() {
                        action = Some(QuizAction::Choose(i));
                    }
                    ui.add_space(4.0);
                }

                if let Some(reason) = &question.warning {
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(format!("⚠ Pregunta defectuosa: {reason}"))
                            .color(egui::Color32::YELLOW),
                    );
                }
                if let Some(warning) = &warning {
                    ui.add_space(6.0);
                    ui.label(RichText::new(format!("⚠ {warning}")).color(egui::Color32::YELLOW));
                }

                ui.add_space(12.0);
                ui.with_layout(egui::Layout::top_down(Align::Center), |ui| match &feedback {
                    None => {
                        if ui.add_sized([200.0, 36.0], Button::new("Enviar respuesta")).clicked() {
                            action = Some(QuizAction::Submit);
                        }
                    }
                    Some(f) => {
                        ui.label(RichText::new(f.headline()).heading());
                        if let Some(text) = &f.incorrect_feedback {
                            ui.label(text.as_str());
                        }
                        if let Some(hint) = &f.hint {
                            ui.label(RichText::new(format!("💡 Pista: {hint}")).weak());
                        }
                        ui.add_space(8.0);
                        if ui.add_sized([200.0, 36.0], Button::new(f.continue_label())).clicked() {
                            action = Some(QuizAction::Continue);
                        }
                    }
                });
            });
    });

    match action {
        Some(QuizAction::Choose(i)) => app.choose(i),
        Some(QuizAction::Submit) => app.submit(),
        Some(QuizAction::Continue) => app.continue_quiz(),
        None => {}
    }
}
