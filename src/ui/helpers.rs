// src/ui/helpers.rs
use crate::engine::SubResult;
use crate::view_models::{FeedbackView, ProgressNode};
use egui::{Button, Color32, RichText, Ui, Vec2};

pub fn big_list_button(ui: &mut Ui, label: String, width: f32, height: f32, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(label).min_size(Vec2::new(width, height)))
        .clicked()
}

/// Fila de nodos de la ronda: acertada, fallada, actual o pendiente.
pub fn progress_nodes(ui: &mut Ui, nodes: &[ProgressNode]) {
    ui.horizontal(|ui| {
        for node in nodes {
            let color = match node.result {
                SubResult::Correct => Color32::from_rgb(60, 170, 90),
                SubResult::Incorrect => Color32::from_rgb(210, 70, 60),
                SubResult::Unanswered if node.active => ui.visuals().strong_text_color(),
                SubResult::Unanswered => Color32::GRAY,
            };
            ui.label(RichText::new(node.symbol()).size(20.0).color(color));
        }
    });
}

/// Color de una opción una vez enviada la respuesta.
pub fn choice_color(feedback: &FeedbackView, index: usize) -> Option<Color32> {
    if feedback.correct_index == Some(index) {
        Some(Color32::from_rgb(60, 170, 90))
    } else if feedback.chosen == Some(index) && !feedback.correct {
        Some(Color32::from_rgb(210, 70, 60))
    } else {
        None
    }
}
