use crate::QuizApp;
use egui::{Align, Button, CentralPanel, Context, RichText};

pub fn ui_welcome(app: &mut QuizApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 540.0;
        let content_width = ui.available_width().min(max_width);

        // Centrar verticalmente
        let estimated_h = 260.0;
        let vs = ((ui.available_height() - estimated_h) / 2.0).max(0.0);
        ui.add_space(vs / 2.0);

        ui.vertical_centered(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(16, 16))
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
                        ui.heading("🧮 Quiz de matemáticas");
                        ui.label("Supera cada nivel con rondas perfectas para desbloquear el siguiente.");
                        ui.add_space(18.0);

                        let btn_w = (content_width * 0.9).clamp(120.0, 400.0);
                        let btn_h = 40.0;
                        let hay_guardado = app.has_saved_progress();

                        let btn_cont = if hay_guardado {
                            let label = format!("▶ Continuar en {}", app.progress.unlocked.label());
                            Some(ui.add_sized([btn_w, btn_h], Button::new(label)))
                        } else {
                            None
                        };
                        ui.add_space(5.0);
                        let btn_start = ui.add_sized([btn_w, btn_h], Button::new("🔄 Empezar de 0"));
                        ui.add_space(5.0);
                        let btn_menu = ui.add_sized([btn_w, btn_h], Button::new("📊 Elegir nivel"));

                        if let Some(b) = btn_cont {
                            if b.clicked() {
                                app.continue_from_progress();
                            }
                        }
                        if btn_start.clicked() {
                            if hay_guardado {
                                app.confirm_reset = true;
                            } else {
                                app.start_tier(crate::model::Difficulty::Easy);
                            }
                        }
                        if btn_menu.clicked() {
                            app.open_tier_menu();
                        }

                        if let Some(summary) = app.lifetime_summary() {
                            ui.add_space(10.0);
                            ui.label(RichText::new(summary).weak());
                        }

                        if !app.message.is_empty() {
                            ui.add_space(10.0);
                            ui.label(RichText::new(&app.message).color(egui::Color32::YELLOW));
                        }
                    });
                });
        });

        ui.add_space(vs / 2.0);
    });
}
