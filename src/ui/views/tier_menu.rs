use crate::QuizApp;
use crate::ui::helpers::big_list_button;
use crate::view_models::TierInfo;
use egui::{Align, Button, CentralPanel, Context, RichText};

pub fn ui_tier_menu(app: &mut QuizApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 400.0;
        let content_width = ui.available_width().min(max_width);
        let button_h = 36.0;

        let infos: Vec<TierInfo> = app.tier_infos();

        let estimated_h = 80.0 + (button_h + 8.0) * (infos.len() as f32 + 1.0);
        let vertical_space = ((ui.available_height() - estimated_h) / 2.0).max(0.0);
        ui.add_space(vertical_space / 2.0);

        ui.vertical_centered_justified(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(24, 16))
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
                        ui.set_width(content_width);
                        ui.heading("Elige nivel");
                        ui.add_space(20.0);

                        for info in &infos {
                            if big_list_button(ui, info.label(), content_width, button_h, info.unlocked) {
                                app.start_tier(info.difficulty);
                                return;
                            }
                            ui.add_space(8.0);
                        }

                        if !app.message.is_empty() {
                            ui.label(RichText::new(&app.message).color(egui::Color32::YELLOW));
                        }

                        ui.add_space(16.0);
                        if ui
                            .add_sized([content_width, button_h], Button::new("Volver al inicio"))
                            .clicked()
                        {
                            app.back_to_welcome();
                        }
                    });
                });
        });

        ui.add_space(vertical_space / 2.0);
    });
}
