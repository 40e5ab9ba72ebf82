mod helpers;
pub mod layout;
pub mod views;

use crate::app::QuizApp;
use crate::model::AppState;
use eframe::{APP_KEY, App, Frame, set_value};
use egui::Context;
use layout::{bottom_panel, top_panel};
use std::time::Duration;

impl App for QuizApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // Completions de hilos y reloj de la pregunta
        self.sync();
        let now = ctx.input(|i| i.time);
        if self.drive_clock(now) {
            ctx.request_repaint_after(Duration::from_millis(250));
        } else if self.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // BOTÓN SUPERIOR: abandonar durante el quiz, borrar progreso en los menús
        if matches!(self.state, AppState::Quiz | AppState::Loading) {
            top_panel(self, ctx, true);
        } else if matches!(self.state, AppState::Welcome | AppState::TierMenu) {
            top_panel(self, ctx, false);
        }

        // PANEL INFERIOR TEMA OSCURO O CLARO
        bottom_panel(ctx);

        match self.state {
            AppState::Welcome => views::welcome::ui_welcome(self, ctx),
            AppState::TierMenu => views::tier_menu::ui_tier_menu(self, ctx),
            AppState::Loading => views::loading::ui_loading(self, ctx),
            AppState::Quiz => views::quiz::ui_quiz(self, ctx),
            AppState::TierUp => views::tier_up::ui_tier_up(self, ctx),
            AppState::Finished => views::finished::ui_finished(self, ctx),
            AppState::Unavailable => views::unavailable::ui_unavailable(self, ctx),
        }

        if self.confirm_reset {
            self.confirm_reset(ctx);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        set_value(storage, APP_KEY, self);
    }
}
