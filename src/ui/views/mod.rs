pub mod finished;
pub mod loading;
pub mod quiz;
pub mod tier_menu;
pub mod tier_up;
pub mod unavailable;
pub mod welcome;
