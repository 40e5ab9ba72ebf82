pub mod app;
pub mod authoring;
pub mod config;
pub mod controller;
pub mod data;
pub mod engine;
pub mod error;
pub mod model;
pub mod presenter;
pub mod recorder;
#[cfg(not(target_arch = "wasm32"))]
pub mod remote;
pub mod store;
pub mod ui;
pub mod view_models;

pub use app::QuizApp;
