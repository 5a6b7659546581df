//! Inventory TUI - Terminal console for an inventory service

pub mod app;
pub mod event;
pub mod tui;
pub mod views;

pub use app::App;
pub use tui::Tui;
