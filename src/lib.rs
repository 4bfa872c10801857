pub mod app;
pub mod config;
pub mod gemini;
pub mod handler;
pub mod prompt;
pub mod tui;
pub mod ui;
