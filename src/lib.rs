pub mod app;
pub mod backend;
pub mod components;
pub mod config;
pub mod gallery;
pub mod tui;
pub mod types;
pub mod utils;
mod widgets;
