pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;
mod watch;
mod watches;

pub use client::ApiClient;
pub use error::ApiError;
pub use watch::{Watch, Watcher};
pub use watches::MediaUpdate;
