use crate::tui;
use color_eyre::config::HookBuilder;
use color_eyre::{eyre, Result};
use directories::{ProjectDirs, UserDirs};
use std::panic;
use std::path::PathBuf;

pub fn initialize_panic_handler() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default().into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = tui::restore() {
            log::error!("failed to restore terminal: {e}");
        }
        panic_hook(panic_info);
    }));
    Ok(())
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
        .ok_or_else(|| eyre::eyre!("failed to determine home directory"))
}

pub fn get_config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn get_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// The user's download directory, falling back to the data directory.
pub fn get_download_dir() -> Result<PathBuf> {
    match UserDirs::new().and_then(|dirs| dirs.download_dir().map(PathBuf::from)) {
        Some(dir) => Ok(dir),
        None => Ok(get_data_dir()?.join("downloads")),
    }
}
