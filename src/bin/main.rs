use clap::Parser;
use color_eyre::{eyre, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use tuigallery::app::App;
use tuigallery::backend::auth::AuthContext;
use tuigallery::backend::ApiClient;
use tuigallery::config::Config;
use tuigallery::utils::{get_config_dir, get_download_dir, initialize_panic_handler};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Terminal client for the wedding photo and video gallery.
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Base URL of the gallery API.
    #[arg(short, long)]
    base_url: Option<String>,
    /// Directory where downloads and exports are saved.
    #[arg(short, long)]
    download_dir: Option<PathBuf>,
    /// Write logs to this file (enable with RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Check the server status and exit.
    #[arg(long)]
    health: bool,
}

impl Args {
    fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config {
            Ok(path.clone())
        } else {
            Self::default_config_path()
        }
    }
    fn default_config_path() -> Result<PathBuf> {
        let config_dir = get_config_dir()?;
        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("tuigallery.config.toml"))
    }
}

fn init_logger(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Off);
    }
    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

async fn health(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api, AuthContext::new(None))?;
    let health = client.health().await?;
    if health.is_ok() {
        println!("{}: {}", client.base_url(), health.status);
        Ok(())
    } else {
        Err(eyre::eyre!("{}: {}", client.base_url(), health.status))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let path = args.config_path()?;
    let mut config: Config = if path.exists() {
        toml::from_str(&fs::read_to_string(&path)?)?
    } else {
        Config::default()
    };
    config.set_default_keybindings();
    if let Some(base_url) = args.base_url.clone() {
        config.api.base_url = base_url;
    }
    if let Some(dir) = args.download_dir.clone() {
        config.gallery.download_dir = Some(dir);
    }
    if config.gallery.download_dir.is_none() {
        config.gallery.download_dir = Some(get_download_dir()?);
    }

    init_logger(args.log_file.as_ref())?;
    if args.health {
        return health(&config).await;
    }

    initialize_panic_handler()?;

    App::new(config).run().await
}
