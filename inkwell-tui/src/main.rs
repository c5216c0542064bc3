mod app;
mod error;
mod login;
mod paths;
mod settings;
mod terminal;
mod users;

use std::fs::{self, File};
use std::sync::Arc;

use inkwell_lib::Config;
use inkwell_lib::api::{ApiClient, ReqwestTransport, SimulatedBackend, Transport};
use inkwell_lib::auth::AuthService;
use inkwell_lib::config::Backend;
use inkwell_lib::session::Session;
use inkwell_lib::storage::{SqliteBackend, Storage};
use simplelog::{LevelFilter, WriteLogger};

use crate::app::Exit;
use crate::error::AppError;
use crate::settings::Settings;

fn init_logging(debug: bool) {
    let Some(path) = paths::log_file() else { return };
    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    if let Ok(file) = File::create(&path) {
        let _ = WriteLogger::init(level, simplelog::Config::default(), file);
    }
}

async fn open_storage() -> Storage {
    if let Some(path) = paths::store_db() {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match SqliteBackend::open(&path).await {
            Ok(backend) => return Storage::new(backend),
            Err(e) => log::warn!("Falling back to in-memory storage ({}): {}", path.display(), e),
        }
    }
    Storage::in_memory()
}

fn transport(config: &Config) -> Result<Arc<dyn Transport>, AppError> {
    Ok(match config.backend {
        Backend::Simulated => Arc::new(SimulatedBackend::new().with_delay(config.simulate_delay)),
        Backend::Http => Arc::new(ReqwestTransport::new(&config.api_base_url)?.timeout(config.request_timeout)),
    })
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    init_logging(config.debug);
    log::info!(
        "Starting inkwell ({}, {:?} backend, {})",
        config.app_env.as_str(),
        config.backend,
        config.api_base_url
    );

    let storage = open_storage().await;
    let session = Session::open(storage.clone())
        .await?
        .with_expiry_check(config.check_token_expiry);
    let client = ApiClient::from_arc(transport(&config)?, Arc::new(session));
    let auth = AuthService::new(client);
    let settings = Settings::new(storage);
    if config.reset_preferences {
        settings.reset().await?;
    }

    loop {
        if !auth.is_authenticated() {
            login::prompt(&auth, config.backend == Backend::Simulated).await?;
        }
        match app::run(auth.clone(), settings.clone(), &config).await? {
            Exit::Quit => break,
            Exit::SignedOut => println!("Signed out."),
        }
    }

    auth.client().session().close();
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    if let Some(env_file) = paths::env_file() {
        let _ = dotenvy::from_path(env_file);
    }

    if let Err(e) = run().await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
    }
}
