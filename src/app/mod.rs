mod wiring;

use crate::{cli, configuration::Configuration, rest, storage};
use anyhow::{Context as AnyhowContext, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub config: Configuration,
    pub storage: Arc<dyn storage::Storage + Send + Sync>,
}

impl App {
    pub fn from_cli() -> Result<Self> {
        let cli = cli::parse();
        let config = Configuration::from_cli(&cli);

        crate::tracing::init(config.log_file.as_deref());
        log::info!("🚀 Starting quotebook");
        log::info!("📂 Data dir: {}", config.data_dir.display());
        if let Some(path) = config.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.display());
        }

        wiring::init_data_dir(&config).context("initializing data dir")?;
        let storage = wiring::init_storage(&config)?;

        Ok(Self { config, storage })
    }
}

pub async fn run_server(app: App) -> Result<()> {
    let provider = wiring::build_provider(&app.config)?;
    let state = wiring::build_state(&app.config, app.storage.clone(), provider)?;

    let shutdown = CancellationToken::new();
    let server_shutdown = shutdown.clone();
    let listen = app.config.listen;
    let cors = app.config.cors;

    let mut server = tokio::spawn(async move {
        rest::serve(listen, state, cors, server_shutdown).await
    });

    let finished = tokio::select! {
        res = &mut server => Some(res),
        _ = tokio::signal::ctrl_c() => None,
    };
    let result = match finished {
        Some(res) => res,
        None => {
            log::info!("🧨 Ctrl-C received, shutting down");
            shutdown.cancel();
            server.await
        }
    };

    // Last handle to the database; closes the connection.
    drop(app);

    match result {
        Ok(Ok(())) => {
            log::info!("✅ Shutdown complete");
            Ok(())
        }
        Ok(Err(e)) => {
            log::error!("HTTP server error: {:#}", e);
            Err(e)
        }
        Err(e) => {
            log::error!("HTTP server task failed: {}", e);
            Err(e.into())
        }
    }
}

pub async fn run() -> Result<()> {
    let app = App::from_cli()?;
    run_server(app).await
}
