//! spacestore - tenant-scoped upload server with safe archive extraction.

mod cli;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use spacestore_core::KeyMap;
use spacestore_server::AppState;
use spacestore_server::router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = cli::Args::parse();

    let keys = KeyMap::load(&args.keys)
        .with_context(|| format!("failed to load API keys from {}", args.keys.display()))?;
    info!(keys = keys.len(), "loaded API keys");

    tokio::fs::create_dir_all(&args.uploads_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create uploads directory {}",
                args.uploads_dir.display()
            )
        })?;

    let app = router(AppState::new(keys, args.uploads_dir), args.max_upload_size);

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "spacestore=info,spacestore_server=info,spacestore_core=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("received termination signal, shutting down");
}
