//! Bibliography Server
//!
//! Serves page images, text geometry, bookmarks and full-text search for
//! a single bibliography PDF.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibliography_server::bootstrap::ensure_document;
use bibliography_server::document::{DocumentSource, PdfDocument};
use bibliography_server::{routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bibliography_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Bibliography Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Search index directory: {}", config.search.index_dir.display());

    let document = load_document(&config).await;

    let state = AppState::new(config.clone(), document);

    // Build the index up front so the first query does not pay for it
    let search_state = state.clone();
    let ready = tokio::task::spawn_blocking(move || search_state.search().ensure_index())
        .await
        .context("index build task panicked")?;
    if ready {
        tracing::info!("Search index initialized successfully");
    } else {
        tracing::warn!("Search index initialization failed, search will be disabled");
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!("failed to bind {}:{}", config.server.host, config.server.port)
        })?;
    tracing::info!("Bibliography Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Locate or download the PDF and open it
///
/// Any failure is logged and the server starts without a document.
async fn load_document(config: &Config) -> Option<Arc<dyn DocumentSource>> {
    let path = match ensure_document(&config.document.path, &config.document.url).await {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("PDF initialization failed: {}", e);
            return None;
        }
    };

    let scale = config.document.render_scale;
    let opened = tokio::task::spawn_blocking(move || {
        PdfDocument::open(&path).map(|doc| doc.with_scale(scale))
    })
    .await;

    match opened {
        Ok(Ok(doc)) => Some(Arc::new(doc) as Arc<dyn DocumentSource>),
        Ok(Err(e)) => {
            tracing::warn!("Failed to open PDF: {}", e);
            None
        }
        Err(e) => {
            tracing::error!("PDF open task failed: {}", e);
            None
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
