use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::Layer;

use crate::{provider::QuoteSource, storage::Storage};

mod cors;
mod error;
mod handlers;
mod method_override;
mod models;
mod views;

pub use views::Views;

use handlers::{
    delete_favorite, favorite_details, list_favorites, not_found, random_quotes, save_quote,
    update_favorite,
};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage + Send + Sync>,
    pub quotes: Arc<dyn QuoteSource>,
    pub views: Arc<Views>,
    pub quote_count: usize,
}

fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(random_quotes))
        .route("/favorite-quotes", get(list_favorites))
        .route(
            "/favorite-quotes/:id",
            get(favorite_details)
                .put(update_favorite)
                .delete(delete_favorite),
        )
        .route("/quote", post(save_quote))
        .fallback(not_found)
        .with_state(state)
}

/// The full application: routes behind method override, optionally behind CORS.
pub fn app(state: AppState, cors: bool) -> Router {
    let routes = middleware::from_fn(method_override::method_override).layer(routes(state));
    let app = Router::new().fallback_service(routes);
    if cors {
        app.layer(middleware::from_fn(cors::cors))
    } else {
        app
    }
}

pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    cors: bool,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state, cors))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 HTTP shutdown requested");
        })
        .await?;
    log::info!("👋 HTTP server exited");
    Ok(())
}
