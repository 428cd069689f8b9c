//! HTTP routes
//!
//! - `GET /` landing page
//! - `POST /chat` relays one message plus history to the provider
//! - `GET /static/*` files from the configured static directory

pub mod chat;
pub mod pages;

pub use chat::{ChatRequestBody, ChatResponseBody};
pub use pages::IndexPage;

use axum::routing::{get, post};
use axum::Router;
use relaychat_core::CompletionAggregator;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<CompletionAggregator>,
    pub index: IndexPage,
}

impl AppState {
    pub fn new(aggregator: CompletionAggregator, index: IndexPage) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            index,
        }
    }
}

/// Build the application router
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/chat", post(chat::handle_chat))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
