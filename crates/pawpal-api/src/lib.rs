pub mod assist;
pub mod auth;
pub mod bookings;
pub mod messages;
pub mod pets;
pub mod reviews;

use std::sync::Arc;

use axum::http::StatusCode;
use tracing::error;

use pawpal_ai::AssistClient;
use pawpal_gateway::dispatcher::Dispatcher;
use pawpal_store::market::Marketplace;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub market: Marketplace,
    pub assist: AssistClient,
    pub dispatcher: Dispatcher,
}

/// Run a blocking store operation off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, StatusCode>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("store operation failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
