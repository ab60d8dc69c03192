use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use pawpal_ai::AssistClient;
use pawpal_api::{AppState, AppStateInner, assist, auth, bookings, messages, pets, reviews};
use pawpal_gateway::{connection, dispatcher::Dispatcher};
use pawpal_store::{SqliteStore, market::Marketplace};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawpal=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("PAWPAL_DB_PATH").unwrap_or_else(|_| "pawpal.db".into());
    let host = std::env::var("PAWPAL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PAWPAL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Store + accessors
    let store = SqliteStore::open(&PathBuf::from(&db_path))?;
    let market = Marketplace::new(Box::new(store));

    // AI assist (PAWPAL_GENAI_API_KEY / PAWPAL_GENAI_URL / PAWPAL_GENAI_MODEL)
    let assist = AssistClient::from_env()?;

    // Shared state
    let dispatcher = Dispatcher::new();
    let state: AppState = Arc::new(AppStateInner {
        market,
        assist,
        dispatcher: dispatcher.clone(),
    });

    // Routes
    let app = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/{id}", get(auth::get_user))
        .route("/users/{id}/pets", get(pets::pets_by_owner))
        .route("/users/{id}/reviews", get(reviews::reviews_for_user))
        .route("/users/{id}/reviews/pending", get(reviews::pending_reviews))
        .route("/pets", get(pets::list_pets))
        .route("/pets", post(pets::create_pet))
        .route("/pets/{id}", get(pets::get_pet))
        .route("/pets/{id}", put(pets::update_pet))
        .route("/pets/{id}", delete(pets::delete_pet))
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/{id}", get(bookings::get_booking))
        .route("/bookings/{id}/status", patch(bookings::update_status))
        .route("/bookings/{id}/messages", get(messages::get_messages))
        .route("/bookings/{id}/messages", post(messages::send_message))
        .route("/reviews", post(reviews::create_review))
        .route("/assist/sops", post(assist::generate_sops))
        .route("/assist/summary", post(assist::summarize_chat))
        .route("/assist/safety-tip", post(assist::safety_tip))
        .route("/gateway", get(ws_upgrade))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("PawPal server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let dispatcher = state.dispatcher.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, dispatcher))
}
