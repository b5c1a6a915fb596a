//! HTTP layer: routes, handlers and the listening server

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::leaderboard::LeaderboardService;
use crate::store::{JsonFileStore, MemoryStore, ScoreStore};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use shared::{ScoreRecord, Submission};
use std::future::Future;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub leaderboard: Arc<LeaderboardService>,
    pub index_file: Arc<PathBuf>,
}

impl AppState {
    pub fn new(leaderboard: Arc<LeaderboardService>, index_file: impl Into<PathBuf>) -> Self {
        Self {
            leaderboard,
            index_file: Arc::new(index_file.into()),
        }
    }
}

/// Builds the router
///
/// Known paths answer 404 for methods they do not handle, same as unknown
/// paths.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index).fallback(not_found))
        .route("/index.html", get(serve_index).fallback(not_found))
        .route("/leaderboard", get(get_leaderboard).fallback(not_found))
        .route("/submit_score", post(submit_score).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<ScoreRecord>> {
    let standings = state.leaderboard.standings().await;
    debug!("Serving leaderboard with {} players", standings.len());
    Json(standings)
}

async fn submit_score(State(state): State<AppState>, body: Bytes) -> Response {
    let submission = Submission::from_body(&body);

    match state.leaderboard.submit(&submission).await {
        Ok(_) => (StatusCode::OK, "Score Saved").into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist score").into_response(),
    }
}

async fn serve_index(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.index_file.as_path()).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            content,
        )
            .into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Index page {} not found", state.index_file.display());
            (StatusCode::NOT_FOUND, "HTML file not found").into_response()
        }
        Err(e) => {
            error!(
                "Failed to read index page {}: {}",
                state.index_file.display(),
                e
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "players": state.leaderboard.player_count().await,
    }))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// A bound listener plus the router it serves
pub struct Server {
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Server {
    /// Opens the store, loads the leaderboard and binds the listener
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        let store: Arc<dyn ScoreStore> = if config.in_memory {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(JsonFileStore::open(&config.data_file).await?)
        };

        let leaderboard = Arc::new(LeaderboardService::new(store, config.durability).await);
        let state = AppState::new(leaderboard, config.index_file.clone());

        let addr = config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!("Server listening on {}", addr);

        Ok(Server {
            listener,
            router: build_router(state.clone()),
            state,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(ServerError::Serve)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serves until Ctrl+C
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, shutting down gracefully...");
        })
        .await
    }

    /// Serves until `shutdown` completes, then drains in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server started successfully");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        info!("Server shut down");
        Ok(())
    }
}
