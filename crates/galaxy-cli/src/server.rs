//! HTTP layout service.
//!
//! The record layer posts its live id set to `/reconcile`; renderers poll
//! `/layout`. Readers clone the published snapshot and drop the lock before
//! serializing, so a slow client never holds up a reconcile.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use galaxy_core::{PositionStore, WireLayout};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<PositionStore>>,
}

impl AppState {
    pub fn new(store: PositionStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub layout: WireLayout,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub stars: usize,
    pub generation: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/layout", get(layout))
        .route("/reconcile", post(reconcile))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.store.lock().await.snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stars: snapshot.len(),
        generation: snapshot.generation(),
    })
}

async fn layout(State(state): State<AppState>) -> Json<WireLayout> {
    let (snapshot, min_distance) = {
        let store = state.store.lock().await;
        (store.snapshot(), store.config().min_distance)
    };
    Json(WireLayout::from_layout(&snapshot, min_distance))
}

async fn reconcile(
    State(state): State<AppState>,
    Json(req): Json<ReconcileRequest>,
) -> Json<ReconcileResponse> {
    let (out, min_distance) = {
        let mut store = state.store.lock().await;
        let out = store.reconcile(&req.ids);
        (out, store.config().min_distance)
    };
    tracing::info!(
        generation = out.layout.generation(),
        stars = out.layout.len(),
        added = out.diff.added.len(),
        removed = out.diff.removed.len(),
        "reconciled via http"
    );
    Json(ReconcileResponse {
        layout: WireLayout::from_layout(&out.layout, min_distance),
        added: out.diff.added,
        removed: out.diff.removed,
    })
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve(addr: &str, store: PositionStore) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr().context("failed to read bound address")?;
    tracing::info!("serving layout on http://{local}");

    axum::serve(listener, router(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
