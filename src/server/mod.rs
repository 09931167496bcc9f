//! JSON HTTP API. Axum accepts connections; [routes::route_request] does the dispatch.

use std::io;
use std::net::SocketAddr;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::parallel::WorkerPool;

pub mod api;
pub mod routes;

use routes::{error_response, route_request, HttpResponse};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
    #[error("server stopped: {0}")]
    Serve(#[source] io::Error),
}

pub fn router(pool: WorkerPool) -> Router {
    Router::new().fallback(dispatch).with_state(pool)
}

async fn dispatch(
    State(pool): State<WorkerPool>,
    method: Method,
    uri: Uri,
    body: String,
) -> HttpResponse {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    // Sweeps are CPU-bound; keep them off the reactor threads.
    let routed = tokio::task::spawn_blocking(move || {
        let response = route_request(method.as_str(), &path, &body, &pool);
        info!(%method, %path, status = response.status_code, "request");
        response
    })
    .await;

    match routed {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "request handler panicked");
            error_response(500, "Internal Server Error", "Request handler failed")
        }
    }
}

pub async fn serve(bind: SocketAddr, pool: WorkerPool) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|source| ServerError::Bind { addr: bind, source })?;
    info!(%bind, workers = pool.workers, "ev-policy-engine listening");
    axum::serve(listener, router(pool))
        .await
        .map_err(ServerError::Serve)
}

pub fn run_server(bind: SocketAddr, pool: WorkerPool) -> Result<(), ServerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ServerError::Runtime)?;
    runtime.block_on(serve(bind, pool))
}
