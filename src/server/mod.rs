//! HTTP surface.
//!
//! One handler, mounted at `/` and `/calculate-weakness`:
//!
//! - `OPTIONS` → 204 preflight with permissive CORS headers, no body
//! - anything else → decode body → parse → solve → JSON envelope
//!
//! Status mapping:
//!
//! | condition                                   | status | body                                   |
//! |---------------------------------------------|--------|----------------------------------------|
//! | body missing / unreadable / not JSON / empty | 400    | `{"error": "No JSON data provided"}`   |
//! | any `ComputationError` (incl. `1e400`)      | 500    | `{"error": "<message>"}`               |
//! | success                                     | 200    | `{"weights": [...]}`                   |
//!
//! Every response carries `Access-Control-Allow-Origin: *`. The body is read
//! as JSON whatever its `Content-Type`, so a `text/plain` POST with a valid
//! payload still gets a 200.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::domain::{ErrorBody, SolverConfig, WeightsResponse};
use crate::error::{AppError, ComputationError, EXIT_INPUT};
use crate::io::payload::{decode_body, parse_request};
use crate::solver::WeaknessSolver;

pub const NO_JSON_MESSAGE: &str = "No JSON data provided";

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    solver: WeaknessSolver,
    max_body_bytes: usize,
}

impl AppState {
    pub fn new(solver_config: SolverConfig, max_body_bytes: usize) -> Self {
        Self {
            solver: WeaknessSolver::new(solver_config),
            max_body_bytes,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.solver_config(), config.max_body_bytes)
    }
}

pub fn router(state: AppState) -> Router {
    let limit = state.max_body_bytes;
    Router::new()
        .route("/", any(dispatch))
        .route("/calculate-weakness", any(dispatch))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), AppError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to bind {addr}: {e}")))?;

    info!(
        addr = %addr,
        rcond = ?config.rcond,
        max_body_bytes = config.max_body_bytes,
        "weakness solver listening"
    );

    axum::serve(listener, router(AppState::from_config(&config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Server error: {e}")))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "could not install Ctrl-C handler, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        debug!("preflight");
        return preflight();
    }

    let body = match body {
        Ok(bytes) => bytes,
        Err(rejection) => {
            warn!(error = %rejection, "request body rejected");
            return json_response(StatusCode::BAD_REQUEST, &ErrorBody::new(NO_JSON_MESSAGE));
        }
    };

    let Some(value) = decode_body(&body) else {
        debug!(bytes = body.len(), "no JSON data in request");
        return json_response(StatusCode::BAD_REQUEST, &ErrorBody::new(NO_JSON_MESSAGE));
    };

    let started = Instant::now();
    let solver = state.solver;
    let outcome = tokio::task::spawn_blocking(move || -> Result<_, ComputationError> {
        let request = parse_request(&value)?;
        let shape = (request.matrix.rows(), request.matrix.cols());
        solver.compute_request(&request).map(|weights| (weights, shape))
    })
    .await
    .unwrap_or_else(|e| Err(ComputationError::Decomposition(format!("solver task failed: {e}"))));

    match outcome {
        Ok((weights, (rows, cols))) => {
            info!(
                rows,
                cols,
                elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
                "solved"
            );
            json_response(StatusCode::OK, &WeightsResponse { weights })
        }
        Err(e) => {
            warn!(error = %e, "computation failed");
            json_response(StatusCode::INTERNAL_SERVER_ERROR, &ErrorBody::new(e.to_string()))
        }
    }
}

fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "3600"),
        ],
    )
        .into_response()
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let mut resp = (status, Json(body)).into_response();
    resp.headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    resp
}
