//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch fallback
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener with graceful shutdown
//! - Dispatch every path through the length router

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::{not_found, HttpHandle};
use crate::observability::metrics;
use crate::routing::Router as LenRouter;

/// Error type for serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to serve: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<LenRouter<HttpHandle>>,
}

/// HTTP front end for a [`LenRouter`].
pub struct HttpServer {
    app: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `router`.
    pub fn new(config: AppConfig, router: Arc<LenRouter<HttpHandle>>) -> Self {
        let state = AppState { router };
        let app = Self::build_router(&config, state);
        Self { app, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request.request_id(),
                        )
                    }))
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The Axum app, for driving requests without a socket.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request path and run the matched endpoint's handler.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path();

    let response = match state.router.dispatch(path) {
        Some(matched) => {
            tracing::trace!(
                pattern = %matched.endpoint().pattern(),
                source = matched.source().as_str(),
                "Route matched"
            );
            (matched.handler())(path, matched.params())
        }
        None => {
            tracing::debug!(request_id = %request.request_id(), path = %path, "No route matched");
            not_found()
        }
    };

    metrics::record_http_response(response.status().as_u16());
    response
}
