//! Admin API.
//!
//! Read-only views of the router for operators. Nothing served here feeds
//! back into matching.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::http::HttpHandle;
use crate::routing::Router as LenRouter;

use self::auth::admin_auth_middleware;
use self::handlers::*;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub router: Arc<LenRouter<HttpHandle>>,
    pub api_key: Arc<str>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/guesses", get(get_guesses))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
