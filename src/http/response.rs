//! Responses produced by the HTTP adapter.
//!
//! # Responsibilities
//! - Map NoMatch to 404 Not Found
//! - Provide the JSON echo handler used for configured routes
//!
//! # Design Decisions
//! - Handlers are synchronous; matching never awaits
//! - Parameters render as a JSON object keyed by name

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::routing::Params;

/// Handler type served by [`crate::http::HttpServer`].
pub type HttpHandle = Box<dyn Fn(&str, Params<'_>) -> Response + Send + Sync>;

/// Response for paths no endpoint matches.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "No matching route found").into_response()
}

/// Handler answering `{"route": name, "path": path, "params": {...}}`.
pub fn echo_handler(name: impl Into<String>) -> HttpHandle {
    let name = name.into();
    Box::new(move |path: &str, params: Params<'_>| {
        let params: Map<String, Value> = params
            .iter()
            .map(|p| (p.key.to_string(), Value::from(p.value)))
            .collect();
        Json(json!({
            "route": name,
            "path": path,
            "params": params,
        }))
        .into_response()
    })
}
