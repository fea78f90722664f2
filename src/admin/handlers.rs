use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::routing::{BucketSnapshot, RouterStats};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub router: RouterStats,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        router: state.router.stats(),
    })
}

/// Guess cache dump: one entry per non-empty length bucket.
pub async fn get_guesses(State(state): State<AdminState>) -> Json<Vec<BucketSnapshot>> {
    Json(state.router.snapshot())
}
