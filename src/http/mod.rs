//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → routing::Router::dispatch(uri.path())
//!     → endpoint handler, or response.rs 404
//!     → Send to client (request ID echoed)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{echo_handler, HttpHandle};
pub use server::{HttpServer, ServerError};
