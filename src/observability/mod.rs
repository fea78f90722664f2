//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing + http produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (dispatch counters, guess cache gauge)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The hot path never logs; learning logs at debug
//! - Request ID (from the HTTP layer) is attached to request spans
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
