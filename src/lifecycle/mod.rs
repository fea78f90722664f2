//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! Ctrl+C (main) or test harness
//!     → shutdown.rs trigger
//!     → every server awaiting `signal()` drains and stops
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
