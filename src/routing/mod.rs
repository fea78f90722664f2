//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → guess.rs (bucket for the path's byte length, probe each guess)
//!         → matcher.rs (confirm the probed endpoint exactly)
//!     → on miss: router.rs brute pass (every endpoint, registration order)
//!         → guess.rs learner (mask path, append guess, rebuild check sets)
//!     → Return: Match (handler + pooled params) or NoMatch
//!
//! Route Compilation (at startup):
//!     (pattern, handler)[]
//!     → pattern.rs (segments + parameter flags)
//!     → size params.rs pool to the widest endpoint
//!     → Freeze endpoints; only the guess cache mutates afterwards
//! ```
//!
//! # Design Decisions
//! - No prefix tree: repeated traffic is confirmed in O(k) byte probes
//! - The exact matcher is always the authority; probes only pre-filter
//! - Deterministic: the same path always resolves to the same endpoint
//! - First registered match wins

pub mod guess;
pub mod matcher;
pub mod params;
pub mod pattern;
pub mod router;

pub use guess::{BucketSnapshot, GuessSnapshot};
pub use params::{Param, Params};
pub use pattern::PARAM_MARKER;
pub use router::{Endpoint, Handle, Match, Router, RouterStats, Source};
