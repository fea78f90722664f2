//! Length-bucketed HTTP path router with a self-learning fast path.
//!
//! ```
//! use len_router::{Endpoint, Router};
//!
//! let router = Router::new(200, vec![
//!     Endpoint::new("/user/:name", "user"),
//!     Endpoint::new("/repos/:owner/:repo", "repo"),
//! ]);
//!
//! let m = router.dispatch("/repos/rust-lang/rust").unwrap();
//! assert_eq!(*m.handler(), "repo");
//! assert_eq!(m.params().by_name("owner"), Some("rust-lang"));
//! assert!(router.dispatch("/nowhere").is_none());
//! ```

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Endpoint, Match, Param, Params, Router};
