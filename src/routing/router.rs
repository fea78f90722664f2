//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled endpoints in registration order
//! - Dispatch: guess cache first, brute pass second, explicit no-match last
//! - Feed brute-force hits back into the guess cache
//!
//! # Design Decisions
//! - Endpoints are immutable after construction; only the cache mutates
//! - Registration order is the scan order and the tie-break for overlapping
//!   patterns, on the fast path as well as the brute pass
//! - HTTP method is carried for diagnostics only, never matched

use std::fmt;

use crate::observability::metrics;
use crate::routing::guess::{BucketSnapshot, GuessCache};
use crate::routing::matcher::{match_segments, slash_offsets, Captured};
use crate::routing::params::{ParamPool, Params};
use crate::routing::pattern::{CompiledPattern, Segment};

/// A handler taking the request path and its parameters.
pub type Handle = Box<dyn Fn(&str, Params<'_>) + Send + Sync>;

/// A registered pattern and its handler.
pub struct Endpoint<H> {
    method: Option<String>,
    pattern: String,
    handler: H,
    compiled: CompiledPattern,
    /// Earlier endpoints whose patterns can match the same paths.
    shadowed_by: Vec<usize>,
}

impl<H> Endpoint<H> {
    pub fn new(pattern: impl Into<String>, handler: H) -> Self {
        let pattern = pattern.into();
        let compiled = CompiledPattern::compile(&pattern);
        Self {
            method: None,
            pattern,
            handler,
            compiled,
            shadowed_by: Vec::new(),
        }
    }

    /// Attach an HTTP method (informational).
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }
}

impl<H> fmt::Debug for Endpoint<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("param_count", &self.compiled.param_count())
            .finish()
    }
}

/// True when some path could match both patterns.
fn overlaps(a: &CompiledPattern, b: &CompiledPattern) -> bool {
    a.segments().len() == b.segments().len()
        && a.segments()
            .iter()
            .zip(b.segments())
            .all(|pair| match pair {
                (Segment::Literal(x), Segment::Literal(y)) => x == y,
                _ => true,
            })
}

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Guess,
    Brute,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Guess => "guess",
            Source::Brute => "brute",
        }
    }
}

/// A successful dispatch.
///
/// Holds the pooled parameter buffer until dropped.
pub struct Match<'r, 'p, H> {
    index: usize,
    endpoint: &'r Endpoint<H>,
    path: &'p str,
    captured: Captured<'r>,
    source: Source,
}

impl<H> Match<'_, '_, H> {
    pub fn handler(&self) -> &H {
        &self.endpoint.handler
    }

    pub fn endpoint(&self) -> &Endpoint<H> {
        self.endpoint
    }

    /// Registration index of the matched endpoint.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn params(&self) -> Params<'_> {
        match self.captured.as_deref() {
            Some(spans) => Params::new(&self.endpoint.compiled, self.path, spans),
            None => Params::empty(&self.endpoint.compiled, self.path),
        }
    }
}

impl<H> fmt::Debug for Match<'_, '_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("index", &self.index)
            .field("pattern", &self.endpoint.pattern)
            .field("path", &self.path)
            .field("params", &self.params().to_vec())
            .field("source", &self.source)
            .finish()
    }
}

/// Router counters for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RouterStats {
    pub endpoints: usize,
    pub max_path_len: usize,
    pub max_params: usize,
    pub buckets: usize,
    pub guesses: usize,
}

/// Path router with a self-learning fast path.
pub struct Router<H> {
    endpoints: Vec<Endpoint<H>>,
    pool: ParamPool,
    cache: GuessCache,
}

impl<H> Router<H> {
    /// Build a router. Paths of `max_len` bytes or more skip the fast path.
    pub fn new(max_len: usize, endpoints: impl IntoIterator<Item = Endpoint<H>>) -> Self {
        let mut endpoints: Vec<Endpoint<H>> = endpoints.into_iter().collect();
        for i in 0..endpoints.len() {
            let shadowed_by = (0..i)
                .filter(|&j| overlaps(&endpoints[j].compiled, &endpoints[i].compiled))
                .collect();
            endpoints[i].shadowed_by = shadowed_by;
        }

        let max_params = endpoints
            .iter()
            .map(|e| e.compiled.param_count())
            .max()
            .unwrap_or(0);

        tracing::debug!(
            endpoints = endpoints.len(),
            max_len,
            max_params,
            "Router compiled"
        );

        Self {
            endpoints,
            pool: ParamPool::new(max_params),
            cache: GuessCache::new(max_len),
        }
    }

    pub fn endpoints(&self) -> &[Endpoint<H>] {
        &self.endpoints
    }

    /// Resolve `path` to an endpoint and its parameters.
    pub fn dispatch<'r, 'p>(&'r self, path: &'p str) -> Option<Match<'r, 'p, H>> {
        if let Some((index, captured)) = self.guess(path) {
            metrics::record_dispatch(Source::Guess.as_str());
            return Some(self.matched(index, path, captured, Source::Guess));
        }

        if let Some((index, captured, slashes)) = self.brute(path) {
            self.cache
                .learn(index, &self.endpoints[index].compiled, path, &slashes);
            metrics::record_dispatch(Source::Brute.as_str());
            return Some(self.matched(index, path, captured, Source::Brute));
        }

        metrics::record_dispatch("miss");
        None
    }

    /// Fast path: probe learned guesses, confirm with the exact matcher.
    fn guess(&self, path: &str) -> Option<(usize, Captured<'_>)> {
        self.cache.lookup(path, |index, slashes| {
            let captured = self.try_match(index, slashes, path)?;
            // Any earlier endpoint matching this path overlaps `index`, so the
            // first hit among `shadowed_by` is what the brute pass would pick.
            for &earlier in &self.endpoints[index].shadowed_by {
                if let Some(first) = self.try_match(earlier, slashes, path) {
                    return Some((earlier, first));
                }
            }
            Some((index, captured))
        })
    }

    /// Linear scan in registration order.
    fn brute(&self, path: &str) -> Option<(usize, Captured<'_>, Vec<usize>)> {
        let slashes = slash_offsets(path);
        (0..self.endpoints.len()).find_map(|index| {
            self.try_match(index, &slashes, path)
                .map(|captured| (index, captured, slashes.clone()))
        })
    }

    fn try_match(&self, index: usize, slashes: &[usize], path: &str) -> Option<Captured<'_>> {
        match_segments(&self.endpoints[index].compiled, slashes, path, &self.pool)
    }

    fn matched<'r, 'p>(
        &'r self,
        index: usize,
        path: &'p str,
        captured: Captured<'r>,
        source: Source,
    ) -> Match<'r, 'p, H> {
        Match {
            index,
            endpoint: &self.endpoints[index],
            path,
            captured,
            source,
        }
    }

    /// Read-only dump of the guess cache.
    pub fn snapshot(&self) -> Vec<BucketSnapshot> {
        self.cache
            .snapshot(|index| self.endpoints[index].pattern.clone())
    }

    pub fn stats(&self) -> RouterStats {
        RouterStats {
            endpoints: self.endpoints.len(),
            max_path_len: self.cache.max_len(),
            max_params: self.pool.capacity(),
            buckets: self.cache.bucket_count(),
            guesses: self.cache.len(),
        }
    }
}

impl<H> Router<H>
where
    H: Fn(&str, Params<'_>),
{
    /// Run the handler for `path`. Returns false when nothing matched.
    pub fn call(&self, path: &str) -> bool {
        match self.dispatch(path) {
            Some(m) => {
                (m.handler())(path, m.params());
                true
            }
            None => false,
        }
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("endpoints", &self.endpoints)
            .field("stats", &self.stats())
            .finish()
    }
}
