//! Path parameters and the reusable buffer pool behind them.
//!
//! # Responsibilities
//! - Hand out parameter buffers pre-sized to the largest endpoint
//! - Return buffers on every exit path (RAII guard)
//! - Expose captured values as a borrowed, ordered view
//!
//! # Design Decisions
//! - Buffers hold byte spans into the request path, never copies
//! - Exhaustion allocates; acquire never blocks on an empty pool
//! - A buffer is owned by exactly one in-flight match at a time

use std::ops::Deref;
use std::sync::{Mutex, PoisonError};

use crate::routing::pattern::CompiledPattern;

/// Location of one captured value inside the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpan {
    /// Index of the parameter segment in the compiled pattern.
    pub segment: usize,
    pub start: usize,
    pub end: usize,
}

/// Concurrent free-list of span buffers.
#[derive(Debug)]
pub struct ParamPool {
    free: Mutex<Vec<Vec<ParamSpan>>>,
    capacity: usize,
}

impl ParamPool {
    /// Create a pool whose buffers hold `capacity` spans without growing.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Take a cleared buffer, allocating when none is idle.
    pub fn acquire(&self) -> PooledSpans<'_> {
        let recycled = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let buf = recycled.unwrap_or_else(|| Vec::with_capacity(self.capacity));
        PooledSpans { buf, pool: self }
    }

    fn release(&self, mut buf: Vec<ParamSpan>) {
        buf.clear();
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(buf);
    }

    /// Number of buffers currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A buffer on loan from a [`ParamPool`].
///
/// Dropping the guard clears the buffer and returns it to the pool.
#[derive(Debug)]
pub struct PooledSpans<'a> {
    buf: Vec<ParamSpan>,
    pool: &'a ParamPool,
}

impl PooledSpans<'_> {
    pub fn push(&mut self, span: ParamSpan) {
        self.buf.push(span);
    }
}

impl Deref for PooledSpans<'_> {
    type Target = [ParamSpan];
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl Drop for PooledSpans<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

/// A single URL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Ordered parameters of a match.
///
/// The first URL parameter is the first element, so reading by index is safe.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    pattern: &'a CompiledPattern,
    path: &'a str,
    spans: &'a [ParamSpan],
}

impl<'a> Params<'a> {
    pub(crate) fn new(pattern: &'a CompiledPattern, path: &'a str, spans: &'a [ParamSpan]) -> Self {
        Self {
            pattern,
            path,
            spans,
        }
    }

    /// A view with no parameters.
    pub(crate) fn empty(pattern: &'a CompiledPattern, path: &'a str) -> Self {
        Self::new(pattern, path, &[])
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Param<'a>> {
        self.spans.get(index).map(|span| self.resolve(span))
    }

    pub fn iter(&self) -> impl Iterator<Item = Param<'a>> + '_ {
        self.spans.iter().map(|span| self.resolve(span))
    }

    /// Value of the first parameter named `name`.
    pub fn by_name(&self, name: &str) -> Option<&'a str> {
        self.iter().find(|p| p.key == name).map(|p| p.value)
    }

    /// Owned copy for handlers that outlive the match.
    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|p| (p.key.to_string(), p.value.to_string()))
            .collect()
    }

    fn resolve(&self, span: &ParamSpan) -> Param<'a> {
        Param {
            key: self.pattern.segments()[span.segment].text(),
            value: &self.path[span.start..span.end],
        }
    }
}
