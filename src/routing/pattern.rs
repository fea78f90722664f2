//! Route pattern compilation.
//!
//! # Responsibilities
//! - Split a pattern on `/` into ordered segments
//! - Flag segments starting with [`PARAM_MARKER`] as named parameters
//! - Count parameters (sizes the parameter pool)
//!
//! # Design Decisions
//! - Any string is accepted; malformed patterns degrade to literal text
//! - Text before the first `/` belongs to no segment
//! - A trailing `/` yields a trailing empty literal segment

/// Byte that introduces a named parameter segment (`/users/:id`).
pub const PARAM_MARKER: u8 = b':';

/// Path separator.
pub const SEPARATOR: u8 = b'/';

/// A single compiled segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment byte-for-byte.
    Literal(String),
    /// Captures the request segment under this name (marker stripped).
    Param(String),
}

impl Segment {
    /// Literal text or parameter name.
    pub fn text(&self) -> &str {
        match self {
            Segment::Literal(s) | Segment::Param(s) => s,
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Segment::Param(_))
    }
}

/// The compiled form of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    segments: Vec<Segment>,
    param_count: usize,
}

impl CompiledPattern {
    /// Compile a pattern such as `/repos/:owner/:repo/events`.
    pub fn compile(pattern: &str) -> Self {
        let bytes = pattern.as_bytes();
        let mut bounds: Vec<usize> = bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == SEPARATOR)
            .map(|(i, _)| i)
            .collect();
        bounds.push(bytes.len());

        let mut segments = Vec::with_capacity(bounds.len().saturating_sub(1));
        let mut param_count = 0;
        for window in bounds.windows(2) {
            let part = &pattern[window[0] + 1..window[1]];
            match part.as_bytes().first() {
                Some(&PARAM_MARKER) => {
                    segments.push(Segment::Param(part[1..].to_string()));
                    param_count += 1;
                }
                _ => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Self {
            segments,
            param_count,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// Parameter names in left-to-right order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.is_param())
            .map(Segment::text)
    }
}
