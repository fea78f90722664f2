//! Length-bucketed guess cache.
//!
//! # Responsibilities
//! - Keep, per exact path length, the guesses learned from brute-force hits
//! - Probe a request against each guess at its discriminating offsets
//! - Learn: mask the winning path, append a guess, rebuild every check set
//!
//! # Design Decisions
//! - Buckets are copy-on-write snapshots behind `ArcSwap`; readers never
//!   observe a half-rebuilt bucket
//! - Writers to the same bucket are serialized by a per-bucket mutex
//! - A probe is only a pre-filter; every hit is confirmed by the exact matcher
//! - The cache only grows (no eviction)

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::observability::metrics;
use crate::routing::matcher::slash_offsets;
use crate::routing::pattern::{CompiledPattern, PARAM_MARKER, SEPARATOR};

/// A learned fingerprint for one endpoint at one path length.
#[derive(Debug, Clone)]
pub struct Guess {
    endpoint: usize,
    check_set: Vec<usize>,
    instance: Arc<[u8]>,
}

impl Guess {
    fn new(endpoint: usize, instance: Vec<u8>) -> Self {
        Self {
            endpoint,
            check_set: Vec::new(),
            instance: instance.into(),
        }
    }

    pub fn endpoint(&self) -> usize {
        self.endpoint
    }

    /// Offsets that distinguish this guess from its bucket siblings.
    pub fn check_set(&self) -> &[usize] {
        &self.check_set
    }

    /// The masked template.
    pub fn instance(&self) -> &[u8] {
        &self.instance
    }

    /// Compare `path` to the template at the check set offsets only.
    ///
    /// Segment layout is left to the confirming match, so one guess serves
    /// every layout of its length. `path` must have the bucket's length.
    pub fn probe(&self, path: &[u8]) -> bool {
        self.check_set.iter().all(|&i| path[i] == self.instance[i])
    }
}

/// Mask the first byte of every non-empty parameter value with the marker.
///
/// `slashes` must be the separator offsets of `path`, and `path` must have
/// matched `pattern`.
pub fn mask(pattern: &CompiledPattern, slashes: &[usize], path: &str) -> Vec<u8> {
    let mut instance = path.as_bytes().to_vec();
    for (i, segment) in pattern.segments().iter().enumerate() {
        if !segment.is_param() {
            continue;
        }
        let start = slashes[i] + 1;
        let end = slashes.get(i + 1).copied().unwrap_or(instance.len());
        if start < end {
            instance[start] = PARAM_MARKER;
        }
    }
    instance
}

/// First offset where `x` and `y` differ, skipping parameter runs of `x`.
///
/// A run starts at a marker byte and ends before the next separator.
pub fn first_difference(x: &[u8], y: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < x.len() {
        if x[i] == PARAM_MARKER {
            while i < x.len() && x[i] != SEPARATOR {
                i += 1;
            }
        }
        if i < x.len() && y.get(i) != Some(&x[i]) {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Recompute each guess's check set against the whole bucket.
pub fn rebuild_check_sets(guesses: &mut [Guess]) {
    let sets: Vec<Vec<usize>> = guesses
        .iter()
        .map(|x| {
            guesses
                .iter()
                .filter_map(|y| first_difference(&x.instance, &y.instance))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
        .collect();

    for (guess, set) in guesses.iter_mut().zip(sets) {
        guess.check_set = set;
    }
}

#[derive(Debug)]
struct Bucket {
    guesses: ArcSwap<Vec<Guess>>,
    writer: Mutex<()>,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            guesses: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
        }
    }
}

/// Diagnostic view of one guess.
#[derive(Debug, Clone, Serialize)]
pub struct GuessSnapshot {
    pub endpoint_idx: usize,
    pub pattern: String,
    pub check_set: Vec<usize>,
    pub instance: String,
}

/// Diagnostic view of one non-empty bucket.
#[derive(Debug, Clone, Serialize)]
pub struct BucketSnapshot {
    pub length: usize,
    pub guesses: Vec<GuessSnapshot>,
}

/// Path length -> learned guesses.
#[derive(Debug)]
pub struct GuessCache {
    buckets: Vec<Bucket>,
    total: AtomicUsize,
}

impl GuessCache {
    /// Paths of `max_len` bytes or more never use the cache.
    pub fn new(max_len: usize) -> Self {
        Self {
            buckets: (0..max_len).map(|_| Bucket::default()).collect(),
            total: AtomicUsize::new(0),
        }
    }

    pub fn max_len(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of learned guesses.
    pub fn len(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buckets holding at least one guess.
    pub fn bucket_count(&self) -> usize {
        self.buckets
            .iter()
            .filter(|b| !b.guesses.load().is_empty())
            .count()
    }

    /// Try the guesses for `path`'s length in insertion order.
    ///
    /// `confirm` runs the exact matcher for a guess's endpoint against the
    /// request's separator offsets; a `None` from it is a false-positive
    /// probe and the scan continues.
    pub fn lookup<T, F>(&self, path: &str, mut confirm: F) -> Option<T>
    where
        F: FnMut(usize, &[usize]) -> Option<T>,
    {
        let bucket = self.buckets.get(path.len())?;
        let guesses = bucket.guesses.load();
        if guesses.is_empty() {
            return None;
        }

        let bytes = path.as_bytes();
        let mut slashes: Option<Vec<usize>> = None;
        for guess in guesses.iter() {
            if !guess.probe(bytes) {
                continue;
            }
            let slashes = slashes.get_or_insert_with(|| slash_offsets(path));
            match confirm(guess.endpoint, slashes) {
                Some(found) => return Some(found),
                None => metrics::record_false_probe(),
            }
        }
        None
    }

    /// Learn from a brute-force hit of `endpoint` on `path`, split at
    /// `slashes`.
    ///
    /// Returns false when the length is out of range or an identical guess
    /// already exists.
    pub fn learn(
        &self,
        endpoint: usize,
        pattern: &CompiledPattern,
        path: &str,
        slashes: &[usize],
    ) -> bool {
        let Some(bucket) = self.buckets.get(path.len()) else {
            return false;
        };
        let instance = mask(pattern, slashes, path);

        let _writer = bucket.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = bucket.guesses.load_full();
        if current
            .iter()
            .any(|g| g.endpoint == endpoint && *g.instance == *instance)
        {
            return false;
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(Guess::new(endpoint, instance));
        rebuild_check_sets(&mut next);
        let bucket_size = next.len();
        bucket.guesses.store(Arc::new(next));

        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        metrics::record_guess_learned(total);
        tracing::debug!(
            length = path.len(),
            endpoint,
            bucket_size,
            "Learned fast-path guess"
        );
        true
    }

    /// Copy out every non-empty bucket. `pattern_of` names an endpoint.
    pub fn snapshot<F>(&self, pattern_of: F) -> Vec<BucketSnapshot>
    where
        F: Fn(usize) -> String,
    {
        self.buckets
            .iter()
            .enumerate()
            .filter_map(|(length, bucket)| {
                let guesses = bucket.guesses.load();
                if guesses.is_empty() {
                    return None;
                }
                Some(BucketSnapshot {
                    length,
                    guesses: guesses
                        .iter()
                        .map(|g| GuessSnapshot {
                            endpoint_idx: g.endpoint(),
                            pattern: pattern_of(g.endpoint()),
                            check_set: g.check_set().to_vec(),
                            instance: String::from_utf8_lossy(g.instance()).into_owned(),
                        })
                        .collect(),
                })
            })
            .collect()
    }
}
