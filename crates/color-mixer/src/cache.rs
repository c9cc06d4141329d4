//! Memoising wrapper for repeated ramp queries.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::ramp::{Ramp, RampRequest, RampService};
use crate::Result;

/// Remembers the most recently used ramps of an inner service.
///
/// Keys are whole [`RampRequest`]s, so two queries share an entry only when
/// endpoints, clamped step count, algorithm and schedule all match. Failed
/// queries are not remembered.
pub struct CachedRampQuery<S> {
    inner: S,
    cache: Mutex<LruCache<RampRequest, Ramp>>,
}

impl<S: RampService> CachedRampQuery<S> {
    pub fn new(inner: S, capacity: NonZeroUsize) -> Self {
        CachedRampQuery {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached ramps.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: RampService> RampService for CachedRampQuery<S> {
    fn query(&self, request: &RampRequest) -> Result<Ramp> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(ramp) = cache.get(request) {
                return Ok(ramp.clone());
            }
        }

        // The lock is not held while computing; two threads missing on the
        // same key both compute it and the later put wins.
        let ramp = self.inner.query(request)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(*request, ramp.clone());
        }

        Ok(ramp)
    }
}

impl<S: fmt::Debug> fmt::Debug for CachedRampQuery<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (len, cap) = match self.cache.lock() {
            Ok(cache) => (cache.len(), cache.cap().get()),
            Err(_) => (0, 0),
        };

        f.debug_struct("CachedRampQuery")
            .field("inner", &self.inner)
            .field("len", &len)
            .field("capacity", &cap)
            .finish()
    }
}
