//! Per-instance rate limiting
//!
//! Resolvers backed by external services must space out their calls. The
//! limiter belongs to one resolver instance, so separate Sets and separate
//! test runs never share timing state.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use medialink_meta::Metadata;
use serde_json::Value;

use crate::error::Result;
use crate::resolver::Resolver;

/// Enforces a minimum interval between successive acquisitions.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until at least `interval` has passed since the previous call.
    pub fn acquire(&self) {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

/// A resolver whose calls pass through its own [`RateLimiter`].
pub struct Throttled {
    inner: Arc<dyn Resolver>,
    limiter: RateLimiter,
}

impl Throttled {
    pub fn new(inner: Arc<dyn Resolver>, interval: Duration) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(interval),
        }
    }
}

impl Resolver for Throttled {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn get_metadata(&self, item: &Metadata, options: &Value) -> Result<Option<Metadata>> {
        self.limiter.acquire();
        self.inner.get_metadata(item, options)
    }
}
