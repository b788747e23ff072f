use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use smol_str::SmolStr;

use crate::event_log::SecurityLog;

struct Shared {
    table: scc::HashMap<SmolStr, Vec<Instant>>,
    log: SecurityLog,
}

/// Sliding-window rate limiter keyed by arbitrary action strings, one
/// independent window per key. Not persisted; resets with the process.
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct RateLimitTable {
    shared: Arc<Shared>,
}

impl RateLimitTable {
    pub fn new(log: SecurityLog) -> RateLimitTable {
        RateLimitTable {
            shared: Arc::new(Shared {
                table: scc::HashMap::new(),
                log,
            }),
        }
    }

    /// Checks whether another attempt under `key` is allowed right now and
    /// records it if so. A rejected attempt is NOT recorded, and trips a
    /// security event.
    pub async fn req(&self, key: &str, max_requests: usize, window: Duration) -> bool {
        self.req_at(key, max_requests, window, Instant::now()).await
    }

    pub async fn req_at(&self, key: &str, max_requests: usize, window: Duration, now: Instant) -> bool {
        let mut entry = self.shared.table.entry_async(SmolStr::new(key)).await.or_default();
        let hits = entry.get_mut();

        // a hit exactly one window old has left the window
        hits.retain(|&hit| now.duration_since(hit) < window);

        if hits.len() >= max_requests {
            self.shared.log.security_event(
                "Rate limit exceeded",
                Some(json!({ "key": key, "requests": hits.len() })),
            );

            return false;
        }

        hits.push(now);

        true
    }

    /// Drops keys whose newest attempt is older than `horizon`. Per-window
    /// correctness comes from the pruning in [`req_at`]; this only bounds
    /// memory for keys that went quiet.
    pub async fn cleanup_at(&self, now: Instant, horizon: Duration) {
        log::trace!("Cleaning old rate-limit entries");

        self.shared
            .table
            .retain_async(|_, hits| matches!(hits.last(), Some(&newest) if now.duration_since(newest) < horizon))
            .await;
    }

    pub fn len(&self) -> usize {
        self.shared.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.table.is_empty()
    }
}
