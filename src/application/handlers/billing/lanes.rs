//! Per-customer serialization lanes.
//!
//! Events for one customer must apply strictly in sequence while
//! different customers proceed in parallel, so each customer key owns an
//! async mutex. Acquisition is bounded: a handler that cannot enter its
//! lane in time gives up and lets the provider redeliver rather than
//! blocking a worker indefinitely.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

/// Lane acquisition timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneTimeout;

/// Keyed mutex set, one lane per customer identity.
///
/// Lanes are created on first use and kept for the life of the process;
/// the per-entry cost is one Arc'd mutex, negligible next to the
/// membership records themselves.
#[derive(Debug)]
pub struct CustomerLanes {
    max_wait: Duration,
    lanes: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CustomerLanes {
    /// Creates lanes with the given bounded acquisition wait.
    pub fn new(max_wait: Duration) -> Self {
        Self {
            max_wait,
            lanes: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires the lane for `key`, waiting at most the configured bound.
    ///
    /// The returned guard holds the lane until dropped; processing for
    /// the same key serializes behind it while other keys are untouched.
    pub async fn acquire(&self, key: &str) -> Result<OwnedMutexGuard<()>, LaneTimeout> {
        let lane = {
            let mut lanes = self.lanes.lock().await;
            Arc::clone(
                lanes
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        timeout(self.max_wait, lane.lock_owned())
            .await
            .map_err(|_| LaneTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn same_key_serializes() {
        let lanes = Arc::new(CustomerLanes::new(Duration::from_secs(5)));
        let running = Arc::new(AtomicU32::new(0));
        let max_seen = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let lanes = Arc::clone(&lanes);
            let running = Arc::clone(&running);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _guard = lanes.acquire("cus_1").await.unwrap();
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_keys_run_concurrently() {
        let lanes = CustomerLanes::new(Duration::from_millis(50));

        let _first = lanes.acquire("cus_a").await.unwrap();
        // A held lane on another key must not block this one.
        assert!(lanes.acquire("cus_b").await.is_ok());
    }

    #[tokio::test]
    async fn held_lane_times_out_second_caller() {
        let lanes = CustomerLanes::new(Duration::from_millis(20));

        let _held = lanes.acquire("cus_a").await.unwrap();
        let result = lanes.acquire("cus_a").await;
        assert_eq!(result.unwrap_err(), LaneTimeout);
    }

    #[tokio::test]
    async fn lane_frees_on_guard_drop() {
        let lanes = CustomerLanes::new(Duration::from_millis(20));

        {
            let _held = lanes.acquire("cus_a").await.unwrap();
        }
        assert!(lanes.acquire("cus_a").await.is_ok());
    }
}
