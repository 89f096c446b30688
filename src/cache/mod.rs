//! TTL key/value cache sitting in front of the upstream providers.
//!
//! Values are opaque serialized bytes; callers never mutate an entry in place,
//! they replace it with `set` (last write wins). Expired entries are invisible to
//! readers and are physically dropped by a periodic sweep.

pub mod ttl;

pub use ttl::{ttl_for, Environment};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> bool;

    /// Live keys matching a glob pattern (`*` any run, `?` one character).
    /// Used by write-side collaborators for bulk invalidation.
    async fn keys_matching(&self, pattern: &str) -> Vec<String>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe, in-process cache.
#[derive(Clone, Default)]
pub struct MemoryCache {
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries; returns how many were removed.
    pub async fn clear_expired(&self) -> usize {
        let mut map = self.inner.write().await;
        let before = map.len();
        let now = Instant::now();
        map.retain(|_, entry| entry.is_live(now));
        before - map.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Spawn the background sweep.
    pub fn start_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let removed = cache.clear_expired().await;
                if removed > 0 {
                    debug!("Cache sweep dropped {} expired entries", removed);
                }
            }
        })
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let map = self.inner.read().await;
        map.get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.inner.write().await.insert(key.to_string(), entry);
    }

    async fn delete(&self, key: &str) -> bool {
        let removed = self.inner.write().await.remove(key);
        removed.is_some_and(|entry| entry.is_live(Instant::now()))
    }

    async fn keys_matching(&self, pattern: &str) -> Vec<String> {
        let map = self.inner.read().await;
        let now = Instant::now();
        let mut keys: Vec<String> = map
            .iter()
            .filter(|(key, entry)| entry.is_live(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

/// Iterative glob matcher with single-star backtracking.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((star_pi, star_ti)) = star {
            pi = star_pi + 1;
            ti = star_ti + 1;
            star = Some((star_pi, star_ti + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}
