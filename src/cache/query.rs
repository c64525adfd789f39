use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Hierarchical cache key, e.g. `players/12` or `matches/division_id=3`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(root: &str) -> Self {
        Self(vec![root.to_string()])
    }

    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn players() -> Self {
        Self::new("players")
    }

    pub fn player(id: i64) -> Self {
        Self::players().with(id)
    }

    pub fn matches() -> Self {
        Self::new("matches")
    }

    pub fn games() -> Self {
        Self::new("games")
    }

    pub fn divisions() -> Self {
        Self::new("divisions")
    }

    pub fn division(id: i64) -> Self {
        Self::divisions().with(id)
    }

    pub fn sessions() -> Self {
        Self::new("sessions")
    }

    pub fn session(id: i64) -> Self {
        Self::sessions().with(id)
    }

    pub fn scores() -> Self {
        Self::new("scores")
    }

    pub fn messages() -> Self {
        Self::new("messages")
    }

    pub fn message(id: i64) -> Self {
        Self::messages().with(id)
    }

    pub fn me() -> Self {
        Self::new("auth").with("me")
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

struct Entry {
    stored_at: Instant,
    value: Value,
}

/// In-memory response cache with a fixed stale time.
///
/// Fresh entries are served without a request; stale ones are treated as
/// missing. Mutations invalidate whole key prefixes.
pub struct QueryCache {
    stale_time: Duration,
    entries: HashMap<QueryKey, Entry>,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            entries: HashMap::new(),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() >= self.stale_time {
            debug!("Cache stale: {}", key);
            return None;
        }
        // A value that no longer fits the requested type counts as a miss
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Stores `data` under `key`, first dropping every entry that went stale
    pub fn put<T: Serialize>(&mut self, key: QueryKey, data: &T) {
        self.evict_stale();
        match serde_json::to_value(data) {
            Ok(value) => {
                self.entries.insert(
                    key,
                    Entry {
                        stored_at: Instant::now(),
                        value,
                    },
                );
            }
            Err(e) => debug!("Not caching {}: {}", key, e),
        }
    }

    fn evict_stale(&mut self) {
        let stale_time = self.stale_time;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < stale_time);
        if self.entries.len() < before {
            debug!("Evicted {} stale entries", before - self.entries.len());
        }
    }

    /// Drops every entry under `prefix`
    pub fn invalidate(&mut self, prefix: &QueryKey) {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        debug!("Invalidated {} entries under {}", before - self.entries.len(), prefix);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
