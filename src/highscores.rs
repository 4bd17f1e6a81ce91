//! Best-score tracking
//!
//! One scalar, read once at startup and written only when beaten.

use crate::persistence::KeyValueStore;

/// Persisted best score
#[derive(Debug)]
pub struct HighScore<S: KeyValueStore> {
    store: S,
    key: String,
    best: u64,
}

impl<S: KeyValueStore> HighScore<S> {
    /// Read the stored best score (absent or unreadable counts as 0)
    pub fn load(store: S, key: &str) -> Self {
        let best = match store.get(key) {
            Ok(Some(raw)) => parse_score(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring malformed high score {:?} under '{}'", raw, key);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("High score unavailable, starting from 0: {}", e);
                0
            }
        };
        log::info!("High score: {}", best);
        Self {
            store,
            key: key.to_string(),
            best,
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score would replace the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Fold a finished session's score in. Returns true (and persists) on a
    /// new best; the in-memory value is updated even if the write fails.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        match self.store.set(&self.key, &score.to_string()) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("New high score {} not saved: {}", score, e),
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Accepts integers and the floored floats older saves wrote
fn parse_score(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.floor() as u64)
    })
}
