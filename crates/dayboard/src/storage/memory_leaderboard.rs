use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::error::LeaderboardError;
use crate::leaderboard_storage::{LeaderboardStorage, PartitionWrite, SubmitOutcome};
use crate::ranking::ScoreMarker;

/// In-memory leaderboard storage.
///
/// Mirrors a key-value store with sorted-set and hash structures and
/// per-key absolute expiry. Reads drop the key they touch once it has
/// expired; every `atomic_submit` sweeps all expired keys, so past
/// partitions do not accumulate. Each `atomic_submit` runs inside a single
/// lock acquisition.
pub struct MemoryLeaderboardStorage {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
    available: AtomicBool,
    reject_writes: AtomicBool,
}

#[derive(Default)]
struct Inner {
    scores: HashMap<String, Expiring<HashMap<String, ScoreMarker>>>,
    results: HashMap<String, Expiring<HashMap<String, String>>>,
}

struct Expiring<T> {
    value: T,
    expire_at_secs: Option<i64>,
}

impl<T: Default> Default for Expiring<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            expire_at_secs: None,
        }
    }
}

impl<T> Expiring<T> {
    fn is_expired(&self, now_secs: i64) -> bool {
        self.expire_at_secs.is_some_and(|at| now_secs >= at)
    }
}

fn drop_if_expired<T>(map: &mut HashMap<String, Expiring<T>>, key: &str, now_secs: i64) {
    if map.get(key).is_some_and(|e| e.is_expired(now_secs)) {
        map.remove(key);
    }
}

impl MemoryLeaderboardStorage {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a storage that evaluates expiry against `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
            available: AtomicBool::new(true),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Simulate the store becoming unreachable (`false`) or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every `atomic_submit` fail with a persistence error.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Overwrite one stored record verbatim, bypassing the ranking
    /// structure. Used to simulate corrupted data.
    pub fn put_raw_record(&self, results_key: &str, submitter_id: &str, record: &str) {
        let mut inner = self.inner.lock();
        inner
            .results
            .entry(results_key.to_string())
            .or_default()
            .value
            .insert(submitter_id.to_string(), record.to_string());
    }

    /// Submitter ids present in a ranking structure, best-ranked first.
    pub fn ranked_members(&self, scores_key: &str) -> Vec<String> {
        let now = self.now_secs();
        let mut inner = self.inner.lock();
        drop_if_expired(&mut inner.scores, scores_key, now);
        inner
            .scores
            .get(scores_key)
            .map(|set| ranked(&set.value).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Expiry of a key in epoch seconds, if the key exists.
    pub fn expire_at(&self, key: &str) -> Option<i64> {
        let inner = self.inner.lock();
        inner
            .scores
            .get(key)
            .and_then(|e| e.expire_at_secs)
            .or_else(|| inner.results.get(key).and_then(|e| e.expire_at_secs))
    }

    /// Number of live keys across both structure kinds.
    pub fn key_count(&self) -> usize {
        let now = self.now_secs();
        let inner = self.inner.lock();
        let live_scores = inner.scores.values().filter(|e| !e.is_expired(now)).count();
        let live_results = inner.results.values().filter(|e| !e.is_expired(now)).count();
        live_scores + live_results
    }

    /// Number of keys held, expired or not.
    pub fn raw_key_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.scores.len() + inner.results.len()
    }

    fn now_secs(&self) -> i64 {
        self.clock.now_millis().div_euclid(1000)
    }

    fn check_available(&self) -> Result<(), LeaderboardError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(LeaderboardError::StoreUnavailable {
                reason: "memory store marked unavailable".to_string(),
                source: None,
            })
        }
    }
}

impl Default for MemoryLeaderboardStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Members best-ranked first; full ties fall back to submitter id.
fn ranked(set: &HashMap<String, ScoreMarker>) -> Vec<&String> {
    let mut members: Vec<(&String, &ScoreMarker)> = set.iter().collect();
    members.sort_by(|a, b| a.1.rank_cmp(b.1).then_with(|| a.0.cmp(b.0)));
    members.into_iter().map(|(id, _)| id).collect()
}

#[async_trait]
impl LeaderboardStorage for MemoryLeaderboardStorage {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn atomic_submit(
        &self,
        write: &PartitionWrite,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        self.check_available()?;
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(LeaderboardError::Persistence {
                reason: "memory store rejected the write".to_string(),
                source: None,
            });
        }

        let now = self.now_secs();
        let mut guard = self.inner.lock();
        let Inner { scores, results } = &mut *guard;

        scores.retain(|_, e| !e.is_expired(now));
        results.retain(|_, e| !e.is_expired(now));

        let score_set = scores.entry(write.scores_key.clone()).or_default();
        let result_map = results.entry(write.results_key.clone()).or_default();

        score_set
            .value
            .insert(write.submitter_id.clone(), write.marker);
        result_map
            .value
            .insert(write.submitter_id.clone(), write.record.clone());

        let mut evicted = 0;
        if score_set.value.len() > write.max_results {
            let losers: Vec<String> = ranked(&score_set.value)
                .into_iter()
                .skip(write.max_results)
                .cloned()
                .collect();
            for id in &losers {
                score_set.value.remove(id);
                result_map.value.remove(id);
            }
            evicted = losers.len();
        }

        score_set.expire_at_secs = Some(write.expire_at_secs);
        result_map.expire_at_secs = Some(write.expire_at_secs);

        Ok(SubmitOutcome {
            retained: score_set.value.len(),
            evicted,
        })
    }

    async fn read_all_results(
        &self,
        results_key: &str,
    ) -> Result<BTreeMap<String, String>, LeaderboardError> {
        self.check_available()?;
        let now = self.now_secs();
        let mut inner = self.inner.lock();
        drop_if_expired(&mut inner.results, results_key, now);
        Ok(inner
            .results
            .get(results_key)
            .map(|e| {
                e.value
                    .iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
