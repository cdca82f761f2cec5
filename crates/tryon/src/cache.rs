use {
    crate::{Fingerprint, TryOnResult},
    std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::{Duration, Instant},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries pushed out by capacity.
    pub evictions: u64,
    /// Entries dropped because their TTL ran out.
    pub expirations: u64,
}

#[derive(Debug)]
struct Entry {
    result: Arc<TryOnResult>,
    inserted: Instant,
    last_used: u64,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<Fingerprint, Entry>,
    tick: u64,
    stats: CacheStats,
}

/// Bounded least-recently-used result cache with a time-to-live.
///
/// Lookups return the stored `Arc`, so a hit hands out the same result
/// object every time.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    ttl: Duration,
    state: Mutex<State>,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &Fingerprint) -> Option<Arc<TryOnResult>> {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.tick += 1;
        let tick = state.tick;
        let expired = match state.entries.get_mut(key) {
            Some(entry) if entry.inserted.elapsed() < self.ttl => {
                entry.last_used = tick;
                let result = Arc::clone(&entry.result);
                state.stats.hits += 1;
                return Some(result);
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            state.entries.remove(key);
            state.stats.expirations += 1;
        }
        state.stats.misses += 1;
        None
    }

    pub fn insert(&self, key: Fingerprint, result: Arc<TryOnResult>) {
        if self.capacity == 0 {
            return;
        }
        let mut guard = self.lock();
        let state = &mut *guard;
        state.tick += 1;
        let tick = state.tick;

        if !state.entries.contains_key(&key) {
            let ttl = self.ttl;
            let before = state.entries.len();
            state.entries.retain(|_, e| e.inserted.elapsed() < ttl);
            state.stats.expirations += (before - state.entries.len()) as u64;

            while state.entries.len() >= self.capacity {
                let oldest = state
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_used)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(k) => {
                        state.entries.remove(&k);
                        state.stats.evictions += 1;
                    }
                    None => break,
                }
            }
        }

        state.entries.insert(
            key,
            Entry {
                result,
                inserted: Instant::now(),
                last_used: tick,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}
