use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

/// Live interactive displays, keyed by the id of the command interaction that
/// created them.
///
/// Each entry sits behind its own mutex so presses on one display are handled
/// one at a time while other displays proceed. Entries idle for longer than
/// `ttl` are dropped the next time the registry is touched.
pub struct WidgetRegistry<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<T>>>,
}

struct Entry<T> {
    value: Arc<Mutex<T>>,
    last_used: Instant,
}

impl<T> WidgetRegistry<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&self, id: String, value: T) -> Arc<Mutex<T>> {
        self.insert_at(id, value, Instant::now())
    }

    /// Looks up a live entry and marks it used.
    pub fn get(&self, id: &str) -> Option<Arc<Mutex<T>>> {
        self.get_at(id, Instant::now())
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub(crate) fn insert_at(&self, id: String, value: T, now: Instant) -> Arc<Mutex<T>> {
        let value = Arc::new(Mutex::new(value));
        let mut entries = lock(&self.entries);
        self.prune(&mut entries, now);
        entries.insert(
            id,
            Entry {
                value: Arc::clone(&value),
                last_used: now,
            },
        );
        value
    }

    pub(crate) fn get_at(&self, id: &str, now: Instant) -> Option<Arc<Mutex<T>>> {
        let mut entries = lock(&self.entries);
        self.prune(&mut entries, now);
        let e = entries.get_mut(id)?;
        e.last_used = now;
        Some(Arc::clone(&e.value))
    }

    fn prune(&self, entries: &mut HashMap<String, Entry<T>>, now: Instant) {
        let before = entries.len();
        entries.retain(|_, e| now.saturating_duration_since(e.last_used) < self.ttl);
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(dropped, live = entries.len(), "expired widgets");
        }
    }
}

/// Locks `m`, taking the guard back if a previous holder panicked.
pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::{WidgetRegistry, lock};

    #[test]
    fn entries_are_isolated() {
        let reg = WidgetRegistry::new(Duration::from_secs(180));
        let a = reg.insert("a".to_string(), 1u32);
        reg.insert("b".to_string(), 2u32);

        *lock(&a) = 10;
        assert_eq!(*lock(&reg.get("a").unwrap()), 10);
        assert_eq!(*lock(&reg.get("b").unwrap()), 2);
        assert!(reg.get("c").is_none());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn get_returns_the_same_instance() {
        let reg = WidgetRegistry::new(Duration::from_secs(180));
        let a = reg.insert("a".to_string(), ());
        assert!(Arc::ptr_eq(&a, &reg.get("a").unwrap()));
    }

    #[test]
    fn idle_entries_expire_and_use_refreshes() {
        let ttl = Duration::from_secs(180);
        let reg = WidgetRegistry::new(ttl);
        let t0 = Instant::now();
        reg.insert_at("a".to_string(), (), t0);
        reg.insert_at("b".to_string(), (), t0);

        // Touch "a" just before it would expire.
        assert!(reg.get_at("a", t0 + Duration::from_secs(170)).is_some());

        let later = t0 + Duration::from_secs(200);
        assert!(reg.get_at("b", later).is_none());
        assert!(reg.get_at("a", later).is_some());
        assert_eq!(reg.len(), 1);

        assert!(reg.get_at("a", later + ttl).is_none());
        assert_eq!(reg.len(), 0);
    }
}
