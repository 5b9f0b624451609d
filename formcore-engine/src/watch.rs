//! The watch scheduler — a coalesced side channel for non-field observers.
//!
//! Mutations append deduplicated paths to a pending queue and schedule one
//! deferred flush on the async runtime. A generation counter identifies the
//! newest schedule; stale flushes are no-ops, so a burst of same-tick
//! mutations produces exactly one callback invocation per watcher.

use crate::FormEngine;
use formcore_types::{NamePath, WatchId};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A watch callback: `(values, all_values, changed_paths)`.
pub type WatchCallback = Arc<dyn Fn(&Value, &Value, &[NamePath]) + Send + Sync>;

#[derive(Default)]
pub(crate) struct WatchScheduler {
    watchers: Mutex<Vec<(WatchId, WatchCallback)>>,
    pending: Mutex<Vec<NamePath>>,
    generation: AtomicU64,
}

impl WatchScheduler {
    pub(crate) fn register(&self, callback: WatchCallback) -> WatchId {
        let id = WatchId::new();
        self.lock_watchers().push((id, callback));
        id
    }

    pub(crate) fn unregister(&self, id: WatchId) {
        self.lock_watchers().retain(|(watch_id, _)| *watch_id != id);
    }

    /// Queues `paths` (deduplicated by path equality) and schedules a
    /// flush. Outside a runtime the flush runs synchronously, since there
    /// is no tick to defer to.
    pub(crate) fn notify(&self, engine: &FormEngine, paths: Vec<NamePath>) {
        if self.lock_watchers().is_empty() {
            return;
        }

        let generation = {
            let mut pending = self.lock_pending();
            for path in paths {
                if !pending.contains(&path) {
                    pending.push(path);
                }
            }
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let engine = engine.clone();
                handle.spawn(async move {
                    engine.watch_scheduler().flush(&engine, generation);
                });
            }
            Err(_) => {
                debug!("no async runtime; flushing watchers synchronously");
                self.flush(engine, generation);
            }
        }
    }

    fn flush(&self, engine: &FormEngine, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            // superseded by a newer notify; that schedule will flush
            return;
        }

        let changed: Vec<NamePath> = std::mem::take(&mut *self.lock_pending());
        let watchers: Vec<WatchCallback> = self
            .lock_watchers()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        let values = engine.get_fields_value(None, None);
        let all_values = engine.get_fields_value_all();
        for callback in watchers {
            callback(&values, &all_values, &changed);
        }
    }

    fn lock_watchers(&self) -> std::sync::MutexGuard<'_, Vec<(WatchId, WatchCallback)>> {
        self.watchers.lock().expect("watch list lock poisoned")
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Vec<NamePath>> {
        self.pending.lock().expect("watch queue lock poisoned")
    }
}
