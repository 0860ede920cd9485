//! Single-slot effect delivery.

use std::sync::Mutex;

use tokio::sync::Notify;
use tracing::debug;

/// One-shot side channel with room for a single pending effect.
///
/// Emitting never blocks: a new effect replaces an unconsumed one
/// (drop-oldest). Each effect is handed out at most once and nothing is
/// replayed to later consumers.
pub struct EffectQueue<E> {
    slot: Mutex<Option<E>>,
    notify: Notify,
}

impl<E: std::fmt::Debug> EffectQueue<E> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Buffer `effect`, returning the pending one it displaced.
    pub fn emit(&self, effect: E) -> Option<E> {
        let dropped = self.lock().replace(effect);
        if let Some(ref old) = dropped {
            debug!("Dropped unconsumed effect {:?}", old);
        }
        self.notify.notify_one();
        dropped
    }

    pub fn try_next(&self) -> Option<E> {
        self.lock().take()
    }

    /// Wait for the next effect.
    pub async fn next(&self) -> E {
        loop {
            if let Some(effect) = self.try_next() {
                return effect;
            }
            self.notify.notified().await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<E>> {
        // The slot holds plain data; a panic elsewhere cannot leave it torn.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<E: std::fmt::Debug> Default for EffectQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
