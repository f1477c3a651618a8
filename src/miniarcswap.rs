use std::sync::{Mutex, Arc};

/// Stores an Arc<T>, hands it out to any number of readers for any
/// length of time, and allows the Arc<T> to be replaced at any
/// time. Reminiscent of the `arc_swap` crate, but with a Mutex held
/// only for the duration of an Arc clone or store.
#[derive(Debug, Default)]
pub struct MiniArcSwap<T> {
    payload: Mutex<Arc<T>>
}

impl<T> MiniArcSwap<T> {
    pub fn new(payload: Arc<T>) -> MiniArcSwap<T> {
        MiniArcSwap { payload: Mutex::new(payload) }
    }

    /// Get the payload. Use it however long you want.
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&(*self.payload.lock().expect("never poisoned")))
    }

    /// Set the payload. Readers holding the old one keep it.
    pub fn set(&self, val: Arc<T>) {
        *self.payload.lock().expect("never poisoned") = val;
    }

    /// Replace the payload with a modified copy of it. Concurrent
    /// updates are serialized; none is lost.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let mut payload = self.payload.lock().expect("never poisoned");
        let new = f(&payload);
        *payload = Arc::new(new);
    }
}
