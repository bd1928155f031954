//! Location surface abstraction.
//!
//! The router treats the platform's location indicator and back/forward
//! mechanism as an opaque capability: it can read the current path, replace
//! it, and ask to go back, but it does not model history.

use std::sync::{Arc, Mutex};

/// The platform location surface the router navigates through.
pub trait LocationBus: Send + Sync {
    /// The current path string (e.g. `/campaigns/42`).
    fn current(&self) -> String;

    /// Replace the current path, pushing the old one onto history.
    fn replace(&self, path: &str);

    /// Go back one history entry, if any.
    fn back(&self);
}

/// In-process location bus backed by a history stack.
///
/// Used by the client shell and by tests; a browser-backed client would
/// supply its own implementation over the URL fragment.
#[derive(Clone, Default)]
pub struct MemoryLocation {
    inner: Arc<Mutex<MemoryLocationInner>>,
}

#[derive(Default)]
struct MemoryLocationInner {
    current: String,
    history: Vec<String>,
}

impl MemoryLocation {
    /// Create a bus positioned at the given initial path.
    pub fn starting_at(path: &str) -> Self {
        let bus = Self::default();
        bus.inner.lock().unwrap().current = path.to_string();
        bus
    }
}

impl LocationBus for MemoryLocation {
    fn current(&self) -> String {
        self.inner.lock().unwrap().current.clone()
    }

    fn replace(&self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        let old = std::mem::replace(&mut inner.current, path.to_string());
        if !old.is_empty() {
            inner.history.push(old);
        }
    }

    fn back(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(previous) = inner.history.pop() {
            inner.current = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_pushes_history_and_back_pops_it() {
        let bus = MemoryLocation::starting_at("/dashboard");
        bus.replace("/campaigns");
        assert_eq!(bus.current(), "/campaigns");
        bus.back();
        assert_eq!(bus.current(), "/dashboard");
    }

    #[test]
    fn back_on_empty_history_is_a_no_op() {
        let bus = MemoryLocation::starting_at("/dashboard");
        bus.back();
        assert_eq!(bus.current(), "/dashboard");
    }
}
