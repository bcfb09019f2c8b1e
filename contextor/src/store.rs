//! Single-slot holder for the resident policy text.

use std::sync::{Arc, PoisonError, RwLock};

/// Process-wide context, shared by handle.
///
/// Starts empty. Writers swap a whole `Arc<str>`; readers clone the current
/// `Arc` and keep it for the rest of their request, so a reload never exposes
/// a partial document and never invalidates text already handed out. The lock
/// is held only for the clone or the swap.
#[derive(Debug)]
pub struct ContextStore {
    slot: RwLock<Arc<str>>,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl ContextStore {
    /// Store holding the empty sentinel (no document available).
    pub fn empty() -> Self {
        Self::with_text("")
    }

    pub fn with_text(text: impl Into<Arc<str>>) -> Self {
        Self {
            slot: RwLock::new(text.into()),
        }
    }

    /// The current text. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<str> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Atomically replaces the text and returns the previous one.
    pub fn replace(&self, text: impl Into<Arc<str>>) -> Arc<str> {
        let next = text.into();
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// True when a non-empty document is resident.
    pub fn is_loaded(&self) -> bool {
        !self.snapshot().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = ContextStore::default();
        assert!(!store.is_loaded());
        assert_eq!(&*store.snapshot(), "");
    }

    #[test]
    fn replace_swaps_without_touching_old_snapshots() {
        let store = ContextStore::with_text("v1 policy");
        let before = store.snapshot();

        let previous = store.replace("v2 policy ✓");
        assert_eq!(&*previous, "v1 policy");
        assert_eq!(&*before, "v1 policy");
        assert_eq!(&*store.snapshot(), "v2 policy ✓");
        assert_eq!(store.snapshot().chars().count(), 11);
    }

    #[test]
    fn concurrent_readers_see_whole_documents() {
        let store = Arc::new(ContextStore::with_text("a".repeat(1_000)));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let s = store.snapshot();
                        let whole_v1 = s.len() == 1_000 && s.bytes().all(|b| b == b'a');
                        let whole_v2 = s.len() == 2_000 && s.bytes().all(|b| b == b'b');
                        assert!(whole_v1 || whole_v2);
                    }
                })
            })
            .collect();

        store.replace("b".repeat(2_000));
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(store.snapshot().len(), 2_000);
    }
}
