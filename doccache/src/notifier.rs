//! Post-mutation change notification.
//!
//! The cache owns a private [`Notifier`] and delegates subscription to it
//! (composition, not inheritance). Dispatch is synchronous, on the
//! mutator's own call stack, in listener registration order. A listener
//! failure is logged and dropped so one misbehaving observer can never
//! block the remaining listeners or corrupt the mutation round.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Error type listeners may report; logged by the notifier, never
/// propagated to the mutator's caller.
pub type ListenerError = Box<dyn Error + Send + Sync + 'static>;

/// Return type of a cache listener.
pub type ListenerResult = Result<(), ListenerError>;

type Listener<D> = Box<dyn FnMut(&CacheEvent<D>) -> ListenerResult>;

/// Event type discriminator, used to pick which events a listener sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Added,
    Updated,
    Removed,
    BulkReplaced,
    Changed,
}

/// A post-mutation notification.
///
/// Domain events carry the affected document(s); the generic [`Changed`]
/// event fires exactly once per mutation round, after the domain event.
/// Listeners always observe post-mutation store state.
///
/// [`Changed`]: CacheEvent::Changed
pub enum CacheEvent<D> {
    /// A document was inserted under a key not previously present.
    Added(Arc<D>),
    /// A document replaced an existing entry with the same key.
    Updated(Arc<D>),
    /// A document was removed; carries the removed entry.
    Removed(Arc<D>),
    /// A batch import or clear replaced content; carries the batch's
    /// (canonical key, document) pairs, empty for a clear.
    BulkReplaced(Vec<(String, Arc<D>)>),
    /// Generic end-of-round notification.
    Changed,
}

impl<D> CacheEvent<D> {
    /// The discriminator for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Added(_) => EventKind::Added,
            Self::Updated(_) => EventKind::Updated,
            Self::Removed(_) => EventKind::Removed,
            Self::BulkReplaced(_) => EventKind::BulkReplaced,
            Self::Changed => EventKind::Changed,
        }
    }
}

impl<D> Clone for CacheEvent<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Added(doc) => Self::Added(Arc::clone(doc)),
            Self::Updated(doc) => Self::Updated(Arc::clone(doc)),
            Self::Removed(doc) => Self::Removed(Arc::clone(doc)),
            Self::BulkReplaced(entries) => Self::BulkReplaced(entries.clone()),
            Self::Changed => Self::Changed,
        }
    }
}

impl<D> fmt::Debug for CacheEvent<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BulkReplaced(entries) => f
                .debug_struct("BulkReplaced")
                .field("entries", &entries.len())
                .finish(),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Slot<D> {
    id: SubscriptionId,
    kind: EventKind,
    listener: Listener<D>,
}

/// Ordered listener registry with per-kind filtering.
pub(crate) struct Notifier<D> {
    slots: Vec<Slot<D>>,
    next_id: u64,
}

impl<D> Notifier<D> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&CacheEvent<D>) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            kind,
            listener: Box::new(listener),
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    /// Deliver an event to every listener registered for its kind, in
    /// registration order. Listener failures are logged and isolated.
    pub(crate) fn emit(&mut self, cache: &str, event: &CacheEvent<D>) {
        let kind = event.kind();
        for slot in self.slots.iter_mut().filter(|slot| slot.kind == kind) {
            if let Err(error) = (slot.listener)(event) {
                tracing::warn!(
                    cache,
                    listener = slot.id.0,
                    error = %error,
                    "cache listener failed"
                );
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
