//! The identity-keyed document cache.
//!
//! One `DocumentCache` instance has exactly one owner; all mutation and
//! read operations are synchronous and complete before returning. The
//! cache performs no internal locking. Mutations go through the documented
//! operations only, and every externally visible mutation round delivers
//! its domain event followed by exactly one `Changed` event, after the
//! store is fully mutated.

use std::collections::HashMap;
use std::sync::Arc;

use doccache_core::{CacheError, CacheResult, ConfigError, DocRef, IdentityError, IdentityNormalizer};
use tracing::Level;

use crate::chunk::{self, Chunk, ChunkSession};
use crate::log::{self, CacheOp, LogPolicy};
use crate::notifier::{CacheEvent, EventKind, ListenerResult, Notifier, SubscriptionId};
use crate::query::ListQuery;

/// In-process write-through cache mirroring an externally persisted
/// document collection.
///
/// Documents are held as `Arc<D>` and shared by reference with whoever
/// supplied them; the cache never clones or mutates document contents,
/// only its own key-to-document mapping. The canonical key is derived by
/// the injected [`IdentityNormalizer`] collaborator.
///
/// # Example
///
/// ```ignore
/// let mut cache = DocumentCache::new("Car", ObjectIdNormalizer::new())?;
/// cache.subscribe(EventKind::Changed, |_| {
///     // re-render
///     Ok(())
/// });
/// cache.put(car)?;
/// let page = cache.get_chunk(50, 0, ListQuery::new())?;
/// ```
pub struct DocumentCache<D, N> {
    name: String,
    normalizer: N,
    entries: HashMap<String, Arc<D>>,
    notifier: Notifier<D>,
    log_policy: LogPolicy,
}

impl<D, N: IdentityNormalizer<D>> DocumentCache<D, N> {
    /// Create a cache. The name is used only for diagnostic labeling and
    /// must not be empty.
    pub fn new(name: impl Into<String>, normalizer: N) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        Ok(Self {
            name,
            normalizer,
            entries: HashMap::new(),
            notifier: Notifier::new(),
            log_policy: LogPolicy::default(),
        })
    }

    /// Builder form of [`set_log_policy`](Self::set_log_policy).
    pub fn with_log_policy(mut self, policy: LogPolicy) -> Self {
        self.log_policy = policy;
        self
    }

    /// Diagnostic name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the whole diagnostic log policy.
    pub fn set_log_policy(&mut self, policy: LogPolicy) {
        self.log_policy = policy;
    }

    /// Adjust the diagnostic severity of one operation kind; `None`
    /// silences it.
    pub fn set_log_level(&mut self, op: CacheOp, level: Option<Level>) {
        self.log_policy.set(op, level);
    }

    // === Subscription ===

    /// Register a listener for one event kind. Listeners run
    /// synchronously on the mutator's call stack, in registration order.
    /// A listener returning `Err` is logged and dropped; it never reaches
    /// the mutator's caller.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&CacheEvent<D>) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(kind, listener)
    }

    /// Remove a listener. Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // === Mutation ===

    /// Insert or replace a document, keyed by its own identity. Emits
    /// `Added` or `Updated` followed by `Changed`.
    pub fn put(&mut self, doc: impl Into<Arc<D>>) -> CacheResult<()> {
        self.put_inner(doc.into(), true)
    }

    /// [`put`](Self::put) without notification.
    pub fn put_silent(&mut self, doc: impl Into<Arc<D>>) -> CacheResult<()> {
        self.put_inner(doc.into(), false)
    }

    fn put_inner(&mut self, doc: Arc<D>, notify: bool) -> CacheResult<()> {
        let key = self.normalizer.canonical_key(DocRef::doc(&doc))?;
        let previous = self.entries.insert(key.clone(), Arc::clone(&doc));
        let op = if previous.is_some() {
            CacheOp::Update
        } else {
            CacheOp::Add
        };
        self.log_op(op, &key);
        if notify {
            let event = if previous.is_some() {
                CacheEvent::Updated(doc)
            } else {
                CacheEvent::Added(doc)
            };
            self.notifier.emit(&self.name, &event);
            self.notifier.emit(&self.name, &CacheEvent::Changed);
        }
        Ok(())
    }

    /// Remove a document by key, id, or the document itself. Returns
    /// whether an entry was removed; on removal emits `Removed` with the
    /// removed entry, then `Changed`.
    pub fn remove<'a>(&mut self, id: impl Into<DocRef<'a, D>>) -> CacheResult<bool>
    where
        D: 'a,
    {
        self.remove_inner(id.into(), true)
    }

    /// [`remove`](Self::remove) without notification.
    pub fn remove_silent<'a>(&mut self, id: impl Into<DocRef<'a, D>>) -> CacheResult<bool>
    where
        D: 'a,
    {
        self.remove_inner(id.into(), false)
    }

    fn remove_inner(&mut self, id: DocRef<'_, D>, notify: bool) -> CacheResult<bool> {
        let key = self.normalizer.canonical_key(id)?;
        match self.entries.remove(&key) {
            Some(entry) => {
                self.log_op(CacheOp::Delete, &key);
                if notify {
                    self.notifier.emit(&self.name, &CacheEvent::Removed(entry));
                    self.notifier.emit(&self.name, &CacheEvent::Changed);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Import a batch of documents additively. Per-document events are
    /// suppressed; after the whole batch one `BulkReplaced` event carries
    /// the batch's (key, document) pairs, followed by one `Changed`.
    ///
    /// Best-effort, not transactional: if identity resolution fails
    /// mid-batch the earlier documents stay applied, the error is
    /// returned, and no events fire for the round.
    pub fn import<I>(&mut self, docs: I) -> CacheResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Arc<D>>,
    {
        let mut batch = Vec::new();
        for doc in docs {
            let doc = doc.into();
            let key = self.normalizer.canonical_key(DocRef::doc(&doc))?;
            self.entries.insert(key.clone(), Arc::clone(&doc));
            batch.push((key, doc));
        }
        self.log_op(CacheOp::Import, &format!("{} documents", batch.len()));
        self.notifier.emit(&self.name, &CacheEvent::BulkReplaced(batch));
        self.notifier.emit(&self.name, &CacheEvent::Changed);
        Ok(())
    }

    /// Empty the cache. Notifies like an empty import: `BulkReplaced`
    /// with no entries, then `Changed`.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.log_op(CacheOp::Clear, &format!("{count} entries"));
        self.notifier
            .emit(&self.name, &CacheEvent::BulkReplaced(Vec::new()));
        self.notifier.emit(&self.name, &CacheEvent::Changed);
    }

    // === Query ===

    /// Look up a document. Absence is `Ok(None)`; only identity
    /// resolution can fail.
    pub fn get<'a>(&self, id: impl Into<DocRef<'a, D>>) -> CacheResult<Option<Arc<D>>>
    where
        D: 'a,
    {
        let key = self.normalizer.canonical_key(id.into())?;
        Ok(self.entries.get(&key).cloned())
    }

    /// Look up a document, turning absence into a caller-supplied error
    /// built from the resolved canonical key.
    pub fn get_or_else<'a, E, F>(&self, id: impl Into<DocRef<'a, D>>, on_missing: F) -> Result<Arc<D>, E>
    where
        D: 'a,
        E: From<IdentityError>,
        F: FnOnce(&str) -> E,
    {
        let key = self.normalizer.canonical_key(id.into())?;
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| on_missing(&key))
    }

    /// Look up many documents, silently skipping ids that do not resolve
    /// or are not present.
    pub fn get_many<'a, I>(&self, ids: I) -> Vec<Arc<D>>
    where
        D: 'a,
        I: IntoIterator,
        I::Item: Into<DocRef<'a, D>>,
    {
        ids.into_iter()
            .filter_map(|id| {
                let key = self.normalizer.canonical_key(id.into()).ok()?;
                self.entries.get(&key).cloned()
            })
            .collect()
    }

    /// Existence check. Unresolvable input is simply absent; no error,
    /// no events.
    pub fn has<'a>(&self, id: impl Into<DocRef<'a, D>>) -> bool
    where
        D: 'a,
    {
        self.normalizer
            .canonical_key(id.into())
            .map(|key| self.entries.contains_key(&key))
            .unwrap_or(false)
    }

    /// Current entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate current documents in undefined order. The borrow keeps the
    /// store immutable for the iterator's lifetime; call again for a fresh
    /// sequence after mutating.
    pub fn values(&self) -> impl Iterator<Item = &Arc<D>> {
        self.entries.values()
    }

    /// Materialize a filtered, sorted snapshot of current contents. Order
    /// without a sort is undefined; an empty cache yields an empty vec.
    pub fn list(&self, query: ListQuery<'_, D>) -> Vec<Arc<D>> {
        query.apply(self.entries.values().cloned().collect())
    }

    // === Pagination ===

    /// One page of the filtered/sorted view. Recomputes the view per
    /// call; the backing collection is expected to be small enough that
    /// repeated full scans beat index bookkeeping.
    pub fn get_chunk(
        &self,
        size: usize,
        index: usize,
        query: ListQuery<'_, D>,
    ) -> CacheResult<Chunk<D>> {
        if size == 0 {
            return Err(CacheError::InvalidChunkSize { size });
        }
        Ok(chunk::paginate(self.list(query), size, index))
    }

    /// Partition a snapshot of the filtered/sorted view into a one-shot
    /// iterable session. The session never observes later mutations.
    pub fn chunk_session(
        &self,
        size: usize,
        query: ListQuery<'_, D>,
    ) -> CacheResult<ChunkSession<D>> {
        if size == 0 {
            return Err(CacheError::InvalidChunkSize { size });
        }
        Ok(ChunkSession::new(self.list(query), size))
    }

    fn log_op(&self, op: CacheOp, detail: &str) {
        if let Some(level) = self.log_policy.level(op) {
            log::emit(level, &self.name, op, detail);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
