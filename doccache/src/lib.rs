//! doccache - In-Process Write-Through Document Cache
//!
//! Mirrors a set of externally persisted, identity-keyed documents in
//! memory and notifies subscribers of changes. The cache is populated and
//! mutated exclusively by its owner's write path; it never talks to a
//! durable store itself.
//!
//! # Architecture
//!
//! - [`DocumentCache`]: the identity-keyed store and mutation API
//! - [`CacheEvent`] / [`EventKind`]: the change-notification protocol,
//!   delivered synchronously in registration order
//! - [`ListQuery`]: filtered/sorted snapshot views, recomputed per call
//! - [`Chunk`] / [`ChunkSession`]: fixed-size pagination and one-shot
//!   chunk iteration over a stable snapshot
//! - [`LogPolicy`]: per-operation diagnostic log severities
//!
//! Identity and error types live in `doccache-core` and are re-exported
//! here for convenience.
//!
//! # Concurrency
//!
//! One logical thread of control per instance. All operations are
//! synchronous, nothing is deferred, and the cache takes no locks;
//! wrap it yourself if you must share it across threads.

pub mod cache;
pub mod chunk;
pub mod log;
pub mod notifier;
pub mod query;

pub use cache::DocumentCache;
pub use chunk::{Chunk, ChunkIter, ChunkSession, SessionChunk};
pub use log::{CacheOp, LogPolicy};
pub use notifier::{CacheEvent, EventKind, ListenerError, ListenerResult, SubscriptionId};
pub use query::{ListQuery, PreFilter, SortComparator};

// Re-export core types for convenience
pub use doccache_core::{
    CacheError, CacheResult, ConfigError, DocRef, Identified, IdentityError, IdentityNormalizer,
    ObjectId, ObjectIdNormalizer,
};
