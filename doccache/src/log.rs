//! Per-operation diagnostic log policy.
//!
//! Each mutation kind logs one structured line through `tracing`, at a
//! severity chosen per operation. Levels are independently adjustable
//! after construction; `None` silences an operation entirely.

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Mutation operation kinds, used to key the log policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheOp {
    Add,
    Update,
    Delete,
    Import,
    Clear,
}

impl CacheOp {
    /// The verb that opens the diagnostic message for this operation.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
            Self::Clear => "clear",
        }
    }
}

/// Mapping from operation kind to diagnostic severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPolicy {
    add: Option<Level>,
    update: Option<Level>,
    delete: Option<Level>,
    import: Option<Level>,
    clear: Option<Level>,
}

impl Default for LogPolicy {
    /// Everything at `DEBUG`.
    fn default() -> Self {
        Self::uniform(Level::DEBUG)
    }
}

impl LogPolicy {
    /// Log every operation at the same level.
    pub fn uniform(level: Level) -> Self {
        Self {
            add: Some(level),
            update: Some(level),
            delete: Some(level),
            import: Some(level),
            clear: Some(level),
        }
    }

    /// Log nothing.
    pub fn silent() -> Self {
        Self {
            add: None,
            update: None,
            delete: None,
            import: None,
            clear: None,
        }
    }

    /// The level configured for an operation, if any.
    pub fn level(&self, op: CacheOp) -> Option<Level> {
        match op {
            CacheOp::Add => self.add,
            CacheOp::Update => self.update,
            CacheOp::Delete => self.delete,
            CacheOp::Import => self.import,
            CacheOp::Clear => self.clear,
        }
    }

    /// Set the level for one operation; `None` silences it.
    pub fn set(&mut self, op: CacheOp, level: Option<Level>) {
        match op {
            CacheOp::Add => self.add = level,
            CacheOp::Update => self.update = level,
            CacheOp::Delete => self.delete = level,
            CacheOp::Import => self.import = level,
            CacheOp::Clear => self.clear = level,
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, op: CacheOp, level: Option<Level>) -> Self {
        self.set(op, level);
        self
    }
}

/// Emit one diagnostic line at a runtime-chosen level.
///
/// `tracing` macros take their level statically, so the dispatch is an
/// explicit fan-out.
pub(crate) fn emit(level: Level, cache: &str, op: CacheOp, detail: &str) {
    let verb = op.verb();
    if level == Level::ERROR {
        tracing::error!(cache, "cache {verb} {detail}");
    } else if level == Level::WARN {
        tracing::warn!(cache, "cache {verb} {detail}");
    } else if level == Level::INFO {
        tracing::info!(cache, "cache {verb} {detail}");
    } else if level == Level::DEBUG {
        tracing::debug!(cache, "cache {verb} {detail}");
    } else {
        tracing::trace!(cache, "cache {verb} {detail}");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_all_debug() {
        let policy = LogPolicy::default();
        for op in [
            CacheOp::Add,
            CacheOp::Update,
            CacheOp::Delete,
            CacheOp::Import,
            CacheOp::Clear,
        ] {
            assert_eq!(policy.level(op), Some(Level::DEBUG));
        }
    }

    #[test]
    fn test_levels_are_independently_adjustable() {
        let mut policy = LogPolicy::default();
        policy.set(CacheOp::Import, Some(Level::INFO));
        policy.set(CacheOp::Clear, None);
        assert_eq!(policy.level(CacheOp::Import), Some(Level::INFO));
        assert_eq!(policy.level(CacheOp::Clear), None);
        assert_eq!(policy.level(CacheOp::Add), Some(Level::DEBUG));
    }

    #[test]
    fn test_builder_form() {
        let policy = LogPolicy::silent().with(CacheOp::Delete, Some(Level::WARN));
        assert_eq!(policy.level(CacheOp::Delete), Some(Level::WARN));
        assert_eq!(policy.level(CacheOp::Add), None);
    }

    #[test]
    fn test_serde_names_for_cache_op() {
        assert_eq!(
            serde_json::to_string(&CacheOp::Import).expect("serialize"),
            "\"import\""
        );
    }
}
