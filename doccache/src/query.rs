//! Filter and sort options for view building.

use std::cmp::Ordering;
use std::sync::Arc;

/// Predicate over (document, snapshot index, full snapshot).
pub type PreFilter<'a, D> = Box<dyn Fn(&D, usize, &[Arc<D>]) -> bool + 'a>;

/// Total-order comparator over documents.
pub type SortComparator<'a, D> = Box<dyn Fn(&D, &D) -> Ordering + 'a>;

/// Optional pre-filter and sort applied by `list` and the chunk operations.
///
/// The filter runs first, keeping matches in their relative snapshot
/// order; the comparator then stable-sorts the filtered result. The
/// default query returns the full snapshot in store order (which is
/// undefined between mutation rounds).
pub struct ListQuery<'a, D> {
    pre_filter: Option<PreFilter<'a, D>>,
    sort: Option<SortComparator<'a, D>>,
}

impl<'a, D> Default for ListQuery<'a, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, D> ListQuery<'a, D> {
    /// A query with no filter and no sort.
    pub fn new() -> Self {
        Self {
            pre_filter: None,
            sort: None,
        }
    }

    /// Keep only documents for which the predicate returns true. The
    /// predicate also receives the document's index in the snapshot and
    /// the snapshot itself.
    pub fn filter(mut self, pre_filter: impl Fn(&D, usize, &[Arc<D>]) -> bool + 'a) -> Self {
        self.pre_filter = Some(Box::new(pre_filter));
        self
    }

    /// Stable-sort the filtered result with the given comparator.
    pub fn sort_by(mut self, sort: impl Fn(&D, &D) -> Ordering + 'a) -> Self {
        self.sort = Some(Box::new(sort));
        self
    }

    /// Materialize a filtered, sorted view of the snapshot.
    pub(crate) fn apply(&self, snapshot: Vec<Arc<D>>) -> Vec<Arc<D>> {
        let mut data = match &self.pre_filter {
            Some(pre_filter) => {
                let mut kept = Vec::new();
                for (index, doc) in snapshot.iter().enumerate() {
                    if pre_filter(doc, index, &snapshot) {
                        kept.push(Arc::clone(doc));
                    }
                }
                kept
            }
            None => snapshot,
        };
        if let Some(sort) = &self.sort {
            data.sort_by(|a, b| sort(a, b));
        }
        data
    }
}

// =============================================================================
// TESTS
// =============================================================================
