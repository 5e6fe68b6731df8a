//! Identity normalization: turning heterogeneous lookup inputs into
//! canonical string keys.
//!
//! Lookup inputs arrive in exactly three shapes, captured by [`DocRef`]:
//! a raw string key, a typed [`ObjectId`], or a document carrying its own
//! id. A single [`IdentityNormalizer`] collaborator reduces all three to
//! the canonical key the cache maps on; anything outside those shapes is
//! simply not constructible.

use crate::error::IdentityError;
use crate::identity::{Identified, ObjectId};
use std::cell::Cell;
use std::fmt;

/// A borrowed lookup input: raw key, typed id, or document.
pub enum DocRef<'a, D> {
    /// A raw string key, possibly already canonical.
    Key(&'a str),
    /// A typed object id.
    Id(&'a ObjectId),
    /// A document that knows its own id.
    Doc(&'a D),
}

impl<'a, D> DocRef<'a, D> {
    /// Reference a raw string key.
    pub fn key(key: &'a str) -> Self {
        Self::Key(key)
    }

    /// Reference a typed id.
    pub fn id(id: &'a ObjectId) -> Self {
        Self::Id(id)
    }

    /// Reference a document.
    pub fn doc(doc: &'a D) -> Self {
        Self::Doc(doc)
    }
}

impl<'a, D> Clone for DocRef<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, D> Copy for DocRef<'a, D> {}

impl<'a, D> fmt::Debug for DocRef<'a, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Self::Doc(_) => f.write_str("Doc(..)"),
        }
    }
}

impl<'a, D> From<&'a str> for DocRef<'a, D> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a, D> From<&'a String> for DocRef<'a, D> {
    fn from(key: &'a String) -> Self {
        Self::Key(key)
    }
}

impl<'a, D> From<&'a ObjectId> for DocRef<'a, D> {
    fn from(id: &'a ObjectId) -> Self {
        Self::Id(id)
    }
}

/// Reduces a [`DocRef`] to the canonical string key the cache maps on.
///
/// The cache itself only requires equality and a total order over the
/// returned keys; what counts as a valid identity is entirely this
/// collaborator's concern.
pub trait IdentityNormalizer<D> {
    /// Produce the canonical key, or fail if the input cannot carry one.
    fn canonical_key(&self, input: DocRef<'_, D>) -> Result<String, IdentityError>;
}

/// Default normalizer for documents with [`ObjectId`] identities.
///
/// Typed ids and documents normalize to the id's lowercase hex form. Raw
/// string keys are parsed as object ids and canonicalized; in lenient mode
/// (the default) a raw key that does not parse is used verbatim, with a
/// one-time warning per normalizer instance. Strict mode rejects such keys
/// instead. Empty raw keys are always rejected.
#[derive(Debug, Clone)]
pub struct ObjectIdNormalizer {
    strict: bool,
    warned_loose_key: Cell<bool>,
}

impl ObjectIdNormalizer {
    /// Lenient normalizer: non-hex raw keys pass through verbatim.
    pub fn new() -> Self {
        Self {
            strict: false,
            warned_loose_key: Cell::new(false),
        }
    }

    /// Strict normalizer: raw keys must be valid 24-hex object ids.
    pub fn strict() -> Self {
        Self {
            strict: true,
            warned_loose_key: Cell::new(false),
        }
    }
}

impl Default for ObjectIdNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Identified> IdentityNormalizer<D> for ObjectIdNormalizer {
    fn canonical_key(&self, input: DocRef<'_, D>) -> Result<String, IdentityError> {
        match input {
            DocRef::Key(raw) => {
                if raw.is_empty() {
                    return Err(IdentityError::EmptyKey);
                }
                match ObjectId::parse_str(raw) {
                    Ok(id) => Ok(id.to_hex()),
                    Err(err) if self.strict => Err(err),
                    Err(_) => {
                        if !self.warned_loose_key.replace(true) {
                            tracing::warn!(
                                key = raw,
                                "raw key is not a valid object id, using it verbatim"
                            );
                        }
                        Ok(raw.to_string())
                    }
                }
            }
            DocRef::Id(id) => Ok(id.to_hex()),
            DocRef::Doc(doc) => Ok(doc.object_id().to_hex()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "62e476d26718c65156172b33";

    struct Doc {
        id: ObjectId,
    }

    impl Identified for Doc {
        fn object_id(&self) -> ObjectId {
            self.id
        }
    }

    fn doc() -> Doc {
        Doc {
            id: ObjectId::parse_str(HEX).expect("valid id"),
        }
    }

    #[test]
    fn test_all_three_input_shapes_normalize_identically() {
        let normalizer = ObjectIdNormalizer::new();
        let doc = doc();
        let from_doc = normalizer.canonical_key(DocRef::doc(&doc)).expect("doc");
        let from_id = normalizer.canonical_key(DocRef::<Doc>::id(&doc.id)).expect("id");
        let from_key = normalizer
            .canonical_key(DocRef::<Doc>::key(HEX))
            .expect("key");
        assert_eq!(from_doc, HEX);
        assert_eq!(from_id, HEX);
        assert_eq!(from_key, HEX);
    }

    #[test]
    fn test_raw_key_is_canonicalized_to_lowercase() {
        let normalizer = ObjectIdNormalizer::new();
        let upper = HEX.to_uppercase();
        let key = normalizer
            .canonical_key(DocRef::<Doc>::key(&upper))
            .expect("key");
        assert_eq!(key, HEX);
    }

    #[test]
    fn test_lenient_passes_non_hex_key_verbatim() {
        let normalizer = ObjectIdNormalizer::new();
        let key = normalizer
            .canonical_key(DocRef::<Doc>::key("legacy-key"))
            .expect("lenient");
        assert_eq!(key, "legacy-key");
        // The warn-once flag is per instance, not global.
        assert!(normalizer.warned_loose_key.get());
        assert!(!ObjectIdNormalizer::new().warned_loose_key.get());
    }

    #[test]
    fn test_strict_rejects_non_hex_key() {
        let normalizer = ObjectIdNormalizer::strict();
        let err = normalizer
            .canonical_key(DocRef::<Doc>::key("legacy-key"))
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidKey { .. }));
    }

    #[test]
    fn test_empty_key_always_rejected() {
        for normalizer in [ObjectIdNormalizer::new(), ObjectIdNormalizer::strict()] {
            let err = normalizer.canonical_key(DocRef::<Doc>::key("")).unwrap_err();
            assert_eq!(err, IdentityError::EmptyKey);
        }
    }

    #[test]
    fn test_from_impls() {
        let normalizer = ObjectIdNormalizer::new();
        let id = ObjectId::parse_str(HEX).expect("valid id");
        let owned = HEX.to_string();
        for input in [
            DocRef::<Doc>::from(HEX),
            DocRef::<Doc>::from(&owned),
            DocRef::<Doc>::from(&id),
        ] {
            assert_eq!(normalizer.canonical_key(input).expect("valid"), HEX);
        }
    }
}
