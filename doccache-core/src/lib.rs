//! doccache core - Identity and Error Types
//!
//! Shared leaf types for the doccache document cache. The engine crate
//! (`doccache`) depends on this; nothing here performs cache mutation.
//!
//! # Key Types
//!
//! - [`ObjectId`]: 12-byte / 24-hex document identifier with an embedded
//!   creation timestamp
//! - [`Identified`]: trait for documents that carry their own id
//! - [`DocRef`]: tagged lookup input (raw key, typed id, or document)
//! - [`IdentityNormalizer`]: collaborator that reduces a [`DocRef`] to the
//!   canonical map key; [`ObjectIdNormalizer`] is the default implementation
//! - [`CacheError`] / [`CacheResult`]: the error taxonomy

pub mod error;
pub mod identity;
pub mod resolve;

pub use error::{CacheError, CacheResult, ConfigError, IdentityError};
pub use identity::{Identified, ObjectId, OBJECT_ID_HEX_LEN, OBJECT_ID_LEN};
pub use resolve::{DocRef, IdentityNormalizer, ObjectIdNormalizer};
