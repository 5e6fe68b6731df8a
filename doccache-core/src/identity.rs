//! Identity types for cached documents

use crate::error::IdentityError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw byte length of an [`ObjectId`].
pub const OBJECT_ID_LEN: usize = 12;

/// Hex string length of an [`ObjectId`] (two characters per byte).
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

/// A 12-byte document identifier, rendered as 24 lowercase hex characters.
///
/// The first 4 bytes hold a big-endian Unix timestamp, making ids naturally
/// sortable by creation time. The cache never generates ids; they arrive
/// from whatever produced the documents.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Construct from raw bytes.
    pub fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a 24-character hex string. Case-insensitive; the
    /// canonical rendering is always lowercase.
    pub fn parse_str(value: &str) -> Result<Self, IdentityError> {
        if value.len() != OBJECT_ID_HEX_LEN {
            return Err(IdentityError::InvalidKey {
                value: value.to_string(),
                reason: format!("expected {OBJECT_ID_HEX_LEN} hex characters, got {}", value.len()),
            });
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|e| IdentityError::InvalidKey {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }

    /// Raw bytes of this id.
    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.0
    }

    /// Canonical lowercase hex form, used as the cache map key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creation timestamp embedded in the first 4 bytes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}

impl FromStr for ObjectId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse_str(&value).map_err(serde::de::Error::custom)
    }
}

/// Implemented by document types that carry their own identity.
///
/// The default [`ObjectIdNormalizer`](crate::ObjectIdNormalizer) derives the
/// canonical key from this id.
pub trait Identified {
    /// The document's identity value.
    fn object_id(&self) -> ObjectId;
}

// =============================================================================
// TESTS
// =============================================================================
