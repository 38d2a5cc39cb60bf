//! Value tags and their capabilities.
//!
//! Every [`crate::Value`] carries exactly one [`ValueType`] for its whole lifetime. The
//! tag decides which capabilities the value offers: whether it can be hashed and used as
//! a map key, whether equality looks at content or at identity, and whether it owns
//! other values. Hashing itself is implemented here so that equal content always hashes
//! identically, regardless of which container asks.

use bitflags::bitflags;
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// The tag of a [`crate::Value`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ValueType {
    /// The "no value" singleton
    Nil,
    /// 64-bit signed integer
    Integer,
    /// UTF-8 string
    String,
    /// Raw byte sequence
    Blob,
    /// Key/value tuple produced by map iteration
    Pair,
    /// Sequential container
    List,
    /// Associative container
    Map,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Capabilities offered by the values of one [`ValueType`]
    pub struct Capabilities: u8 {
        /// Values can be hashed and used as map keys
        const HASHABLE = 0x01;
        /// Equality compares content, otherwise identity
        const CONTENT_EQ = 0x02;
        /// Values own references to other values
        const CONTAINER = 0x04;
    }
}

impl ValueType {
    /// Returns the capability set of this tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use asval::types::{Capabilities, ValueType};
    ///
    /// assert!(ValueType::String.capabilities().contains(Capabilities::HASHABLE));
    /// assert!(!ValueType::Map.capabilities().contains(Capabilities::HASHABLE));
    /// ```
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            ValueType::Nil | ValueType::Integer | ValueType::String | ValueType::Blob => {
                Capabilities::HASHABLE.union(Capabilities::CONTENT_EQ)
            }
            ValueType::Pair => Capabilities::CONTENT_EQ.union(Capabilities::CONTAINER),
            ValueType::List | ValueType::Map => Capabilities::CONTAINER,
        }
    }

    /// Returns `true` if values of this tag can be used as map keys.
    #[must_use]
    pub const fn is_hashable(self) -> bool {
        self.capabilities().contains(Capabilities::HASHABLE)
    }

    /// Returns `true` if equality of this tag compares content rather than identity.
    #[must_use]
    pub const fn compares_content(self) -> bool {
        self.capabilities().contains(Capabilities::CONTENT_EQ)
    }

    /// Returns `true` if values of this tag own other values.
    #[must_use]
    pub const fn is_container(self) -> bool {
        self.capabilities().contains(Capabilities::CONTAINER)
    }
}

/// Content hash for string and blob payloads.
///
/// sdbm: `h = c + (h << 6) + (h << 16) - h`, with wrapping arithmetic.
pub(crate) fn hash_bytes(data: &[u8]) -> u32 {
    data.iter().fold(0_u32, |hash, &byte| {
        u32::from(byte)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash)
    })
}

/// Value hash for integer payloads, folding the high word into the low word.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn hash_integer(value: i64) -> u32 {
    let bits = value as u64;
    (bits ^ (bits >> 32)) as u32
}
