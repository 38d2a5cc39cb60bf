//! Value encoding at the collaborator boundary.
//!
//! Record payloads that carry structured data (lists and maps) arrive as encoded bytes.
//! A [`Serializer`] turns such bytes into a [`Value`] tree built from the public
//! constructors, and walks a [`Value`] tree to produce bytes again.
//!
//! # Key Components
//!
//! - [`Serializer`] - the encode/decode contract
//! - [`MsgPackSerializer`] - MessagePack implementation
//! - [`Parser`] - bounds-checked cursor used by decoders
//! - [`io`] - big-endian primitive helpers shared by encoder and decoder
//!
//! # Examples
//!
//! ```rust
//! use asval::codec::{MsgPackSerializer, Serializer};
//! use asval::Value;
//!
//! let serializer = MsgPackSerializer::default();
//! let bytes = serializer.serialize_to_vec(&Value::string_from("hi"))?;
//! assert_eq!(bytes, [0xa2, b'h', b'i']);
//!
//! let value = serializer.deserialize(&bytes)?;
//! assert_eq!(value.as_str()?, "hi");
//! # Ok::<(), asval::Error>(())
//! ```

pub mod io;
mod msgpack;
mod parser;

pub use msgpack::MsgPackSerializer;
pub use parser::Parser;

use crate::{Result, Value};

/// Converts between [`Value`] trees and an encoded byte form.
pub trait Serializer {
    /// Appends the encoding of `value` to `out`.
    ///
    /// # Errors
    /// Returns an error if `value` can not be represented in the encoding, is nested
    /// too deeply, or if `out` can not grow.
    fn serialize(&self, value: &Value, out: &mut Vec<u8>) -> Result<()>;

    /// Decodes exactly one value spanning all of `data`.
    ///
    /// # Errors
    /// Returns an error if `data` is empty, truncated, malformed, carries trailing
    /// bytes or uses types the encoding does not map to a [`Value`].
    fn deserialize(&self, data: &[u8]) -> Result<Value>;

    /// Encodes `value` into a new buffer.
    ///
    /// # Errors
    /// See [`Serializer::serialize`].
    fn serialize_to_vec(&self, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.serialize(value, &mut out)?;
        Ok(out)
    }
}
