//! Record bin payloads and their conversion into values.
//!
//! The wire layer hands over each record field ("bin") as a typed payload. Scalar
//! payloads map directly onto a [`Value`]; list and map payloads arrive encoded and are
//! decoded through a [`Serializer`].
//!
//! # Examples
//!
//! ```rust
//! use asval::bin::{bin_to_value, BinValue, BlobKind};
//! use asval::codec::MsgPackSerializer;
//!
//! let serializer = MsgPackSerializer::new();
//!
//! let bin = BinValue::Blob { kind: BlobKind::Python, data: vec![0x80, 0x04] };
//! let value = bin_to_value(&serializer, &bin)?;
//! assert_eq!(value.as_bytes()?, &[0x80, 0x04]);
//!
//! let bin = BinValue::List(vec![0x92, 0x01, 0x02]);
//! let value = bin_to_value(&serializer, &bin)?;
//! assert_eq!(value.as_list()?.size(), 2);
//! # Ok::<(), asval::Error>(())
//! ```

use log::trace;
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::{codec::Serializer, types::ValueType, Error, Result, Value};

/// Language tag carried by a blob bin.
///
/// The tag records which client serialized the bytes. The runtime treats every kind as
/// opaque bytes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumCount, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum BlobKind {
    /// Untagged bytes
    #[default]
    Generic,
    /// Java-serialized object
    Java,
    /// .NET-serialized object
    CSharp,
    /// Python pickle
    Python,
    /// Ruby marshal data
    Ruby,
    /// Erlang term
    Erlang,
}

/// Typed payload of one record bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinValue {
    /// No value stored
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// UTF-8 string
    String(String),
    /// Raw bytes with the language tag of their producer
    Blob {
        /// Producer of the bytes
        kind: BlobKind,
        /// The bytes
        data: Vec<u8>,
    },
    /// Encoded list
    List(Vec<u8>),
    /// Encoded map
    Map(Vec<u8>),
}

impl BinValue {
    /// Returns `true` for [`BinValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, BinValue::Null)
    }

    /// Converts the payload into a [`Value`], moving string and blob buffers into it
    /// without copying.
    ///
    /// # Errors
    /// See [`bin_to_value`].
    pub fn into_value(self, serializer: &dyn Serializer) -> Result<Value> {
        match self {
            BinValue::Null => Ok(Value::NIL),
            BinValue::Integer(number) => Ok(Value::integer(number)),
            BinValue::String(text) => Ok(Value::string(text)),
            BinValue::Blob { data, .. } => Ok(Value::bytes(data)),
            BinValue::List(data) => decode(serializer, &data, ValueType::List),
            BinValue::Map(data) => decode(serializer, &data, ValueType::Map),
        }
    }
}

/// Converts a bin payload into a [`Value`], copying the payload.
///
/// [`BinValue::Null`] becomes the Nil singleton, blobs of every [`BlobKind`] become
/// blob values, and list and map payloads are decoded with `serializer`.
///
/// # Errors
/// - Decoding errors from `serializer` for list and map payloads
/// - [`Error::TypeMismatch`] if a list or map payload decodes to another type
pub fn bin_to_value(serializer: &dyn Serializer, bin: &BinValue) -> Result<Value> {
    match bin {
        BinValue::Null => Ok(Value::NIL),
        BinValue::Integer(number) => Ok(Value::integer(*number)),
        BinValue::String(text) => Ok(Value::string_from(text)),
        BinValue::Blob { kind, data } => {
            trace!("copying {} byte {} blob", data.len(), kind);
            Ok(Value::bytes_from(data))
        }
        BinValue::List(data) => decode(serializer, data, ValueType::List),
        BinValue::Map(data) => decode(serializer, data, ValueType::Map),
    }
}

fn decode(serializer: &dyn Serializer, data: &[u8], expected: ValueType) -> Result<Value> {
    let value = serializer.deserialize(data)?;
    let found = value.value_type();
    if found != expected {
        return Err(Error::TypeMismatch { expected, found });
    }
    Ok(value)
}
