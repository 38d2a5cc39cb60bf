//! # asval Prelude
//!
//! Convenient re-exports of the types and traits most code working with values needs.
//!
//! ```rust
//! use asval::prelude::*;
//!
//! let list = List::owned(ArrayList::new());
//! list.append(Value::integer(1))?;
//! assert_eq!(list.iterator().remaining()?.len(), 1);
//! # Ok::<(), asval::Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all asval operations
pub use crate::Error;

/// The result type used throughout asval
pub use crate::Result;

/// Sizing and decoding limits
pub use crate::RuntimeConfig;

// ================================================================================================
// Values
// ================================================================================================

/// The value model and its type tags
pub use crate::types::{Capabilities, Pair, Value, ValueType};

// ================================================================================================
// Containers and Interfaces
// ================================================================================================

/// Concrete container backends
pub use crate::types::{ArrayList, HashTable, LinkedList};

/// Backend-agnostic interfaces and the iterator protocol
pub use crate::types::{List, ListLike, Map, MapLike, ValueIterator};

// ================================================================================================
// Codec
// ================================================================================================

/// Value encoding
pub use crate::codec::{MsgPackSerializer, Serializer};

/// Record bin payloads
pub use crate::bin::{bin_to_value, BinValue, BlobKind};
