// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # asval
//!
//! Reference-counted values and containers for the client side of a key-value database.
//!
//! Record bins, user-function arguments and results all travel through the client as a
//! small closed set of values: integers, strings, byte blobs, nil, lists, maps and the
//! key/value pairs produced while walking a map. `asval` provides those values, the
//! containers that hold them, and one uniform interface over every container backend.
//!
//! ## Features
//!
//! - **Shared values** - cloning a [`Value`] takes a reference, dropping releases it
//! - **Hash table** - chained buckets with content equality for scalar keys
//! - **Uniform interfaces** - [`Map`] and [`List`] bind any backend behind one API
//! - **Snapshot iteration** - iterators are unaffected by later container mutation
//! - **MessagePack codec** - decode list and map bins, encode value trees
//!
//! ## Quick Start
//!
//! ```rust
//! use asval::prelude::*;
//!
//! let map = Map::hashmap(10)?;
//! map.set(Value::string_from("a"), Value::integer(1))?;
//! map.set(Value::string_from("b"), Value::integer(2))?;
//! map.set(Value::string_from("a"), Value::integer(4))?;
//! assert_eq!(map.size(), 2);
//!
//! let mut iterator = map.iterator();
//! while iterator.has_next() {
//!     let pair = iterator.next()?.as_pair()?;
//!     println!("{} = {}", pair.first(), pair.second());
//! }
//! # Ok::<(), asval::Error>(())
//! ```
//!
//! ## Decoding a record bin
//!
//! ```rust
//! use asval::bin::{bin_to_value, BinValue};
//! use asval::codec::MsgPackSerializer;
//!
//! let bin = BinValue::Map(vec![0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x02]);
//! let value = bin_to_value(&MsgPackSerializer::new(), &bin)?;
//! assert_eq!(value.as_map()?.size(), 2);
//! # Ok::<(), asval::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`] with [`Error`]. Lookups that find
//! nothing return `Ok(None)`; errors are reserved for misuse, damaged input and
//! allocation failure.
//!
//! ## Threading
//!
//! Values and containers are single-threaded (`!Send`, `!Sync`). Give each thread its
//! own values, or exchange them in encoded form.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

pub mod bin;
pub mod codec;
pub mod prelude;
pub mod types;

mod config;

/// `asval` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `asval` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use asval::{Error, Map, Value};
///
/// let map = Map::hashmap(4)?;
/// let key = Value::pair(Value::integer(1), Value::integer(2));
/// match map.set(key, Value::NIL) {
///     Err(Error::KeyNotHashable(kind)) => println!("{} can not be a key", kind),
///     Err(e) => println!("Error: {}", e),
///     Ok(()) => unreachable!(),
/// }
/// # Ok::<(), asval::Error>(())
/// ```
pub use error::Error;

/// Limits and sizing defaults shared by containers and the codec.
pub use config::RuntimeConfig;

pub use types::{
    ArrayList, Capabilities, HashTable, LinkedList, List, ListLike, Map, MapLike, Pair, Value,
    ValueIterator, ValueType,
};
