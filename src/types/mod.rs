//! Reference-counted values and the containers built on them.
//!
//! # Architecture
//!
//! - **Value model** - [`Value`] is a tagged, reference-counted datum. Cloning takes a
//!   reference, dropping releases one, and the payload is freed with the last reference.
//! - **Capability table** - [`ValueType`] and [`Capabilities`] describe, per tag, how a
//!   value hashes, compares and whether it owns other values.
//! - **Backends** - [`HashTable`], [`LinkedList`] and [`ArrayList`] are the concrete
//!   containers.
//! - **Interfaces** - [`Map`] and [`List`] bind any backend implementing [`MapLike`] or
//!   [`ListLike`] behind one API, and [`ValueIterator`] enumerates them.
//!
//! # Examples
//!
//! ```rust
//! use asval::types::{HashTable, Map, Value, ValueIterator};
//!
//! let map = Map::owned(HashTable::new(10)?);
//! map.set(Value::string_from("a"), Value::integer(1))?;
//! map.set(Value::string_from("b"), Value::integer(2))?;
//!
//! let mut total = 0;
//! let mut iterator = map.iterator();
//! while iterator.has_next() {
//!     total += iterator.next()?.as_pair()?.second().as_integer()?;
//! }
//! assert_eq!(total, 3);
//! # Ok::<(), asval::Error>(())
//! ```

mod arraylist;
mod hashmap;
mod iterator;
mod linkedlist;
mod list;
mod map;
mod value;
mod valuetype;

pub use arraylist::{ArrayList, ArrayListIterator};
pub use hashmap::{HashTable, HashTableIterator};
pub use iterator::ValueIterator;
pub use linkedlist::{LinkedList, LinkedListIterator};
pub use list::{List, ListLike};
pub use map::{Map, MapLike};
pub use value::{Pair, Value};
pub use valuetype::{Capabilities, ValueType};
