//! Generic iterator protocol over containers.
//!
//! A [`ValueIterator`] is a one-pass cursor with an explicit `has_next` / `next` pair,
//! which is how collaborators enumerate a container without knowing its backend:
//!
//! ```rust
//! use asval::{HashTable, Map, Value, ValueIterator};
//!
//! let map = Map::owned(HashTable::new(4)?);
//! map.set(Value::string_from("a"), Value::integer(1))?;
//!
//! let mut iterator = map.iterator();
//! while iterator.has_next() {
//!     let pair = iterator.next()?.as_pair()?;
//!     assert_eq!(pair.first().as_str()?, "a");
//! }
//! # Ok::<(), asval::Error>(())
//! ```
//!
//! The element returned by [`ValueIterator::next`] borrows the iterator, so it can not
//! be kept across the following call to `next` or past the iterator itself; take a
//! reference with `clone()` to retain it. Dropping an iterator releases only what the
//! iterator holds and never modifies the container it walks.
//!
//! Iterators walk a snapshot of their container: changes made to the container after
//! the iterator was created are not observed by it.

use crate::{Result, Value};

/// One-pass cursor producing the elements of a container.
pub trait ValueIterator {
    /// Returns `true` if another element is available.
    ///
    /// Calling this any number of times does not move the cursor.
    fn has_next(&self) -> bool;

    /// Advances the cursor and returns the element it passed over.
    ///
    /// Map iterators return [`Value::Pair`]s owned by the iterator; list iterators
    /// return the held values directly.
    ///
    /// # Errors
    /// Returns [`crate::Error::Exhausted`] if `has_next` would have returned `false`.
    fn next(&mut self) -> Result<&Value>;

    /// Drains the remaining elements into a vector, taking a reference to each.
    ///
    /// # Errors
    /// Propagates errors from [`ValueIterator::next`].
    fn remaining(&mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        while self.has_next() {
            values.push(self.next()?.clone());
        }
        Ok(values)
    }
}

impl<I: ValueIterator + ?Sized> ValueIterator for Box<I> {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<&Value> {
        (**self).next()
    }
}
