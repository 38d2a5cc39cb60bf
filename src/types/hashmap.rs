//! Chained-bucket hash table mapping [`Value`] keys to [`Value`] values.
//!
//! # Layout
//!
//! The table owns a fixed number of buckets chosen at construction. Each bucket is a
//! chain of entries kept in insertion order; the bucket of a key is
//! `hash_code(key) % bucket_count`. The table never rehashes, so the bucket count stays
//! what it was created with.
//!
//! Every entry owns one reference to its key and one to its value. No two entries hold
//! keys that compare equal.
//!
//! # Snapshots
//!
//! The bucket array is shared copy-on-write with the iterators created from the table.
//! Mutating the table while an iterator is alive gives the table a private copy of the
//! buckets, so the iterator keeps walking exactly the entries that existed when it was
//! created.
//!
//! # Examples
//!
//! ```rust
//! use asval::{HashTable, Value};
//!
//! let mut table = HashTable::new(10)?;
//! let key = Value::string_from("a");
//!
//! table.set(key.clone(), Value::integer(1))?;
//! table.set(key.clone(), Value::integer(4))?;
//!
//! assert_eq!(table.size(), 1);
//! assert_eq!(table.get(&key)?.unwrap().as_integer()?, 4);
//! # Ok::<(), asval::Error>(())
//! ```

use std::rc::Rc;

use log::trace;

use crate::{
    config::RuntimeConfig,
    types::{iterator::ValueIterator, map::MapLike},
    Error, Result, Value,
};

#[derive(Clone)]
struct Entry {
    key: Value,
    value: Value,
}

type Buckets = Vec<Vec<Entry>>;

fn allocate_buckets(count: usize) -> Result<Buckets> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(count)?;
    buckets.resize_with(count, Vec::new);
    Ok(buckets)
}

/// Hash table with separate chaining.
///
/// See the [module documentation](self) for its structure.
pub struct HashTable {
    buckets: Rc<Buckets>,
    count: usize,
}

impl HashTable {
    /// Number of buckets used when a capacity of `0` is requested.
    pub const MIN_BUCKETS: usize = 8;

    /// Creates an empty table with `capacity` buckets.
    ///
    /// A `capacity` of `0` selects [`HashTable::MIN_BUCKETS`].
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the bucket array can not be allocated.
    pub fn new(capacity: usize) -> Result<Self> {
        let count = if capacity == 0 {
            Self::MIN_BUCKETS
        } else {
            capacity
        };

        Ok(HashTable {
            buckets: Rc::new(allocate_buckets(count)?),
            count: 0,
        })
    }

    /// Creates an empty table sized by [`RuntimeConfig::default_capacity`].
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the bucket array can not be allocated.
    pub fn with_config(config: &RuntimeConfig) -> Result<Self> {
        Self::new(config.default_capacity)
    }

    /// Number of live entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of buckets, fixed at construction.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, key: &Value) -> Result<usize> {
        let hash = key.hash_code()?;
        Ok(hash as usize % self.buckets.len())
    }

    /// Inserts or replaces the entry for `key`, consuming both references.
    ///
    /// If an equal key is already present, its old key and old value are released and
    /// the entry takes the supplied `key` and `value`. Otherwise a new entry is appended
    /// to the key's bucket chain.
    ///
    /// # Errors
    /// - [`Error::KeyNotHashable`] if `key` is a pair, list or map
    /// - [`Error::Allocation`] if the chain can not grow
    pub fn set(&mut self, key: Value, value: Value) -> Result<()> {
        let index = self.bucket_of(&key)?;
        let chain = &mut Rc::make_mut(&mut self.buckets)[index];

        if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
            entry.key = key;
            entry.value = value;
            return Ok(());
        }

        chain.try_reserve(1)?;
        chain.push(Entry { key, value });
        self.count += 1;
        Ok(())
    }

    /// Looks up the value stored for `key`.
    ///
    /// The returned value is borrowed from the table; clone it to keep it beyond the
    /// table. `key` is only borrowed.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] if `key` is a pair, list or map.
    pub fn get(&self, key: &Value) -> Result<Option<&Value>> {
        let index = self.bucket_of(key)?;
        Ok(self.buckets[index]
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| &entry.value))
    }

    /// Returns `true` if an entry for `key` exists.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] if `key` is a pair, list or map.
    pub fn contains_key(&self, key: &Value) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Removes the entry for `key`, handing its key and value back to the caller.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] if `key` is a pair, list or map.
    pub fn remove(&mut self, key: &Value) -> Result<Option<(Value, Value)>> {
        let index = self.bucket_of(key)?;
        let Some(position) = self.buckets[index]
            .iter()
            .position(|entry| &entry.key == key)
        else {
            return Ok(None);
        };

        let entry = Rc::make_mut(&mut self.buckets)[index].remove(position);
        self.count -= 1;
        Ok(Some((entry.key, entry.value)))
    }

    /// Releases every entry; the bucket array is kept for reuse.
    pub fn clear(&mut self) {
        trace!("clearing hash table with {} entries", self.count);

        match Rc::get_mut(&mut self.buckets) {
            Some(buckets) => buckets.iter_mut().for_each(Vec::clear),
            // An iterator still walks the current buckets; leave them to it
            None => {
                let count = self.buckets.len();
                self.buckets = Rc::new((0..count).map(|_| Vec::new()).collect());
            }
        }
        self.count = 0;
    }

    /// Releases every entry and the bucket array.
    pub fn destroy(mut self) {
        self.clear();
    }

    /// Borrowing iterator over `(key, value)` in bucket order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Creates a protocol iterator over a snapshot of the table.
    ///
    /// Each step yields a [`Value::Pair`] of `(key, value)`.
    #[must_use]
    pub fn iterator(&self) -> HashTableIterator {
        HashTableIterator {
            buckets: Rc::clone(&self.buckets),
            bucket: 0,
            slot: 0,
            current: None,
        }
    }
}

impl MapLike for HashTable {
    fn size(&self) -> usize {
        HashTable::size(self)
    }

    fn get(&self, key: &Value) -> Result<Option<&Value>> {
        HashTable::get(self, key)
    }

    fn set(&mut self, key: Value, value: Value) -> Result<()> {
        HashTable::set(self, key, value)
    }

    fn remove(&mut self, key: &Value) -> Result<Option<(Value, Value)>> {
        HashTable::remove(self, key)
    }

    fn clear(&mut self) {
        HashTable::clear(self);
    }

    fn iterator(&self) -> Box<dyn ValueIterator> {
        Box::new(HashTable::iterator(self))
    }
}

/// Snapshot iterator over a [`HashTable`], yielding `(key, value)` pairs.
pub struct HashTableIterator {
    buckets: Rc<Buckets>,
    bucket: usize,
    slot: usize,
    current: Option<Value>,
}

impl HashTableIterator {
    /// Position of the next live entry at or after the cursor.
    fn peek(&self) -> Option<(usize, usize)> {
        let mut bucket = self.bucket;
        let mut slot = self.slot;
        while let Some(chain) = self.buckets.get(bucket) {
            if slot < chain.len() {
                return Some((bucket, slot));
            }
            bucket += 1;
            slot = 0;
        }
        None
    }
}

impl ValueIterator for HashTableIterator {
    fn has_next(&self) -> bool {
        self.peek().is_some()
    }

    fn next(&mut self) -> Result<&Value> {
        let (bucket, slot) = self.peek().ok_or(Error::Exhausted)?;
        let entry = &self.buckets[bucket][slot];
        let pair = Value::pair(entry.key.clone(), entry.value.clone());

        self.bucket = bucket;
        self.slot = slot + 1;
        Ok(self.current.insert(pair))
    }
}
