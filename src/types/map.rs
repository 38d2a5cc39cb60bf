//! Backend-agnostic map interface.
//!
//! [`MapLike`] is the operation set every associative container provides, and [`Map`]
//! is the handle callers hold: it binds one concrete container behind that fixed API,
//! so code written against `Map` works unchanged whichever backend sits underneath.
//!
//! A `Map` is a shared view. Cloning it (or the [`Value::Map`] holding it) produces
//! another handle to the same container, and a change made through one handle is seen
//! through all of them. Handles are single-threaded.
//!
//! # Examples
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use asval::{HashTable, Map, Value};
//!
//! // The caller keeps its own handle to the table
//! let table = Rc::new(RefCell::new(HashTable::new(10)?));
//! let map = Map::new(Rc::clone(&table));
//!
//! map.set(Value::string_from("a"), Value::integer(1))?;
//! assert_eq!(table.borrow().size(), 1);
//! assert_eq!(map.get(&Value::string_from("a"))?.unwrap().as_integer()?, 1);
//!
//! map.destroy()?;
//! assert_eq!(table.borrow().size(), 1);
//! # Ok::<(), asval::Error>(())
//! ```

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::Rc,
};

use log::trace;

use crate::{
    types::{hashmap::HashTable, iterator::ValueIterator},
    Error, Result, Value,
};

/// Operation set of an associative container.
///
/// Implementations keep at most one entry per key (under [`Value`] equality) and own
/// one reference to each stored key and value.
pub trait MapLike {
    /// Number of entries.
    fn size(&self) -> usize;

    /// Borrows the value stored for `key`.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] if `key` can not be a map key.
    fn get(&self, key: &Value) -> Result<Option<&Value>>;

    /// Stores `value` under `key`, consuming both and replacing an existing entry.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] or [`Error::Allocation`].
    fn set(&mut self, key: Value, value: Value) -> Result<()>;

    /// Removes the entry for `key` and returns it.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] if `key` can not be a map key.
    fn remove(&mut self, key: &Value) -> Result<Option<(Value, Value)>>;

    /// Releases every entry.
    fn clear(&mut self);

    /// Creates an iterator yielding a [`Value::Pair`] per entry.
    fn iterator(&self) -> Box<dyn ValueIterator>;
}

/// Handle to any [`MapLike`] container.
#[derive(Clone)]
pub struct Map {
    backend: Rc<RefCell<dyn MapLike>>,
    owned: bool,
}

impl Map {
    /// Binds a container that the caller continues to own.
    ///
    /// [`Map::destroy`] on this handle leaves the container untouched.
    pub fn new<M: MapLike + 'static>(backend: Rc<RefCell<M>>) -> Self {
        Map {
            backend,
            owned: false,
        }
    }

    /// Binds a container and takes ownership of it.
    ///
    /// [`Map::destroy`] on this handle clears the container.
    pub fn owned<M: MapLike + 'static>(backend: M) -> Self {
        Map {
            backend: Rc::new(RefCell::new(backend)),
            owned: true,
        }
    }

    /// Creates an owning handle over a new [`HashTable`] with `capacity` buckets.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the table can not be allocated.
    pub fn hashmap(capacity: usize) -> Result<Self> {
        Ok(Map::owned(HashTable::new(capacity)?))
    }

    /// Returns `true` if this handle owns its container.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.owned
    }

    /// Returns `true` if both handles are bound to the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Map) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.backend), Rc::as_ptr(&other.backend))
    }

    /// Number of handles currently bound to the container.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.backend)
    }

    /// Number of entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.backend.borrow().size()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Borrows the value stored for `key`.
    ///
    /// The returned guard keeps the container borrowed; mutating the map through any
    /// handle while it is alive fails with [`Error::ContainerBusy`].
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] if `key` can not be a map key.
    pub fn get(&self, key: &Value) -> Result<Option<Ref<'_, Value>>> {
        key.hash_code()?;
        let backend = self.backend.borrow();
        Ok(Ref::filter_map(backend, |map| map.get(key).ok().flatten()).ok())
    }

    /// Returns a new reference to the value stored for `key`.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] if `key` can not be a map key.
    pub fn get_cloned(&self, key: &Value) -> Result<Option<Value>> {
        Ok(self.backend.borrow().get(key)?.cloned())
    }

    /// Stores `value` under `key`, consuming both.
    ///
    /// # Errors
    /// - [`Error::ContainerBusy`] if a value returned by [`Map::get`] is still held
    /// - [`Error::KeyNotHashable`] or [`Error::Allocation`] from the backend
    pub fn set(&self, key: Value, value: Value) -> Result<()> {
        self.backend
            .try_borrow_mut()
            .map_err(|_| Error::ContainerBusy)?
            .set(key, value)
    }

    /// Removes the entry for `key` and returns it.
    ///
    /// # Errors
    /// - [`Error::ContainerBusy`] if a value returned by [`Map::get`] is still held
    /// - [`Error::KeyNotHashable`] if `key` can not be a map key
    pub fn remove(&self, key: &Value) -> Result<Option<(Value, Value)>> {
        self.backend
            .try_borrow_mut()
            .map_err(|_| Error::ContainerBusy)?
            .remove(key)
    }

    /// Releases every entry of the container.
    ///
    /// # Errors
    /// Returns [`Error::ContainerBusy`] if a value returned by [`Map::get`] is still held.
    pub fn clear(&self) -> Result<()> {
        self.backend
            .try_borrow_mut()
            .map_err(|_| Error::ContainerBusy)?
            .clear();
        Ok(())
    }

    /// Creates an iterator yielding a [`Value::Pair`] per entry.
    #[must_use]
    pub fn iterator(&self) -> Box<dyn ValueIterator> {
        self.backend.borrow().iterator()
    }

    /// Releases this handle.
    ///
    /// An owning handle clears the container first, which every other handle to it
    /// observes. A non-owning handle leaves the container as it is.
    ///
    /// # Errors
    /// Returns [`Error::ContainerBusy`] if an owning handle finds a value returned by
    /// [`Map::get`] still held; the container is left untouched.
    pub fn destroy(self) -> Result<()> {
        if self.owned {
            trace!("destroying owning map handle");
            self.backend
                .try_borrow_mut()
                .map_err(|_| Error::ContainerBusy)?
                .clear();
        }
        Ok(())
    }
}

impl From<HashTable> for Map {
    fn from(table: HashTable) -> Self {
        Map::owned(table)
    }
}

impl Map {
    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let mut iterator = self.iterator();
        write!(f, "{{")?;
        let mut first = true;
        while iterator.has_next() {
            let Ok(Value::Pair(pair)) = iterator.next() else {
                break;
            };
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            pair.first().render(f, depth)?;
            write!(f, ": ")?;
            pair.second().render(f, depth)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 1)
    }
}
