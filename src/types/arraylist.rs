//! Growable array-backed list.
//!
//! The element buffer is shared with iterators and copied on the first write after an
//! iterator was taken, so an iterator keeps seeing the elements as they were.

use std::rc::Rc;

use crate::{
    types::{iterator::ValueIterator, list::ListLike},
    Error, Result, Value,
};

/// Array-backed list supporting growth at both ends and positional access.
#[derive(Clone, Default)]
pub struct ArrayList {
    items: Rc<Vec<Value>>,
}

impl ArrayList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        ArrayList {
            items: Rc::new(Vec::new()),
        }
    }

    /// Creates an empty list with room for `capacity` elements.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the buffer can not be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(ArrayList {
            items: Rc::new(items),
        })
    }

    /// Adds `value` after the last element, consuming it.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the buffer can not grow.
    pub fn append(&mut self, value: Value) -> Result<()> {
        let items = Rc::make_mut(&mut self.items);
        items.try_reserve(1)?;
        items.push(value);
        Ok(())
    }

    /// Adds `value` before the first element, consuming it.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the buffer can not grow.
    pub fn prepend(&mut self, value: Value) -> Result<()> {
        let items = Rc::make_mut(&mut self.items);
        items.try_reserve(1)?;
        items.insert(0, value);
        Ok(())
    }

    /// Borrows the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Number of elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrowing iterator in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Creates a protocol iterator in index order over the current elements.
    #[must_use]
    pub fn iterator(&self) -> ArrayListIterator {
        ArrayListIterator {
            items: Rc::clone(&self.items),
            index: 0,
        }
    }
}

impl FromIterator<Value> for ArrayList {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        ArrayList {
            items: Rc::new(iter.into_iter().collect()),
        }
    }
}

impl ListLike for ArrayList {
    fn size(&self) -> usize {
        ArrayList::size(self)
    }

    fn iterator(&self) -> Box<dyn ValueIterator> {
        Box::new(ArrayList::iterator(self))
    }

    fn get(&self, index: usize) -> Option<&Value> {
        ArrayList::get(self, index)
    }

    fn clear(&mut self) {
        // Live iterators keep the old storage
        self.items = Rc::new(Vec::new());
    }

    fn append(&mut self, value: Value) -> Result<()> {
        ArrayList::append(self, value)
    }

    fn prepend(&mut self, value: Value) -> Result<()> {
        ArrayList::prepend(self, value)
    }
}

/// Iterator over an [`ArrayList`] snapshot.
pub struct ArrayListIterator {
    items: Rc<Vec<Value>>,
    index: usize,
}

impl ValueIterator for ArrayListIterator {
    fn has_next(&self) -> bool {
        self.index < self.items.len()
    }

    fn next(&mut self) -> Result<&Value> {
        let value = self.items.get(self.index).ok_or(Error::Exhausted)?;
        self.index += 1;
        Ok(value)
    }
}
