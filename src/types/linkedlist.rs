//! Singly linked list grown by prepending.
//!
//! Each node holds one reference to its value and a link to the node that was the
//! head before it. Building a list from `1, 2, 3` therefore iterates as `3, 2, 1`.
//!
//! Nodes are immutable once linked and are shared between lists: [`LinkedList::cons`]
//! and [`LinkedList::tail`] reuse the existing chain rather than copying it, which is
//! also what lets iterators walk the chain without borrowing the list.

use std::rc::Rc;

use crate::{
    types::{iterator::ValueIterator, list::ListLike},
    Error, Result, Value,
};

struct Node {
    value: Value,
    next: Option<Rc<Node>>,
}

impl Drop for Node {
    fn drop(&mut self) {
        // Unlink iteratively; nodes still shared elsewhere stay alive
        let mut next = self.next.take();
        while let Some(node) = next {
            next = match Rc::try_unwrap(node) {
                Ok(mut node) => node.next.take(),
                Err(_) => None,
            };
        }
    }
}

/// Prepend-built singly linked list.
#[derive(Clone, Default)]
pub struct LinkedList {
    head: Option<Rc<Node>>,
}

impl LinkedList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        LinkedList { head: None }
    }

    /// Creates the list `value, tail...`, consuming `value` and sharing `tail`'s chain.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use asval::{LinkedList, Value};
    ///
    /// let tail = LinkedList::cons(Value::integer(1), LinkedList::new());
    /// let tail = LinkedList::cons(Value::integer(2), tail);
    /// let list = LinkedList::cons(Value::integer(3), tail);
    ///
    /// let values: Vec<i64> = list.iter().map(|v| v.as_integer().unwrap()).collect();
    /// assert_eq!(values, vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn cons(value: Value, tail: LinkedList) -> Self {
        let mut list = tail;
        list.prepend(value);
        list
    }

    /// Makes `value` the new head, consuming it.
    pub fn prepend(&mut self, value: Value) {
        let next = self.head.take();
        self.head = Some(Rc::new(Node { value, next }));
    }

    /// The most recently prepended value.
    #[must_use]
    pub fn head(&self) -> Option<&Value> {
        self.head.as_ref().map(|node| &node.value)
    }

    /// The list without its head, sharing the remaining chain.
    #[must_use]
    pub fn tail(&self) -> LinkedList {
        LinkedList {
            head: self.head.as_ref().and_then(|node| node.next.clone()),
        }
    }

    /// Length of the chain.
    #[must_use]
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if the list has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Borrowing iterator from the head towards the tail.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        let mut node = self.head.as_deref();
        std::iter::from_fn(move || {
            let current = node?;
            node = current.next.as_deref();
            Some(&current.value)
        })
    }

    /// Creates a protocol iterator from the head towards the tail.
    #[must_use]
    pub fn iterator(&self) -> LinkedListIterator {
        LinkedListIterator {
            next: self.head.clone(),
            current: None,
        }
    }
}

impl ListLike for LinkedList {
    fn size(&self) -> usize {
        LinkedList::size(self)
    }

    fn iterator(&self) -> Box<dyn ValueIterator> {
        Box::new(LinkedList::iterator(self))
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.iter().nth(index)
    }

    fn clear(&mut self) {
        self.head = None;
    }

    fn prepend(&mut self, value: Value) -> Result<()> {
        LinkedList::prepend(self, value);
        Ok(())
    }
}

/// Iterator over a [`LinkedList`], yielding the held values.
pub struct LinkedListIterator {
    next: Option<Rc<Node>>,
    current: Option<Rc<Node>>,
}

impl ValueIterator for LinkedListIterator {
    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn next(&mut self) -> Result<&Value> {
        let node = self.next.take().ok_or(Error::Exhausted)?;
        self.next = node.next.clone();
        Ok(&self.current.insert(node).value)
    }
}
