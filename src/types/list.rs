//! Backend-agnostic list interface.
//!
//! [`ListLike`] is the operation set of a sequential container and [`List`] the handle
//! binding one concrete backend behind it. Only `size`, `iterator` and `clear` are
//! required of a backend; positional access and growth are optional and report
//! [`Error::NotSupported`] when a backend can not provide them.
//!
//! # Examples
//!
//! ```rust
//! use asval::{LinkedList, List, Value, ValueIterator};
//!
//! let mut chain = LinkedList::new();
//! chain.prepend(Value::integer(1));
//! chain.prepend(Value::integer(2));
//!
//! let list = List::owned(chain);
//! assert_eq!(list.size(), 2);
//!
//! let mut iterator = list.iterator();
//! assert_eq!(iterator.next()?.as_integer()?, 2);
//! assert_eq!(iterator.next()?.as_integer()?, 1);
//! assert!(!iterator.has_next());
//! # Ok::<(), asval::Error>(())
//! ```

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::Rc,
};

use log::trace;

use crate::{
    types::{arraylist::ArrayList, iterator::ValueIterator, linkedlist::LinkedList},
    Error, Result, Value,
};

/// Operation set of a sequential container.
pub trait ListLike {
    /// Number of elements.
    fn size(&self) -> usize;

    /// Creates an iterator yielding the elements in list order.
    fn iterator(&self) -> Box<dyn ValueIterator>;

    /// Releases every element.
    fn clear(&mut self);

    /// Borrows the element at `index`.
    fn get(&self, _index: usize) -> Option<&Value> {
        None
    }

    /// Adds `value` after the last element.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] unless the backend can grow at its end.
    fn append(&mut self, _value: Value) -> Result<()> {
        Err(Error::NotSupported)
    }

    /// Adds `value` before the first element.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] unless the backend can grow at its front.
    fn prepend(&mut self, _value: Value) -> Result<()> {
        Err(Error::NotSupported)
    }
}

/// Handle to any [`ListLike`] container.
///
/// Clones share the same container.
#[derive(Clone)]
pub struct List {
    backend: Rc<RefCell<dyn ListLike>>,
    owned: bool,
}

impl List {
    /// Binds a container that the caller continues to own.
    pub fn new<L: ListLike + 'static>(backend: Rc<RefCell<L>>) -> Self {
        List {
            backend,
            owned: false,
        }
    }

    /// Binds a container and takes ownership of it.
    pub fn owned<L: ListLike + 'static>(backend: L) -> Self {
        List {
            backend: Rc::new(RefCell::new(backend)),
            owned: true,
        }
    }

    /// Returns `true` if this handle owns its container.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.owned
    }

    /// Returns `true` if both handles are bound to the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &List) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.backend), Rc::as_ptr(&other.backend))
    }

    /// Number of handles currently bound to the container.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.backend)
    }

    /// Number of elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.backend.borrow().size()
    }

    /// Returns `true` if the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Borrows the element at `index`, if the backend supports positional access.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Ref<'_, Value>> {
        Ref::filter_map(self.backend.borrow(), |list| list.get(index)).ok()
    }

    /// Adds `value` after the last element.
    ///
    /// # Errors
    /// - [`Error::ContainerBusy`] if a value returned by [`List::get`] is still held
    /// - [`Error::NotSupported`] if the backend can not grow at its end
    pub fn append(&self, value: Value) -> Result<()> {
        self.backend
            .try_borrow_mut()
            .map_err(|_| Error::ContainerBusy)?
            .append(value)
    }

    /// Adds `value` before the first element.
    ///
    /// # Errors
    /// - [`Error::ContainerBusy`] if a value returned by [`List::get`] is still held
    /// - [`Error::NotSupported`] if the backend can not grow at its front
    pub fn prepend(&self, value: Value) -> Result<()> {
        self.backend
            .try_borrow_mut()
            .map_err(|_| Error::ContainerBusy)?
            .prepend(value)
    }

    /// Creates an iterator yielding the elements in list order.
    #[must_use]
    pub fn iterator(&self) -> Box<dyn ValueIterator> {
        self.backend.borrow().iterator()
    }

    /// Releases this handle.
    ///
    /// An owning handle releases every element first, which every other handle to the
    /// container observes. A non-owning handle leaves the container as it is.
    ///
    /// # Errors
    /// Returns [`Error::ContainerBusy`] if an owning handle finds a value returned by
    /// [`List::get`] still held; the container is left untouched.
    pub fn destroy(self) -> Result<()> {
        if self.owned {
            trace!("destroying owning list handle");
            self.backend
                .try_borrow_mut()
                .map_err(|_| Error::ContainerBusy)?
                .clear();
        }
        Ok(())
    }
}

impl From<LinkedList> for List {
    fn from(list: LinkedList) -> Self {
        List::owned(list)
    }
}

impl From<ArrayList> for List {
    fn from(list: ArrayList) -> Self {
        List::owned(list)
    }
}

impl List {
    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let mut iterator = self.iterator();
        write!(f, "[")?;
        let mut first = true;
        while iterator.has_next() {
            let Ok(value) = iterator.next() else {
                break;
            };
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            value.render(f, depth)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backends_behind_one_interface() {
        let mut chain = LinkedList::new();
        let mut array = ArrayList::new();
        for i in 1..=3 {
            chain.prepend(Value::integer(i));
            array.append(Value::integer(i)).unwrap();
        }

        let lists = [List::from(chain), List::from(array)];
        let orders: Vec<Vec<i64>> = lists
            .iter()
            .map(|list| {
                assert_eq!(list.size(), 3);
                list.iterator()
                    .remaining()
                    .unwrap()
                    .iter()
                    .map(|v| v.as_integer().unwrap())
                    .collect()
            })
            .collect();

        assert_eq!(orders[0], vec![3, 2, 1]);
        assert_eq!(orders[1], vec![1, 2, 3]);
    }

    #[test]
    fn test_unsupported_operations() {
        let list = List::owned(LinkedList::new());
        assert!(matches!(
            list.append(Value::integer(1)),
            Err(Error::NotSupported)
        ));
        list.prepend(Value::integer(1)).unwrap();
        assert_eq!(list.size(), 1);
    }

    #[test]
    fn test_view_shares_backend() {
        let array = Rc::new(RefCell::new(ArrayList::new()));
        let list = List::new(Rc::clone(&array));
        assert!(!list.is_owner());

        list.append("x".into()).unwrap();
        assert_eq!(array.borrow().size(), 1);
        assert_eq!(list.get(0).unwrap().as_str().unwrap(), "x");
        assert!(list.get(1).is_none());
        list.destroy().unwrap();
        assert_eq!(array.borrow().size(), 1);
    }

    #[test]
    fn test_owned_destroy_releases_elements() {
        let member = Value::string_from("member");
        let list = List::owned(LinkedList::new());
        list.prepend(member.clone()).unwrap();
        let view = list.clone();
        assert_eq!(member.ref_count(), Some(2));

        let held = list.get(0).unwrap();
        assert!(matches!(list.clone().destroy(), Err(Error::ContainerBusy)));
        drop(held);
        assert_eq!(view.size(), 1);

        list.destroy().unwrap();
        assert_eq!(view.size(), 0);
        assert_eq!(member.ref_count(), Some(1));
    }

    #[test]
    fn test_display_self_referencing_list() {
        let list = List::owned(ArrayList::new());
        list.append(Value::List(list.clone())).unwrap();

        let rendered = list.to_string();
        assert!(rendered.starts_with("[[["));
        assert!(rendered.ends_with("...]]]"));

        list.clone().destroy().unwrap();
        assert_eq!(list.size(), 0);
    }

    #[test]
    fn test_append_while_borrowed() {
        let list = List::owned(ArrayList::new());
        list.append(Value::integer(1)).unwrap();
        let held = list.get(0).unwrap();
        assert!(matches!(
            list.append(Value::integer(2)),
            Err(Error::ContainerBusy)
        ));
        drop(held);
        list.append(Value::integer(2)).unwrap();
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn test_list_as_value() {
        let list = List::owned(ArrayList::new());
        let value = Value::from(list.clone());
        assert!(value.as_list().unwrap().ptr_eq(&list));
        assert_eq!(value.ref_count(), Some(2));
        assert_eq!(value.to_string(), "[]");

        list.append(Value::integer(1)).unwrap();
        list.append("two".into()).unwrap();
        assert_eq!(value.to_string(), "[1, \"two\"]");
    }
}
