//! The tagged, reference-counted value.
//!
//! [`Value`] is a closed sum type over the seven value tags. Heap payloads (strings,
//! blobs, pairs, lists and maps) are shared through [`Rc`], which gives every value the
//! reference-counting contract of the runtime:
//!
//! - a freshly constructed value holds exactly one reference,
//! - [`Clone`] takes another reference to the same payload (no copy),
//! - dropping a value releases one reference, and the payload is destroyed exactly once,
//!   together with every value it owns, when the last reference goes.
//!
//! Releasing a value twice is impossible: a dropped value can not be used again.
//!
//! # Ownership at the API boundary
//!
//! Operations taking a `Value` by value consume one reference (the caller clones first
//! to keep using it). Operations taking `&Value` only borrow it.
//!
//! # Examples
//!
//! ```rust
//! use asval::Value;
//!
//! let a = Value::string_from("a");
//! assert_eq!(a.ref_count(), Some(1));
//!
//! let shared = a.clone();
//! assert_eq!(a.ref_count(), Some(2));
//! assert!(shared.ptr_eq(&a));
//!
//! drop(shared);
//! assert_eq!(a.ref_count(), Some(1));
//! ```

use std::{fmt, rc::Rc};

use crate::{
    types::{
        list::List,
        map::Map,
        valuetype::{hash_bytes, hash_integer, ValueType},
    },
    Error, Result,
};

/// Runtime value.
///
/// See the [module documentation](self) for the reference-counting contract.
#[derive(Clone, Default)]
pub enum Value {
    /// The "no value" singleton.
    ///
    /// Distinct from the absence of a key: a map can hold `Nil` as a value. It has no
    /// payload, so taking or releasing references to it never does anything.
    #[default]
    Nil,

    /// 64-bit signed integer.
    Integer(i64),

    /// UTF-8 string, compared and hashed by content.
    String(Rc<String>),

    /// Byte sequence with explicit length, compared and hashed by content.
    Blob(Rc<Vec<u8>>),

    /// Key/value tuple, as produced by map iteration.
    Pair(Rc<Pair>),

    /// Handle to a sequential container, compared by identity.
    List(List),

    /// Handle to an associative container, compared by identity.
    Map(Map),
}

/// Immutable 2-tuple of values.
///
/// Map iteration yields each entry as a pair of `(key, value)`.
pub struct Pair {
    first: Value,
    second: Value,
}

impl Pair {
    /// The first member (the key, for map iteration results).
    #[must_use]
    pub fn first(&self) -> &Value {
        &self.first
    }

    /// The second member (the value, for map iteration results).
    #[must_use]
    pub fn second(&self) -> &Value {
        &self.second
    }
}

impl Value {
    /// The shared `Nil` value.
    pub const NIL: Value = Value::Nil;

    /// Creates an integer value.
    #[must_use]
    pub fn integer(value: i64) -> Value {
        Value::Integer(value)
    }

    /// Creates a string value taking ownership of `value`.
    ///
    /// The string's heap buffer moves into the value without being copied.
    #[must_use]
    pub fn string(value: String) -> Value {
        Value::String(Rc::new(value))
    }

    /// Creates a string value holding a copy of `value`.
    #[must_use]
    pub fn string_from(value: &str) -> Value {
        Value::string(value.to_owned())
    }

    /// Creates a blob value taking ownership of `value` without copying.
    #[must_use]
    pub fn bytes(value: Vec<u8>) -> Value {
        Value::Blob(Rc::new(value))
    }

    /// Creates a blob value holding a copy of `value`.
    #[must_use]
    pub fn bytes_from(value: &[u8]) -> Value {
        Value::bytes(value.to_vec())
    }

    /// Creates a pair, consuming one reference of each member.
    #[must_use]
    pub fn pair(first: Value, second: Value) -> Value {
        Value::Pair(Rc::new(Pair { first, second }))
    }

    /// Returns the tag of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Integer(_) => ValueType::Integer,
            Value::String(_) => ValueType::String,
            Value::Blob(_) => ValueType::Blob,
            Value::Pair(_) => ValueType::Pair,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
        }
    }

    /// Returns `true` if this is the `Nil` value.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Number of live references to the payload of this value.
    ///
    /// Returns `None` for values without a shared payload (`Nil` and integers), whose
    /// references are free to take and release.
    #[must_use]
    pub fn ref_count(&self) -> Option<usize> {
        match self {
            Value::Nil | Value::Integer(_) => None,
            Value::String(s) => Some(Rc::strong_count(s)),
            Value::Blob(b) => Some(Rc::strong_count(b)),
            Value::Pair(p) => Some(Rc::strong_count(p)),
            Value::List(l) => Some(l.handle_count()),
            Value::Map(m) => Some(m.handle_count()),
        }
    }

    /// Returns `true` if both values refer to the same payload.
    ///
    /// `Nil` is identical to itself; integers are identical when equal.
    #[must_use]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Blob(a), Value::Blob(b)) => Rc::ptr_eq(a, b),
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Hash of this value, as used for map bucket selection.
    ///
    /// Equal values always hash identically.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotHashable`] for pairs, lists and maps.
    pub fn hash_code(&self) -> Result<u32> {
        match self {
            Value::Nil => Ok(0),
            Value::Integer(i) => Ok(hash_integer(*i)),
            Value::String(s) => Ok(hash_bytes(s.as_bytes())),
            Value::Blob(b) => Ok(hash_bytes(b)),
            Value::Pair(_) | Value::List(_) | Value::Map(_) => {
                Err(Error::KeyNotHashable(self.value_type()))
            }
        }
    }

    fn mismatch(&self, expected: ValueType) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.value_type(),
        }
    }

    /// Returns the integer payload.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if this is not an integer.
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(self.mismatch(ValueType::Integer)),
        }
    }

    /// Returns the string payload.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if this is not a string.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s.as_str()),
            _ => Err(self.mismatch(ValueType::String)),
        }
    }

    /// Returns the blob payload.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if this is not a blob.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Value::Blob(b) => Ok(b.as_slice()),
            _ => Err(self.mismatch(ValueType::Blob)),
        }
    }

    /// Returns the pair payload.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if this is not a pair.
    pub fn as_pair(&self) -> Result<&Pair> {
        match self {
            Value::Pair(p) => Ok(p),
            _ => Err(self.mismatch(ValueType::Pair)),
        }
    }

    /// Returns the list handle.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if this is not a list.
    pub fn as_list(&self) -> Result<&List> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(self.mismatch(ValueType::List)),
        }
    }

    /// Returns the map handle.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if this is not a map.
    pub fn as_map(&self) -> Result<&Map> {
        match self {
            Value::Map(m) => Ok(m),
            _ => Err(self.mismatch(ValueType::Map)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let tag = self.value_type();
        if tag != other.value_type() {
            return false;
        }
        if !tag.compares_content() {
            return self.ptr_eq(other);
        }
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => {
                Rc::ptr_eq(a, b) || (a.first == b.first && a.second == b.second)
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string_from(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::bytes(value)
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

/// Containers nested deeper than this render as `...`.
const DISPLAY_DEPTH: usize = 32;

impl Value {
    /// Writes this value as the `depth`-th nested container level.
    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if self.value_type().is_container() && depth >= DISPLAY_DEPTH {
            return f.write_str("...");
        }
        match self {
            Value::Nil => write!(f, "NIL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Blob(b) => {
                write!(f, "<")?;
                for byte in b.iter() {
                    write!(f, "{byte:02x}")?;
                }
                write!(f, ">")
            }
            Value::Pair(p) => {
                write!(f, "(")?;
                p.first.render(f, depth + 1)?;
                write!(f, ", ")?;
                p.second.render(f, depth + 1)?;
                write!(f, ")")
            }
            Value::List(l) => l.render(f, depth + 1),
            Value::Map(m) => m.render(f, depth + 1),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Value::String(s) => f.debug_tuple("String").field(&s.as_str()).finish(),
            Value::Blob(b) => f.debug_tuple("Blob").field(&b.as_slice()).finish(),
            Value::Pair(p) => f
                .debug_tuple("Pair")
                .field(&p.first)
                .field(&p.second)
                .finish(),
            Value::List(l) => f.debug_tuple("List").field(&l.size()).finish(),
            Value::Map(m) => f.debug_tuple("Map").field(&m.size()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_and_tags() {
        assert_eq!(Value::NIL.value_type(), ValueType::Nil);
        assert_eq!(Value::integer(5).value_type(), ValueType::Integer);
        assert_eq!(Value::string_from("x").value_type(), ValueType::String);
        assert_eq!(Value::bytes(vec![1, 2]).value_type(), ValueType::Blob);
        assert_eq!(
            Value::pair(Value::integer(1), Value::NIL).value_type(),
            ValueType::Pair
        );
    }

    #[test]
    fn test_string_transfer_does_not_copy() {
        let owned = String::from("transferred");
        let buffer = owned.as_ptr();
        let value = Value::string(owned);
        assert_eq!(value.as_str().unwrap().as_ptr(), buffer);

        let bytes = vec![1_u8, 2, 3];
        let buffer = bytes.as_ptr();
        let value = Value::bytes(bytes);
        assert_eq!(value.as_bytes().unwrap().as_ptr(), buffer);
    }

    #[test]
    fn test_string_from_copies() {
        let source = "copied";
        let value = Value::string_from(source);
        assert_ne!(value.as_str().unwrap().as_ptr(), source.as_ptr());
        assert_eq!(value.as_str().unwrap(), source);
    }

    #[test]
    fn test_ref_counting() {
        let value = Value::bytes_from(b"abc");
        assert_eq!(value.ref_count(), Some(1));

        let second = value.clone();
        let third = second.clone();
        assert_eq!(value.ref_count(), Some(3));
        assert!(third.ptr_eq(&value));

        drop(second);
        drop(third);
        assert_eq!(value.ref_count(), Some(1));
    }

    #[test]
    fn test_nil_refcount_is_inert() {
        let nil = Value::NIL;
        let copies: Vec<Value> = (0..10).map(|_| nil.clone()).collect();
        assert_eq!(nil.ref_count(), None);
        drop(copies);
        assert!(nil.is_nil());
        assert_eq!(nil, Value::Nil);
    }

    #[test]
    fn test_pair_release_releases_members() {
        let key = Value::string_from("k");
        let value = Value::bytes_from(b"v");

        let pair = Value::pair(key.clone(), value.clone());
        assert_eq!(key.ref_count(), Some(2));
        assert_eq!(value.ref_count(), Some(2));

        let p = pair.as_pair().unwrap();
        assert_eq!(p.first(), &key);
        assert_eq!(p.second(), &value);

        drop(pair);
        assert_eq!(key.ref_count(), Some(1));
        assert_eq!(value.ref_count(), Some(1));
    }

    #[test]
    fn test_equality_is_content_based() {
        assert_eq!(Value::string_from("a"), Value::string(String::from("a")));
        assert_ne!(Value::string_from("a"), Value::string_from("b"));
        assert_eq!(Value::bytes_from(b"a"), Value::bytes(vec![b'a']));
        assert_ne!(Value::string_from("a"), Value::bytes_from(b"a"));
        assert_eq!(Value::integer(7), Value::from(7_i64));
        assert_ne!(Value::integer(0), Value::NIL);
        assert_eq!(
            Value::pair(Value::integer(1), "x".into()),
            Value::pair(Value::integer(1), "x".into())
        );
    }

    #[test]
    fn test_hash_consistent_with_equality() {
        let a = Value::string_from("key");
        let b = Value::string(String::from("key"));
        assert_eq!(a, b);
        assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());

        assert_eq!(
            Value::integer(-42).hash_code().unwrap(),
            Value::integer(-42).hash_code().unwrap()
        );
        assert_eq!(Value::NIL.hash_code().unwrap(), 0);
    }

    #[test]
    fn test_container_values_not_hashable() {
        let pair = Value::pair(Value::NIL, Value::NIL);
        assert!(matches!(
            pair.hash_code(),
            Err(Error::KeyNotHashable(ValueType::Pair))
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let value = Value::string_from("1");
        match value.as_integer() {
            Err(Error::TypeMismatch { expected, found }) => {
                assert_eq!(expected, ValueType::Integer);
                assert_eq!(found, ValueType::String);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(Value::integer(1).as_str().is_err());
        assert!(Value::NIL.as_bytes().is_err());
        assert!(Value::NIL.as_map().is_err());
        assert!(Value::NIL.as_list().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::NIL.to_string(), "NIL");
        assert_eq!(Value::integer(-3).to_string(), "-3");
        assert_eq!(Value::string_from("a").to_string(), "\"a\"");
        assert_eq!(Value::bytes(vec![0x0a, 0xff]).to_string(), "<0aff>");
        assert_eq!(
            Value::pair("k".into(), Value::integer(1)).to_string(),
            "(\"k\", 1)"
        );
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Value::NIL), "Nil");
        assert_eq!(format!("{:?}", Value::integer(4)), "Integer(4)");
        assert_eq!(format!("{:?}", Value::string_from("a")), "String(\"a\")");
        assert_eq!(format!("{:?}", Value::bytes(vec![1, 2])), "Blob([1, 2])");
        assert_eq!(
            format!("{:?}", Value::pair(Value::integer(1), Value::NIL)),
            "Pair(Integer(1), Nil)"
        );

        let map = Map::hashmap(4).unwrap();
        map.set(Value::integer(1), Value::integer(2)).unwrap();
        assert_eq!(format!("{:?}", Value::Map(map)), "Map(1)");
    }

    #[test]
    fn test_display_self_referencing_map() {
        let map = Map::hashmap(4).unwrap();
        map.set(Value::integer(1), Value::Map(map.clone())).unwrap();

        let rendered = Value::Map(map.clone()).to_string();
        assert!(rendered.starts_with("{1: {1: "));
        assert!(rendered.contains("..."));
        assert_eq!(rendered.matches('{').count(), DISPLAY_DEPTH);

        // Break the cycle so the map is released
        map.clear().unwrap();
    }

    #[test]
    fn test_equality_by_identity_for_containers() {
        let map = Map::hashmap(4).unwrap();
        let other = Map::hashmap(4).unwrap();
        assert_eq!(Value::Map(map.clone()), Value::Map(map.clone()));
        assert_ne!(Value::Map(map), Value::Map(other));
    }
}
