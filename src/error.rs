use std::collections::TryReserveError;

use thiserror::Error;

use crate::types::ValueType;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors are always local to the operation that detected them and are handed back to the
/// immediate caller; none are retried or swallowed.
///
/// # Error Categories
///
/// ## Resource Errors
/// - [`Error::Allocation`] - A container could not reserve memory for its storage
///
/// ## Misuse Errors
/// - [`Error::TypeMismatch`] - A value was accessed as the wrong type
/// - [`Error::KeyNotHashable`] - A container value was used as a map key
/// - [`Error::Exhausted`] - An iterator was advanced past its last element
/// - [`Error::ContainerBusy`] - A container was mutated while a borrow of it was alive
/// - [`Error::NotSupported`] - The container backend does not provide the operation
///
/// ## Codec Errors
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::OutOfBounds`] - The input ended in the middle of a value
/// - [`Error::Malformed`] - The input is not valid for the value encoding
/// - [`Error::RecursionLimit`] - Values are nested deeper than allowed
///
/// Not-found is not an error: lookups return `Option`.
///
/// # Examples
///
/// ```rust
/// use asval::{Error, Value};
///
/// let value = Value::string_from("a");
/// match value.as_integer() {
///     Ok(number) => println!("integer {}", number),
///     Err(Error::TypeMismatch { expected, found }) => {
///         println!("expected {}, found {}", expected, found);
///     }
///     Err(e) => println!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Memory for a container could not be reserved.
    ///
    /// Raised instead of producing a partially built container, for example when a
    /// capacity hint or a length read from encoded input is too large to satisfy.
    #[error("Allocation failed - {0}")]
    Allocation(#[from] TryReserveError),

    /// A typed accessor was called on a value of a different type.
    ///
    /// Payloads are never reinterpreted; the accessor fails instead.
    #[error("Type mismatch - expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the caller asked for
        expected: ValueType,
        /// The type the value actually has
        found: ValueType,
    },

    /// A value of this type has no hash and can not be a map key.
    #[error("Values of type {0} can not be used as map keys")]
    KeyNotHashable(ValueType),

    /// `next()` was called on an iterator without remaining elements.
    #[error("Iterator is exhausted")]
    Exhausted,

    /// The container is currently borrowed and can not be mutated.
    ///
    /// Occurs when a value obtained from `Map::get` is still held while the same
    /// map is modified through any of its interface handles.
    #[error("Container is borrowed and can not be modified")]
    ContainerBusy,

    /// The operation or encoding is not supported.
    #[error("This operation is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// An out of bound access was attempted while decoding.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The input is damaged and could not be decoded.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Recursion limit reached.
    ///
    /// The associated value shows the nesting limit that was exceeded.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
