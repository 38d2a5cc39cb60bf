//! Cursor over an encoded byte buffer.
//!
//! [`Parser`] keeps a position into a borrowed slice and exposes bounds-checked,
//! advancing reads of big-endian integers, raw byte runs and UTF-8 strings. Every read
//! either succeeds and moves the cursor or fails with [`crate::Error::OutOfBounds`] and
//! leaves it where it was.

use crate::{
    codec::io::{read_be_at, WireIO},
    Error::OutOfBounds,
    Result,
};

/// A position-tracking reader over a byte slice.
///
/// # Examples
///
/// ```rust
/// use asval::codec::Parser;
///
/// let data = [0xa2, b'h', b'i', 0x00, 0x2a];
/// let mut parser = Parser::new(&data);
///
/// assert_eq!(parser.read_be::<u8>()?, 0xa2);
/// assert_eq!(parser.read_string_utf8(2)?, "hi");
/// assert_eq!(parser.read_be::<u16>()?, 42);
/// assert!(!parser.has_more_data());
/// # Ok::<(), asval::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if unread bytes remain.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Current offset into the buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Returns the next byte without consuming it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the buffer.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data.get(self.position).copied().ok_or(OutOfBounds)
    }

    /// Reads a big-endian `T` and advances past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
    pub fn read_be<T: WireIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Fails unless at least `needed` bytes remain.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `needed` bytes remain.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(OutOfBounds);
        }
        Ok(())
    }

    fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self.position.checked_add(length).ok_or(OutOfBounds)?;
        if end > self.data.len() {
            return Err(OutOfBounds);
        }
        Ok(end)
    }

    /// Reads `length` raw bytes, borrowing them from the buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Reads `length` bytes as a UTF-8 string.
    ///
    /// # Errors
    /// - [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain
    /// - [`crate::Error::Malformed`] if the bytes are not valid UTF-8; the cursor is not moved
    pub fn read_string_utf8(&mut self, length: usize) -> Result<&'a str> {
        let end = self.calc_end_position(length)?;
        let text = std::str::from_utf8(&self.data[self.position..end])
            .map_err(|e| malformed_error!("Invalid UTF-8 at offset {} - {}", self.position, e))?;
        self.position = end;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_sequential_reads() {
        let data = [0x01, 0x00, 0x02, 0xff, 0xff, 0xff, 0xfe];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.len(), 7);

        assert_eq!(parser.read_be::<u8>().unwrap(), 1);
        assert_eq!(parser.read_be::<u16>().unwrap(), 2);
        assert_eq!(parser.read_be::<i32>().unwrap(), -2);
        assert_eq!(parser.pos(), 7);
        assert_eq!(parser.remaining(), 0);
        assert!(matches!(parser.read_be::<u8>(), Err(Error::OutOfBounds)));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut parser = Parser::new(&[0x42, 0x43]);
        assert_eq!(parser.peek_byte().unwrap(), 0x42);
        assert_eq!(parser.peek_byte().unwrap(), 0x42);
        assert_eq!(parser.read_be::<u8>().unwrap(), 0x42);
        assert_eq!(parser.peek_byte().unwrap(), 0x43);

        let empty = Parser::new(&[]);
        assert!(empty.is_empty());
        assert!(empty.peek_byte().is_err());
    }

    #[test]
    fn test_read_bytes_bounds() {
        let data = [1, 2, 3, 4];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert!(parser.ensure_remaining(1).is_ok());
        assert!(parser.ensure_remaining(2).is_err());
        assert!(matches!(parser.read_bytes(2), Err(Error::OutOfBounds)));
        assert_eq!(parser.pos(), 3);
        assert!(parser.read_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_read_string_utf8() {
        let data = "héllo".as_bytes();
        let mut parser = Parser::new(data);
        assert_eq!(parser.read_string_utf8(data.len()).unwrap(), "héllo");

        let invalid = [0x61, 0xc3, 0x28];
        let mut parser = Parser::new(&invalid);
        assert!(matches!(
            parser.read_string_utf8(3),
            Err(Error::Malformed { .. })
        ));
        assert_eq!(parser.pos(), 0);
    }
}
