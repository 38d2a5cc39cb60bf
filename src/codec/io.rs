//! Big-endian primitive reading and writing for the wire codec.
//!
//! The [`WireIO`] trait gives every fixed-width integer the same conversion interface,
//! so the codec reads and writes lengths and payloads through a handful of generic,
//! bounds-checked helpers instead of hand-indexing byte buffers.
//!
//! # Examples
//!
//! ```rust
//! use asval::codec::io::{read_be_at, write_be};
//!
//! let mut out = Vec::new();
//! write_be(&mut out, 0x0102u16);
//! write_be(&mut out, -1i32);
//! assert_eq!(out, [0x01, 0x02, 0xff, 0xff, 0xff, 0xff]);
//!
//! let mut offset = 0;
//! assert_eq!(read_be_at::<u16>(&out, &mut offset)?, 0x0102);
//! assert_eq!(read_be_at::<i32>(&out, &mut offset)?, -1);
//! assert_eq!(offset, 6);
//! # Ok::<(), asval::Error>(())
//! ```

use crate::{
    Error::{self, OutOfBounds},
    Result,
};

/// Fixed-width integer with a big-endian byte representation.
pub trait WireIO: Sized + Copy {
    /// Byte array type holding the encoded form.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Decode from big-endian bytes.
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Encode as big-endian bytes.
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_wire_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_wire_io!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Reads a `T` from the start of `data`.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_be<T: WireIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0;
    read_be_at(data, &mut offset)
}

/// Reads a `T` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain; `offset`
/// is left unchanged in that case.
pub fn read_be_at<T: WireIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let end = offset.checked_add(type_len).ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(T::from_be_bytes(read))
}

/// Appends `value` to `out` in big-endian order.
pub fn write_be<T: WireIO>(out: &mut Vec<u8>, value: T) {
    out.extend_from_slice(value.to_be_bytes().as_ref());
}

/// Writes `value` into `data` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if `value` does not fit at `offset`.
pub fn write_be_at<T: WireIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let bytes = value.to_be_bytes();
    let bytes = bytes.as_ref();
    let end = offset.checked_add(bytes.len()).ok_or(Error::OutOfBounds)?;
    if end > data.len() {
        return Err(Error::OutOfBounds);
    }

    data[*offset..end].copy_from_slice(bytes);
    *offset = end;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_be_u16() {
        let result = read_be::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102);
    }

    #[test]
    fn read_be_i8() {
        let result = read_be::<i8>(&[0xfe]).unwrap();
        assert_eq!(result, -2);
    }

    #[test]
    fn read_be_u64() {
        let result = read_be::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102_0304_0506_0708);
    }

    #[test]
    fn read_be_at_advances() {
        let mut offset = 2;
        let result = read_be_at::<u32>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0304_0506);
        assert_eq!(offset, 6);
    }

    #[test]
    fn read_be_at_out_of_bounds() {
        let mut offset = 6;
        let result = read_be_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(Error::OutOfBounds)));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_be_at::<u8>(&TEST_BUFFER, &mut offset).is_err());
    }

    #[test]
    fn write_be_appends() {
        let mut out = vec![0xaa];
        write_be(&mut out, 0x0102_0304u32);
        write_be(&mut out, -2i16);
        assert_eq!(out, [0xaa, 0x01, 0x02, 0x03, 0x04, 0xff, 0xfe]);
    }

    #[test]
    fn write_be_at_bounds() {
        let mut data = [0u8; 3];
        let mut offset = 0;
        write_be_at(&mut data, &mut offset, 0x0102u16).unwrap();
        assert_eq!(offset, 2);
        assert!(matches!(
            write_be_at(&mut data, &mut offset, 0x0304u16),
            Err(Error::OutOfBounds)
        ));
        write_be_at(&mut data, &mut offset, 0x03u8).unwrap();
        assert_eq!(data, [0x01, 0x02, 0x03]);
    }
}
