//! MessagePack encoding of [`Value`] trees.
//!
//! # Encoding
//!
//! | Value | Form |
//! |---|---|
//! | Nil | `nil` (`0xc0`) |
//! | Integer | smallest of positive/negative fixint, `uint 8..64`, `int 8..64` |
//! | String | `fixstr`, `str 8/16/32` |
//! | Blob | `bin 8/16/32` |
//! | List | `fixarray`, `array 16/32` |
//! | Map | `fixmap`, `map 16/32` |
//! | Pair | two-element array |
//!
//! # Decoding
//!
//! Arrays become [`List`]s over an [`ArrayList`], preserving wire order. Maps become
//! [`Map`]s over a [`HashTable`]; when a key repeats, the last entry wins. Booleans decode
//! to the integers `1` and `0`. Floats and extension types have no [`Value`] counterpart
//! and are rejected with [`Error::NotSupported`].
//!
//! Decoding treats its input as untrusted: lengths are checked against the bytes that
//! remain before anything is reserved, reservations are capped by
//! [`RuntimeConfig::max_preallocation`], and nesting is limited by
//! [`RuntimeConfig::max_nesting_depth`].

use log::{debug, trace};

use crate::{
    codec::{io::write_be, Parser, Serializer},
    config::RuntimeConfig,
    types::{ArrayList, HashTable, List, Map, Value, ValueIterator},
    Error, Result,
};

const FIXMAP: u8 = 0x80;
const FIXARRAY: u8 = 0x90;
const FIXSTR: u8 = 0xa0;
const NIL: u8 = 0xc0;
const RESERVED: u8 = 0xc1;
const FALSE: u8 = 0xc2;
const TRUE: u8 = 0xc3;
const BIN8: u8 = 0xc4;
const BIN16: u8 = 0xc5;
const BIN32: u8 = 0xc6;
const FLOAT32: u8 = 0xca;
const FLOAT64: u8 = 0xcb;
const UINT8: u8 = 0xcc;
const UINT16: u8 = 0xcd;
const UINT32: u8 = 0xce;
const UINT64: u8 = 0xcf;
const INT8: u8 = 0xd0;
const INT16: u8 = 0xd1;
const INT32: u8 = 0xd2;
const INT64: u8 = 0xd3;
const STR8: u8 = 0xd9;
const STR16: u8 = 0xda;
const STR32: u8 = 0xdb;
const ARRAY16: u8 = 0xdc;
const ARRAY32: u8 = 0xdd;
const MAP16: u8 = 0xde;
const MAP32: u8 = 0xdf;

const FIXSTR_MAX: usize = 0x1f;
const FIXCOLLECTION_MAX: usize = 0x0f;

/// MessagePack [`Serializer`].
///
/// # Examples
///
/// ```rust
/// use asval::codec::{MsgPackSerializer, Serializer};
/// use asval::{Map, Value};
///
/// let map = Map::hashmap(4)?;
/// map.set(Value::string_from("a"), Value::integer(1))?;
///
/// let serializer = MsgPackSerializer::new();
/// let bytes = serializer.serialize_to_vec(&Value::Map(map))?;
/// assert_eq!(bytes, [0x81, 0xa1, b'a', 0x01]);
///
/// let decoded = serializer.deserialize(&bytes)?;
/// let decoded = decoded.as_map()?;
/// assert_eq!(decoded.get(&Value::string_from("a"))?.unwrap().as_integer()?, 1);
/// # Ok::<(), asval::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MsgPackSerializer {
    config: RuntimeConfig,
}

impl MsgPackSerializer {
    /// Creates a serializer with the default [`RuntimeConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a serializer enforcing the limits of `config`.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        MsgPackSerializer { config }
    }

    /// The limits this serializer enforces.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl Serializer for MsgPackSerializer {
    fn serialize(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        trace!("msgpack: serializing {} value", value.value_type());

        let start = out.len();
        let mut encoder = Encoder {
            out: &mut *out,
            max_depth: self.config.max_nesting_depth,
        };
        let result = encoder.value(value, 0);
        if result.is_err() {
            out.truncate(start);
        }
        result
    }

    fn deserialize(&self, data: &[u8]) -> Result<Value> {
        if data.is_empty() {
            return Err(Error::Empty);
        }
        trace!("msgpack: deserializing {} bytes", data.len());

        let mut decoder = Decoder {
            parser: Parser::new(data),
            config: &self.config,
        };
        let value = decoder.value(0)?;
        if decoder.parser.has_more_data() {
            debug!(
                "msgpack: {} trailing bytes after value",
                decoder.parser.remaining()
            );
            return Err(malformed_error!(
                "{} trailing bytes after value at offset {}",
                decoder.parser.remaining(),
                decoder.parser.pos()
            ));
        }
        Ok(value)
    }
}

fn enter(depth: usize, max_depth: usize) -> Result<usize> {
    let depth = depth + 1;
    if depth > max_depth {
        debug!("msgpack: nesting exceeds {} levels", max_depth);
        return Err(Error::RecursionLimit(max_depth));
    }
    Ok(depth)
}

struct Encoder<'a> {
    out: &'a mut Vec<u8>,
    max_depth: usize,
}

impl Encoder<'_> {
    fn value(&mut self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Nil => self.out.push(NIL),
            Value::Integer(number) => self.integer(*number),
            Value::String(text) => {
                self.out.try_reserve(text.len() + 5)?;
                self.string_header(text.len())?;
                self.out.extend_from_slice(text.as_bytes());
            }
            Value::Blob(data) => {
                self.out.try_reserve(data.len() + 5)?;
                self.bin_header(data.len())?;
                self.out.extend_from_slice(data);
            }
            Value::Pair(pair) => {
                let depth = enter(depth, self.max_depth)?;
                self.out.push(FIXARRAY | 2);
                self.value(pair.first(), depth)?;
                self.value(pair.second(), depth)?;
            }
            Value::List(list) => {
                let depth = enter(depth, self.max_depth)?;
                let items = list.iterator().remaining()?;
                self.collection_header(items.len(), FIXARRAY, ARRAY16, ARRAY32)?;
                for item in &items {
                    self.value(item, depth)?;
                }
            }
            Value::Map(map) => {
                let depth = enter(depth, self.max_depth)?;
                let entries = map.iterator().remaining()?;
                self.collection_header(entries.len(), FIXMAP, MAP16, MAP32)?;
                for entry in &entries {
                    let pair = entry.as_pair()?;
                    self.value(pair.first(), depth)?;
                    self.value(pair.second(), depth)?;
                }
            }
        }
        Ok(())
    }

    fn integer(&mut self, number: i64) {
        let out = &mut *self.out;
        match number {
            0..=0x7f | -32..=-1 => out.push(number as u8),
            0x80..=0xff => {
                out.push(UINT8);
                write_be(out, number as u8);
            }
            0x100..=0xffff => {
                out.push(UINT16);
                write_be(out, number as u16);
            }
            0x1_0000..=0xffff_ffff => {
                out.push(UINT32);
                write_be(out, number as u32);
            }
            n if n > 0 => {
                out.push(UINT64);
                write_be(out, n as u64);
            }
            -0x80..=-33 => {
                out.push(INT8);
                write_be(out, number as i8);
            }
            -0x8000..=-0x81 => {
                out.push(INT16);
                write_be(out, number as i16);
            }
            -0x8000_0000..=-0x8001 => {
                out.push(INT32);
                write_be(out, number as i32);
            }
            _ => {
                out.push(INT64);
                write_be(out, number);
            }
        }
    }

    fn string_header(&mut self, len: usize) -> Result<()> {
        if len <= FIXSTR_MAX {
            self.out.push(FIXSTR | len as u8);
        } else if let Ok(len) = u8::try_from(len) {
            self.out.push(STR8);
            write_be(self.out, len);
        } else {
            self.sized_header(len, STR16, STR32)?;
        }
        Ok(())
    }

    fn bin_header(&mut self, len: usize) -> Result<()> {
        if let Ok(len) = u8::try_from(len) {
            self.out.push(BIN8);
            write_be(self.out, len);
            Ok(())
        } else {
            self.sized_header(len, BIN16, BIN32)
        }
    }

    fn collection_header(&mut self, len: usize, fix: u8, wide16: u8, wide32: u8) -> Result<()> {
        if len <= FIXCOLLECTION_MAX {
            self.out.push(fix | len as u8);
            Ok(())
        } else {
            self.sized_header(len, wide16, wide32)
        }
    }

    fn sized_header(&mut self, len: usize, wide16: u8, wide32: u8) -> Result<()> {
        if let Ok(len) = u16::try_from(len) {
            self.out.push(wide16);
            write_be(self.out, len);
        } else if let Ok(len) = u32::try_from(len) {
            self.out.push(wide32);
            write_be(self.out, len);
        } else {
            debug!("msgpack: length {} exceeds the 32-bit limit", len);
            return Err(Error::NotSupported);
        }
        Ok(())
    }
}

struct Decoder<'a, 'c> {
    parser: Parser<'a>,
    config: &'c RuntimeConfig,
}

impl Decoder<'_, '_> {
    fn value(&mut self, depth: usize) -> Result<Value> {
        let marker = self.parser.read_be::<u8>()?;
        match marker {
            0x00..=0x7f => Ok(Value::integer(i64::from(marker))),
            0x80..=0x8f => self.map(usize::from(marker & 0x0f), depth),
            0x90..=0x9f => self.array(usize::from(marker & 0x0f), depth),
            0xa0..=0xbf => self.string(usize::from(marker & 0x1f)),
            NIL => Ok(Value::NIL),
            RESERVED => Err(malformed_error!(
                "Reserved marker 0xc1 at offset {}",
                self.parser.pos() - 1
            )),
            FALSE => Ok(Value::integer(0)),
            TRUE => Ok(Value::integer(1)),
            BIN8 => {
                let len = self.parser.read_be::<u8>()?;
                self.blob(usize::from(len))
            }
            BIN16 => {
                let len = self.parser.read_be::<u16>()?;
                self.blob(usize::from(len))
            }
            BIN32 => {
                let len = self.parser.read_be::<u32>()?;
                self.blob(len as usize)
            }
            0xc7..=0xc9 | 0xd4..=0xd8 => self.unsupported(marker, "extension"),
            FLOAT32 | FLOAT64 => self.unsupported(marker, "float"),
            UINT8 => Ok(Value::integer(i64::from(self.parser.read_be::<u8>()?))),
            UINT16 => Ok(Value::integer(i64::from(self.parser.read_be::<u16>()?))),
            UINT32 => Ok(Value::integer(i64::from(self.parser.read_be::<u32>()?))),
            UINT64 => {
                let number = self.parser.read_be::<u64>()?;
                i64::try_from(number).map(Value::integer).map_err(|_| {
                    malformed_error!(
                        "Unsigned integer {} does not fit a signed 64-bit integer",
                        number
                    )
                })
            }
            INT8 => Ok(Value::integer(i64::from(self.parser.read_be::<i8>()?))),
            INT16 => Ok(Value::integer(i64::from(self.parser.read_be::<i16>()?))),
            INT32 => Ok(Value::integer(i64::from(self.parser.read_be::<i32>()?))),
            INT64 => Ok(Value::integer(self.parser.read_be::<i64>()?)),
            STR8 => {
                let len = self.parser.read_be::<u8>()?;
                self.string(usize::from(len))
            }
            STR16 => {
                let len = self.parser.read_be::<u16>()?;
                self.string(usize::from(len))
            }
            STR32 => {
                let len = self.parser.read_be::<u32>()?;
                self.string(len as usize)
            }
            ARRAY16 => {
                let len = self.parser.read_be::<u16>()?;
                self.array(usize::from(len), depth)
            }
            ARRAY32 => {
                let len = self.parser.read_be::<u32>()?;
                self.array(len as usize, depth)
            }
            MAP16 => {
                let len = self.parser.read_be::<u16>()?;
                self.map(usize::from(len), depth)
            }
            MAP32 => {
                let len = self.parser.read_be::<u32>()?;
                self.map(len as usize, depth)
            }
            0xe0..=0xff => Ok(Value::integer(i64::from(marker as i8))),
        }
    }

    fn unsupported(&self, marker: u8, kind: &str) -> Result<Value> {
        debug!(
            "msgpack: rejecting {} marker {:#04x} at offset {}",
            kind,
            marker,
            self.parser.pos() - 1
        );
        Err(Error::NotSupported)
    }

    fn string(&mut self, len: usize) -> Result<Value> {
        Ok(Value::string_from(self.parser.read_string_utf8(len)?))
    }

    fn blob(&mut self, len: usize) -> Result<Value> {
        Ok(Value::bytes_from(self.parser.read_bytes(len)?))
    }

    fn array(&mut self, len: usize, depth: usize) -> Result<Value> {
        let depth = enter(depth, self.config.max_nesting_depth)?;
        // Every element takes at least one byte
        self.parser.ensure_remaining(len)?;

        let mut list = ArrayList::with_capacity(len.min(self.config.max_preallocation))?;
        for _ in 0..len {
            list.append(self.value(depth)?)?;
        }
        Ok(Value::List(List::owned(list)))
    }

    fn map(&mut self, len: usize, depth: usize) -> Result<Value> {
        let depth = enter(depth, self.config.max_nesting_depth)?;
        self.parser.ensure_remaining(len.saturating_mul(2))?;

        let mut table = HashTable::new(len.min(self.config.max_preallocation))?;
        for _ in 0..len {
            let key = self.value(depth)?;
            let value = self.value(depth)?;
            table.set(key, value)?;
        }
        Ok(Value::Map(Map::owned(table)))
    }
}
