#![no_main]

use asval::codec::{MsgPackSerializer, Serializer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let serializer = MsgPackSerializer::new();
    if let Ok(value) = serializer.deserialize(data) {
        // Whatever decodes must encode again
        let _ = serializer.serialize_to_vec(&value).unwrap();
    }
});
