//! Shared fixtures for unit tests.

use crate::Value;

// Helper function to create the string keys "a", "b" and "c"
pub fn abc_keys() -> [Value; 3] {
    [
        Value::string_from("a"),
        Value::string_from("b"),
        Value::string_from("c"),
    ]
}

// Helper function to unwrap a looked-up integer
pub fn int_of(value: Option<&Value>) -> i64 {
    value
        .expect("value should be present")
        .as_integer()
        .expect("value should be an integer")
}

// Helper function to build a string-keyed map from integer entries
pub fn map_of(entries: &[(&str, i64)]) -> crate::Map {
    let map = crate::Map::hashmap(entries.len()).expect("table should allocate");
    for (key, value) in entries {
        map.set(Value::string_from(key), Value::integer(*value))
            .expect("string keys are hashable");
    }
    map
}
