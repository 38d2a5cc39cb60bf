use asval::prelude::*;

fn round_trip(value: &Value) -> Value {
    let serializer = MsgPackSerializer::new();
    let bytes = serializer.serialize_to_vec(value).unwrap();
    serializer.deserialize(&bytes).unwrap()
}

#[test]
fn map_round_trip() {
    let _ = env_logger::try_init();
    let map = Map::hashmap(0).unwrap();
    map.set(Value::string_from("a"), Value::integer(1)).unwrap();
    map.set(Value::string_from("b"), Value::integer(2)).unwrap();

    let decoded = round_trip(&Value::Map(map.clone()));
    let decoded = decoded.as_map().unwrap();
    assert_eq!(decoded.size(), 2);
    assert!(!decoded.ptr_eq(&map));

    let mut iterator = decoded.iterator();
    let mut seen = 0;
    while iterator.has_next() {
        let pair = iterator.next().unwrap().as_pair().unwrap();
        let original = map.get_cloned(pair.first()).unwrap().unwrap();
        assert_eq!(pair.second(), &original);
        seen += 1;
    }
    assert_eq!(seen, 2);
}

#[test]
fn nested_tree_round_trip() {
    let _ = env_logger::try_init();
    let inner = List::owned(ArrayList::new());
    inner.append(Value::string_from("x")).unwrap();
    inner.append(Value::bytes_from(&[0, 1, 2])).unwrap();
    inner.append(Value::NIL).unwrap();
    inner.append(Value::integer(-40_000)).unwrap();

    let map = Map::hashmap(4).unwrap();
    map.set(Value::integer(7), Value::List(inner)).unwrap();
    map.set(Value::bytes_from(b"k"), Value::string_from("blob key")).unwrap();

    let decoded = round_trip(&Value::Map(map));
    let decoded = decoded.as_map().unwrap();

    let list = decoded.get_cloned(&Value::integer(7)).unwrap().unwrap();
    let list = list.as_list().unwrap();
    let items = list.iterator().remaining().unwrap();
    assert_eq!(
        items,
        vec![
            Value::string_from("x"),
            Value::bytes_from(&[0, 1, 2]),
            Value::NIL,
            Value::integer(-40_000),
        ]
    );

    let text = decoded
        .get_cloned(&Value::bytes_from(b"k"))
        .unwrap()
        .unwrap();
    assert_eq!(text.as_str().unwrap(), "blob key");
}

#[test]
fn boundary_sizes() {
    let _ = env_logger::try_init();
    let serializer = MsgPackSerializer::new();

    for (len, header) in [(31usize, 1usize), (32, 2), (255, 2), (256, 3), (65_536, 5)] {
        let text = "s".repeat(len);
        let bytes = serializer.serialize_to_vec(&Value::string(text.clone())).unwrap();
        assert_eq!(bytes.len(), len + header, "string of {len}");
        assert_eq!(serializer.deserialize(&bytes).unwrap().as_str().unwrap(), text);
    }

    for (len, header) in [(15usize, 1usize), (16, 3), (65_535, 3), (65_536, 5)] {
        let list: ArrayList = (0..len).map(|_| Value::NIL).collect();
        let bytes = serializer
            .serialize_to_vec(&Value::List(List::owned(list)))
            .unwrap();
        assert_eq!(bytes.len(), len + header, "array of {len}");
        let decoded = serializer.deserialize(&bytes).unwrap();
        assert_eq!(decoded.as_list().unwrap().size(), len);
    }

    for (len, marker) in [(15i64, 0x8f), (16, 0xde), (65_536, 0xdf)] {
        let map = Map::hashmap(1024).unwrap();
        for i in 0..len {
            map.set(Value::integer(i), Value::integer(i)).unwrap();
        }
        let bytes = serializer.serialize_to_vec(&Value::Map(map)).unwrap();
        assert_eq!(bytes[0], marker, "map of {len}");
        let decoded = serializer.deserialize(&bytes).unwrap();
        assert_eq!(decoded.as_map().unwrap().size() as i64, len);
    }
}

#[test]
fn rejected_inputs() {
    let _ = env_logger::try_init();
    let serializer = MsgPackSerializer::new();
    let cases: &[(&[u8], &str)] = &[
        (&[], "empty"),
        (&[0xcb, 0, 0, 0, 0, 0, 0, 0, 0], "float64"),
        (&[0xd5, 0x01, 0x00, 0x00], "fixext"),
        (&[0xdb, 0x00, 0x00, 0x00], "truncated length"),
        (&[0x81, 0xa1, b'a'], "missing map value"),
        (&[0xc0, 0xc0], "trailing bytes"),
        (&[0xc1], "reserved marker"),
    ];

    for (data, label) in cases {
        assert!(serializer.deserialize(data).is_err(), "{label}");
    }
}

#[test]
fn strict_config_limits_depth() {
    let _ = env_logger::try_init();
    let serializer = MsgPackSerializer::with_config(RuntimeConfig::strict());
    let depth = serializer.config().max_nesting_depth;

    let mut value = Value::integer(0);
    for _ in 0..depth {
        let list = List::owned(ArrayList::new());
        list.append(value).unwrap();
        value = Value::List(list);
    }
    let bytes = serializer.serialize_to_vec(&value).unwrap();
    assert!(serializer.deserialize(&bytes).is_ok());

    let list = List::owned(ArrayList::new());
    list.append(value).unwrap();
    let too_deep = Value::List(list);
    assert!(matches!(
        serializer.serialize_to_vec(&too_deep),
        Err(Error::RecursionLimit(_))
    ));

    let mut bytes = vec![0x91];
    bytes.extend(MsgPackSerializer::new().serialize_to_vec(&too_deep).unwrap());
    assert!(matches!(
        serializer.deserialize(&bytes),
        Err(Error::RecursionLimit(_))
    ));
}

#[test]
fn bins_decode_through_serializer() {
    let _ = env_logger::try_init();
    let serializer = MsgPackSerializer::new();
    let payload = {
        let map = Map::hashmap(2).unwrap();
        map.set(Value::string_from("n"), Value::integer(42)).unwrap();
        serializer.serialize_to_vec(&Value::Map(map)).unwrap()
    };

    let value = bin_to_value(&serializer, &BinValue::Map(payload)).unwrap();
    let stored = value
        .as_map()
        .unwrap()
        .get_cloned(&Value::string_from("n"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.as_integer().unwrap(), 42);

    let blob = BinValue::Blob {
        kind: BlobKind::Erlang,
        data: vec![131, 97, 1],
    };
    assert_eq!(
        bin_to_value(&serializer, &blob).unwrap().as_bytes().unwrap(),
        &[131, 97, 1]
    );
}
