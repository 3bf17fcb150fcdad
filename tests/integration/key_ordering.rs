#![allow(clippy::all)]

use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::thread;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use ordkey::{
    KeyCodec, KeyError, KeyErrorKind, KeyPart, KeyRegistry, LogicalType, NativeValue, Result,
    SortOrder,
};
use proptest::prelude::*;
use proptest::strategy::Union;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use time::macros::datetime;

fn encode(registry: &KeyRegistry, native: &NativeValue, ty: LogicalType) -> Result<Vec<u8>> {
    KeyPart::from_native(registry, native, ty)?.encode()
}

/// Checks that every pair of `values` compares the same natively and encoded,
/// and that each encoding decodes back to an equal value.
fn check_order(registry: &KeyRegistry, ty: LogicalType, values: &[NativeValue]) -> Result<()> {
    let encoded = values
        .iter()
        .map(|v| encode(registry, v, ty))
        .collect::<Result<Vec<_>>>()?;
    for (a, ea) in values.iter().zip(&encoded) {
        for (b, eb) in values.iter().zip(&encoded) {
            assert_eq!(
                ty.compare(a, b),
                Some(ea.cmp(eb)),
                "{ty}: {a:?} vs {b:?}"
            );
        }
    }
    Ok(())
}

#[test]
fn negative_int_sorts_before_positive() -> Result<()> {
    let registry = KeyRegistry::standard();
    let a = KeyPart::new(&registry, (-5i32).to_be_bytes().to_vec(), LogicalType::Int)?;
    let b = KeyPart::new(&registry, 3i32.to_be_bytes().to_vec(), LogicalType::Int)?;
    assert!(a.encode()? < b.encode()?);
    Ok(())
}

#[test]
fn text_sorts_lexicographically() -> Result<()> {
    let registry = KeyRegistry::standard();
    let apple = KeyPart::new(&registry, b"apple".to_vec(), LogicalType::Text)?;
    let banana = KeyPart::new(&registry, b"banana".to_vec(), LogicalType::Text)?;
    assert!(apple.encode()? < banana.encode()?);
    Ok(())
}

#[test]
fn timestamp_adapter_preserves_order() -> Result<()> {
    let registry = KeyRegistry::standard();
    let t1 = datetime!(2023-11-14 22:13:20 UTC);
    let t2 = datetime!(2023-11-14 22:13:20.001 UTC);
    let p1 = KeyPart::from_native(&registry, &NativeValue::Timestamp(t1), LogicalType::Timestamp)?;
    let p2 = KeyPart::from_native(&registry, &NativeValue::Timestamp(t2), LogicalType::Timestamp)?;

    let (NativeValue::Long(e1), NativeValue::Long(e2)) = (p1.adapted_value()?, p2.adapted_value()?)
    else {
        panic!("timestamp adapter must yield epoch milliseconds");
    };
    assert_eq!(e1, 1_700_000_000_000);
    assert!(e1 < e2);
    assert!(p1.encode()? < p2.encode()?);
    Ok(())
}

#[test]
fn geospatial_types_are_unsupported() {
    let registry = KeyRegistry::standard();
    for ty in [LogicalType::Point, LogicalType::LineString, LogicalType::Polygon] {
        let err = KeyPart::new(&registry, vec![0u8; 21], ty).unwrap_err();
        assert_eq!(err, KeyError::UnsupportedType { ty });
        assert_eq!(err.kind(), KeyErrorKind::UnsupportedType);
        assert!(err.to_string().contains(ty.name()), "{err}");
    }
}

#[test]
fn adapter_fallback_uses_generic_decomposition() -> Result<()> {
    let registry = KeyRegistry::standard();

    let wire = 1234i32.to_be_bytes().to_vec();
    let int = KeyPart::new(&registry, wire.clone(), LogicalType::Int)?;
    assert_eq!(registry.adapter(LogicalType::Int), None);
    assert_eq!(int.adapted_value()?, LogicalType::Int.compose(&wire)?);

    let bytes = KeyPart::new(&registry, vec![0, 1, 2], LogicalType::Bytes)?;
    assert!(registry.adapter(LogicalType::Bytes).is_some());
    assert_eq!(bytes.adapted_value()?, NativeValue::Bytes(vec![0, 1, 2]));
    Ok(())
}

#[test]
fn boundary_values_keep_order() -> Result<()> {
    let registry = KeyRegistry::standard();
    check_order(
        &registry,
        LogicalType::BigInt,
        &[i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX - 1, i64::MAX].map(NativeValue::Long),
    )?;
    check_order(
        &registry,
        LogicalType::Date,
        &[i32::MIN, -719_162, -1, 0, 1, 19_000, i32::MAX - (1 << 30)].map(NativeValue::Int),
    )?;
    check_order(
        &registry,
        LogicalType::Time,
        &[0, 1, 43_200_000_000_000, 86_399_999_999_999].map(NativeValue::Long),
    )?;
    check_order(
        &registry,
        LogicalType::Double,
        &[f64::NEG_INFINITY, -1e300, -0.0, 0.0, 5e-324, 1e300, f64::INFINITY, f64::NAN]
            .map(NativeValue::Double),
    )?;
    check_order(
        &registry,
        LogicalType::Boolean,
        &[NativeValue::Bool(false), NativeValue::Bool(true)],
    )?;
    Ok(())
}

#[test]
fn inet_orders_by_octets() -> Result<()> {
    let registry = KeyRegistry::standard();
    let addrs = [
        IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        IpAddr::V4(Ipv4Addr::new(9, 255, 255, 255)),
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
        IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
        IpAddr::V4(Ipv4Addr::BROADCAST),
    ];
    let encoded = addrs
        .iter()
        .map(|a| encode(&registry, &NativeValue::Inet(*a), LogicalType::Inet))
        .collect::<Result<Vec<_>>>()?;
    for (i, a) in addrs.iter().enumerate() {
        for (j, b) in addrs.iter().enumerate() {
            let native = LogicalType::Inet.compare(&NativeValue::Inet(*a), &NativeValue::Inet(*b));
            assert_eq!(native, Some(encoded[i].cmp(&encoded[j])), "{a} vs {b}");
        }
    }
    Ok(())
}

#[test]
fn randomized_values_roundtrip_and_order() -> Result<()> {
    let registry = KeyRegistry::standard();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    for _ in 0..256 {
        let (a, b): (i16, i16) = (rng.gen(), rng.gen());
        check_order(&registry, LogicalType::SmallInt, &[NativeValue::Short(a), NativeValue::Short(b)])?;

        let (x, y): (f32, f32) = (f32::from_bits(rng.gen()), f32::from_bits(rng.gen()));
        check_order(&registry, LogicalType::Float, &[NativeValue::Float(x), NativeValue::Float(y)])?;

        let len = rng.gen_range(0..12);
        let blob: Vec<u8> = (0..len).map(|_| rng.gen_range(0..4u8)).collect();
        let part = KeyPart::new(&registry, blob.clone(), LogicalType::Bytes)?;
        let decoded = KeyPart::decode(&registry, &part.encode()?, LogicalType::Bytes)?;
        assert_eq!(decoded, NativeValue::Bytes(blob));
    }
    Ok(())
}

#[test]
fn every_supported_type_roundtrips() -> Result<()> {
    let registry = KeyRegistry::standard();
    let time_uuid = uuid::Uuid::from_bytes([
        0x6b, 0xa7, 0xb8, 0x10, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4,
        0x30, 0xc8,
    ]);
    let samples = [
        (LogicalType::Ascii, NativeValue::Text("plain".into())),
        (LogicalType::Bytes, NativeValue::Bytes(vec![0, 0xff, 0])),
        (LogicalType::Boolean, NativeValue::Bool(true)),
        (LogicalType::TinyInt, NativeValue::Byte(-128)),
        (LogicalType::SmallInt, NativeValue::Short(-2)),
        (LogicalType::Int, NativeValue::Int(77)),
        (LogicalType::BigInt, NativeValue::Long(-1)),
        (LogicalType::VarInt, NativeValue::VarInt("-123456789012345678901234567890".parse().unwrap())),
        (LogicalType::Decimal, NativeValue::Decimal("-3.14159".parse().unwrap())),
        (LogicalType::Float, NativeValue::Float(2.5)),
        (LogicalType::Double, NativeValue::Double(-0.0)),
        (LogicalType::Inet, NativeValue::Inet(IpAddr::V4(Ipv4Addr::LOCALHOST))),
        (LogicalType::Date, NativeValue::Int(-3)),
        (LogicalType::Time, NativeValue::Long(1_000)),
        (LogicalType::Timestamp, NativeValue::Long(-62_135_596_800_000)),
        (LogicalType::Uuid, NativeValue::Uuid(uuid::Uuid::new_v4())),
        (LogicalType::TimeUuid, NativeValue::Uuid(time_uuid)),
        (LogicalType::Text, NativeValue::Text("ünïcödé".into())),
    ];
    assert_eq!(samples.len(), registry.supported_types().len());
    for (ty, value) in samples {
        let part = KeyPart::from_native(&registry, &value, ty)?;
        let decoded = KeyPart::decode(&registry, &part.encode()?, ty)?;
        let expected = part.adapted_value()?;
        let native_equal = match (&expected, &decoded) {
            // Codecs return one canonical kind; byte-like adapters hand over raw bytes.
            (NativeValue::Bytes(raw), NativeValue::Text(s)) => raw.as_slice() == s.as_bytes(),
            _ => ty.compare(&expected, &decoded) == Some(Ordering::Equal),
        };
        assert!(native_equal, "{ty}: {expected:?} decoded as {decoded:?}");
    }
    Ok(())
}

#[test]
fn registry_is_shared_across_threads() -> Result<()> {
    let registry = Arc::new(KeyRegistry::standard());
    let handles: Vec<_> = (0..4i64)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || -> Result<Vec<Vec<u8>>> {
                (0..64i64)
                    .map(|i| {
                        let v = t * 1_000 + i;
                        KeyPart::new(&registry, v.to_be_bytes().to_vec(), LogicalType::BigInt)?
                            .encode()
                    })
                    .collect()
            })
        })
        .collect();
    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().expect("encoder thread panicked")?);
    }
    let mut sorted = all.clone();
    sorted.sort();
    assert_eq!(all, sorted);
    Ok(())
}

const NANOS_PER_DAY: i64 = 86_400_000_000_000;

/// Version 1 UUID from a 60-bit timestamp and a clock sequence/node tail.
fn v1(ts: u64, tail: [u8; 8]) -> uuid::Uuid {
    let mut b = [0u8; 16];
    b[..4].copy_from_slice(&((ts & 0xffff_ffff) as u32).to_be_bytes());
    b[4..6].copy_from_slice(&(((ts >> 32) & 0xffff) as u16).to_be_bytes());
    b[6..8].copy_from_slice(&((((ts >> 48) & 0x0fff) as u16) | 0x1000).to_be_bytes());
    b[8..].copy_from_slice(&tail);
    uuid::Uuid::from_bytes(b)
}

/// Native value generators for every type the standard registry encodes.
fn value_strategies() -> Vec<(LogicalType, BoxedStrategy<NativeValue>)> {
    let edgy_byte = prop_oneof![Just(0u8), Just(1u8), Just(0xffu8), any::<u8>()];
    vec![
        (LogicalType::Ascii, "[ -~]{0,8}".prop_map(NativeValue::Text).boxed()),
        (LogicalType::Text, "[a\\x00é\\u{10348}]{0,6}".prop_map(NativeValue::Text).boxed()),
        (
            LogicalType::Bytes,
            proptest::collection::vec(edgy_byte, 0..8).prop_map(NativeValue::Bytes).boxed(),
        ),
        (LogicalType::Boolean, any::<bool>().prop_map(NativeValue::Bool).boxed()),
        (LogicalType::TinyInt, any::<i8>().prop_map(NativeValue::Byte).boxed()),
        (LogicalType::SmallInt, any::<i16>().prop_map(NativeValue::Short).boxed()),
        (LogicalType::Int, any::<i32>().prop_map(NativeValue::Int).boxed()),
        (LogicalType::BigInt, any::<i64>().prop_map(NativeValue::Long).boxed()),
        (
            LogicalType::VarInt,
            any::<i128>().prop_map(|v| NativeValue::VarInt(BigInt::from(v))).boxed(),
        ),
        (
            LogicalType::Decimal,
            (any::<i64>(), -20i64..20)
                .prop_map(|(unscaled, scale)| {
                    NativeValue::Decimal(BigDecimal::new(BigInt::from(unscaled), scale))
                })
                .boxed(),
        ),
        (
            LogicalType::Float,
            any::<u32>().prop_map(|bits| NativeValue::Float(f32::from_bits(bits))).boxed(),
        ),
        (
            LogicalType::Double,
            any::<u64>().prop_map(|bits| NativeValue::Double(f64::from_bits(bits))).boxed(),
        ),
        (
            LogicalType::Inet,
            prop_oneof![
                any::<[u8; 4]>().prop_map(IpAddr::from),
                any::<[u8; 16]>().prop_map(IpAddr::from),
            ]
            .prop_map(NativeValue::Inet)
            .boxed(),
        ),
        (LogicalType::Date, any::<i32>().prop_map(NativeValue::Int).boxed()),
        (LogicalType::Time, (0..NANOS_PER_DAY).prop_map(NativeValue::Long).boxed()),
        (LogicalType::Timestamp, any::<i64>().prop_map(NativeValue::Long).boxed()),
        (
            LogicalType::Uuid,
            any::<[u8; 16]>()
                .prop_map(|b| NativeValue::Uuid(uuid::Uuid::from_bytes(b)))
                .boxed(),
        ),
        (
            LogicalType::TimeUuid,
            (0u64..(1 << 60), any::<[u8; 8]>())
                .prop_map(|(ts, tail)| NativeValue::Uuid(v1(ts, tail)))
                .boxed(),
        ),
    ]
}

/// A type and two of its values; half the time the values are equal.
fn typed_pair() -> impl Strategy<Value = (LogicalType, NativeValue, NativeValue)> {
    Union::new(value_strategies().into_iter().map(|(ty, values)| {
        (values.clone(), values, any::<bool>())
            .prop_map(move |(a, b, tie)| if tie { (ty, a.clone(), a) } else { (ty, a, b) })
            .boxed()
    }))
}

#[test]
fn generated_values_cover_every_supported_type() {
    let mut generated: Vec<_> = value_strategies().into_iter().map(|(ty, _)| ty).collect();
    let mut supported = KeyRegistry::standard().supported_types();
    generated.sort_by_key(|ty| ty.name());
    supported.sort_by_key(|ty| ty.name());
    assert_eq!(generated, supported);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1024))]

    #[test]
    fn every_type_orders_and_splits_in_both_directions((ty, a, b) in typed_pair()) {
        let registry = KeyRegistry::standard();
        let part = |v: &NativeValue, order| {
            KeyPart::from_native(&registry, v, ty).unwrap().with_order(order).encode().unwrap()
        };
        let (ea, eb) = (part(&a, SortOrder::Ascending), part(&b, SortOrder::Ascending));
        let (da, db) = (part(&a, SortOrder::Descending), part(&b, SortOrder::Descending));
        prop_assert_eq!(ty.compare(&a, &b), Some(ea.cmp(&eb)), "{} {:?} vs {:?}", ty, a, b);
        prop_assert_eq!(ea.cmp(&eb).reverse(), da.cmp(&db));

        let mut codec = registry.resolve(ty).unwrap().create();
        for (head, tail, order) in [
            (&ea, &eb, SortOrder::Ascending),
            (&da, &db, SortOrder::Descending),
        ] {
            let mut key = head.clone();
            key.extend_from_slice(tail);
            let (decoded, used) = KeyPart::decode_prefix(&registry, &key, ty, order).unwrap();
            prop_assert_eq!(used, head.len());
            prop_assert_eq!(&codec.encode(&decoded).unwrap(), &ea);
        }
    }
}
