#![allow(clippy::all)]

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use ordkey::{
    CompositeKey, KeyColumn, KeyPart, KeyRegistry, LogicalType, NativeValue, Result, SortOrder,
};
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// `(user text, score bigint desc, seq int)` rows keyed in a sorted map.
struct Table<'r> {
    registry: &'r KeyRegistry,
    rows: BTreeMap<Vec<u8>, String>,
}

const LAYOUT: [KeyColumn; 3] = [
    KeyColumn::asc(LogicalType::Text),
    KeyColumn::desc(LogicalType::BigInt),
    KeyColumn::asc(LogicalType::Int),
];

impl<'r> Table<'r> {
    fn new(registry: &'r KeyRegistry) -> Self {
        Self {
            registry,
            rows: BTreeMap::new(),
        }
    }

    fn key(&self, user: &str, score: i64, seq: i32) -> Result<Vec<u8>> {
        let parts = [
            KeyPart::new(self.registry, user.as_bytes().to_vec(), LogicalType::Text)?,
            KeyPart::new(self.registry, score.to_be_bytes().to_vec(), LogicalType::BigInt)?
                .with_order(SortOrder::Descending),
            KeyPart::new(self.registry, seq.to_be_bytes().to_vec(), LogicalType::Int)?,
        ];
        Ok(CompositeKey::from_parts(&parts)?.finish())
    }

    fn user_prefix(&self, user: &str) -> Result<Vec<u8>> {
        KeyPart::new(self.registry, user.as_bytes().to_vec(), LogicalType::Text)?.encode()
    }

    fn insert(&mut self, user: &str, score: i64, seq: i32) -> Result<()> {
        let key = self.key(user, score, seq)?;
        self.rows.insert(key, format!("{user}/{score}/{seq}"));
        Ok(())
    }

    fn scan_user(&self, user: &str) -> Result<Vec<&str>> {
        let prefix = self.user_prefix(user)?;
        let upper = match CompositeKey::prefix_upper_bound(&prefix) {
            Some(bound) => Bound::Excluded(bound),
            None => Bound::Unbounded,
        };
        Ok(self
            .rows
            .range((Bound::Included(prefix), upper))
            .map(|(_, v)| v.as_str())
            .collect())
    }
}

#[test]
fn sorted_store_orders_rows_like_tuples() -> Result<()> {
    let registry = KeyRegistry::standard();
    let mut table = Table::new(&registry);
    let mut rows = vec![
        ("bob", 10, 1),
        ("alice", 5, 2),
        ("alice", 50, 1),
        ("alice", 5, 1),
        ("al", -3, 0),
        ("alice\0x", 0, 0),
        ("bob", -10, 0),
    ];
    rows.shuffle(&mut ChaCha8Rng::seed_from_u64(7));
    for (user, score, seq) in &rows {
        table.insert(user, *score, *seq)?;
    }
    let ordered: Vec<&str> = table.rows.values().map(String::as_str).collect();
    assert_eq!(
        ordered,
        [
            "al/-3/0",
            "alice/50/1",
            "alice/5/1",
            "alice/5/2",
            "alice\0x/0/0",
            "bob/10/1",
            "bob/-10/0",
        ]
    );
    Ok(())
}

#[test]
fn prefix_scan_selects_one_user() -> Result<()> {
    let registry = KeyRegistry::standard();
    let mut table = Table::new(&registry);
    for (user, score, seq) in [("al", 1, 0), ("alice", 2, 0), ("alice", 3, 1), ("alicia", 4, 0)] {
        table.insert(user, score, seq)?;
    }
    assert_eq!(table.scan_user("alice")?, ["alice/3/1", "alice/2/0"]);
    assert_eq!(table.scan_user("al")?, ["al/1/0"]);
    assert!(table.scan_user("zed")?.is_empty());
    Ok(())
}

#[test]
fn split_walks_stored_keys() -> Result<()> {
    let registry = KeyRegistry::standard();
    let mut table = Table::new(&registry);
    table.insert("carol", i64::MIN, i32::MAX)?;
    table.insert("dave", 0, -1)?;
    let decoded: Vec<_> = table
        .rows
        .keys()
        .map(|key| CompositeKey::split(&registry, key, &LAYOUT))
        .collect::<Result<_>>()?;
    assert_eq!(
        decoded[0].as_slice(),
        &[
            NativeValue::Text("carol".into()),
            NativeValue::Long(i64::MIN),
            NativeValue::Int(i32::MAX),
        ]
    );
    assert_eq!(decoded[1][2], NativeValue::Int(-1));
    Ok(())
}

#[test]
fn variable_width_parts_compose_in_any_position() -> Result<()> {
    let registry = KeyRegistry::standard();
    let key = |n: &str, d: &str, t: &str| -> Result<Vec<u8>> {
        let parts = [
            KeyPart::from_native(&registry, &NativeValue::VarInt(n.parse().unwrap()), LogicalType::VarInt)?,
            KeyPart::from_native(&registry, &NativeValue::Decimal(d.parse().unwrap()), LogicalType::Decimal)?
                .with_order(SortOrder::Descending),
            KeyPart::new(&registry, t.as_bytes().to_vec(), LogicalType::Ascii)?,
        ];
        Ok(CompositeKey::from_parts(&parts)?.finish())
    };
    let ordered = [
        key("-1000", "0", "a")?,
        key("-1", "2.5", "z")?,
        key("-1", "2.25", "a")?,
        key("0", "-1", "")?,
        key("7", "1E+9", "b")?,
        key("7", "1E+9", "ba")?,
        key("7", "-1E+9", "a")?,
    ];
    for pair in ordered.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", hex::encode(&pair[0]), hex::encode(&pair[1]));
    }

    let layout = [
        KeyColumn::asc(LogicalType::VarInt),
        KeyColumn::desc(LogicalType::Decimal),
        KeyColumn::asc(LogicalType::Ascii),
    ];
    let values = CompositeKey::split(&registry, &ordered[2], &layout)?;
    assert_eq!(values[0], NativeValue::VarInt((-1).into()));
    assert_eq!(values[1], NativeValue::Decimal("2.25".parse().unwrap()));
    assert_eq!(values[2], NativeValue::Bytes(b"a".to_vec()));
    Ok(())
}

fn column(ty: LogicalType, descending: bool) -> KeyColumn {
    if descending {
        KeyColumn::desc(ty)
    } else {
        KeyColumn::asc(ty)
    }
}

fn directed(ord: Ordering, column: &KeyColumn) -> Ordering {
    if column.order.is_descending() {
        ord.reverse()
    } else {
        ord
    }
}

fn two_column_key(
    registry: &KeyRegistry,
    layout: &[KeyColumn; 2],
    values: [&NativeValue; 2],
) -> Result<Vec<u8>> {
    let parts = layout
        .iter()
        .zip(values)
        .map(|(col, v)| Ok(KeyPart::from_native(registry, v, col.ty)?.with_order(col.order)))
        .collect::<Result<Vec<_>>>()?;
    Ok(CompositeKey::from_parts(&parts)?.finish())
}

/// Encodes `a` and `b` under `layout` and checks that the keys compare like
/// the tuples and split back into the same values.
fn check_two_columns(
    layout: [KeyColumn; 2],
    a: [NativeValue; 2],
    b: [NativeValue; 2],
) -> std::result::Result<(), TestCaseError> {
    let registry = KeyRegistry::standard();
    let ka = two_column_key(&registry, &layout, [&a[0], &a[1]]).unwrap();
    let kb = two_column_key(&registry, &layout, [&b[0], &b[1]]).unwrap();
    let mut expected = Ordering::Equal;
    for (i, col) in layout.iter().enumerate() {
        let ord = col.ty.compare(&a[i], &b[i]).unwrap();
        expected = expected.then(directed(ord, col));
    }
    prop_assert_eq!(ka.cmp(&kb), expected, "{:?} vs {:?}", a, b);

    let split = CompositeKey::split(&registry, &ka, &layout).unwrap();
    prop_assert_eq!(split.len(), 2);
    for (i, col) in layout.iter().enumerate() {
        prop_assert_eq!(col.ty.compare(&split[i], &a[i]), Some(Ordering::Equal));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn text_then_varint_orders_like_tuples(
        a in ("[ab\\x00]{0,4}", any::<i64>()),
        b in ("[ab\\x00]{0,4}", any::<i64>()),
        tie in any::<bool>(),
        desc in (any::<bool>(), any::<bool>()),
    ) {
        let b = if tie { (a.0.clone(), b.1) } else { b };
        let layout = [column(LogicalType::Text, desc.0), column(LogicalType::VarInt, desc.1)];
        let row = |(text, n): (String, i64)| {
            [NativeValue::Text(text), NativeValue::VarInt(n.into())]
        };
        check_two_columns(layout, row(a), row(b))?;
    }

    #[test]
    fn decimal_then_bytes_orders_like_tuples(
        a in ((any::<i32>(), -6i64..6), proptest::collection::vec(0u8..3, 0..4)),
        b in ((any::<i32>(), -6i64..6), proptest::collection::vec(0u8..3, 0..4)),
        tie in any::<bool>(),
        desc in (any::<bool>(), any::<bool>()),
    ) {
        let b = if tie { (a.0, b.1) } else { b };
        let layout = [column(LogicalType::Decimal, desc.0), column(LogicalType::Bytes, desc.1)];
        let row = |((unscaled, scale), bytes): ((i32, i64), Vec<u8>)| {
            [
                NativeValue::Decimal(bigdecimal::BigDecimal::new(unscaled.into(), scale)),
                NativeValue::Bytes(bytes),
            ]
        };
        check_two_columns(layout, row(a), row(b))?;
    }
}
