use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use time::OffsetDateTime;
use uuid::Uuid;

use super::LogicalType;

/// The native form a codec consumes and produces.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    /// Boolean.
    Bool(bool),
    /// 8-bit signed integer.
    Byte(i8),
    /// 16-bit signed integer.
    Short(i16),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// Arbitrary-precision integer.
    VarInt(BigInt),
    /// Arbitrary-precision decimal.
    Decimal(BigDecimal),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    Text(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// IP address.
    Inet(IpAddr),
    /// UUID of any version.
    Uuid(Uuid),
    /// Instant with millisecond precision on the wire.
    Timestamp(OffsetDateTime),
}

impl NativeValue {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NativeValue::Bool(_) => "bool",
            NativeValue::Byte(_) => "byte",
            NativeValue::Short(_) => "short",
            NativeValue::Int(_) => "int",
            NativeValue::Long(_) => "long",
            NativeValue::VarInt(_) => "varint",
            NativeValue::Decimal(_) => "decimal",
            NativeValue::Float(_) => "float",
            NativeValue::Double(_) => "double",
            NativeValue::Text(_) => "text",
            NativeValue::Bytes(_) => "bytes",
            NativeValue::Inet(_) => "inet",
            NativeValue::Uuid(_) => "uuid",
            NativeValue::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Bool(v) => write!(f, "{v}"),
            NativeValue::Byte(v) => write!(f, "{v}"),
            NativeValue::Short(v) => write!(f, "{v}"),
            NativeValue::Int(v) => write!(f, "{v}"),
            NativeValue::Long(v) => write!(f, "{v}"),
            NativeValue::VarInt(v) => write!(f, "{v}"),
            NativeValue::Decimal(v) => write!(f, "{v}"),
            NativeValue::Float(v) => write!(f, "{v}"),
            NativeValue::Double(v) => write!(f, "{v}"),
            NativeValue::Text(v) => write!(f, "{v}"),
            NativeValue::Bytes(v) => write!(f, "bytes(len={})", v.len()),
            NativeValue::Inet(v) => write!(f, "{v}"),
            NativeValue::Uuid(v) => write!(f, "{v}"),
            NativeValue::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

impl LogicalType {
    /// Compares two native values under this type's native ordering.
    ///
    /// Returns `None` when the values are of different kinds. Floats order NaN
    /// above positive infinity and `-0.0` below `+0.0`; time UUIDs order by
    /// embedded timestamp first.
    pub fn compare(self, a: &NativeValue, b: &NativeValue) -> Option<Ordering> {
        use NativeValue::*;
        Some(match (a, b) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Byte(a), Byte(b)) => a.cmp(b),
            (Short(a), Short(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Long(a), Long(b)) => a.cmp(b),
            (VarInt(a), VarInt(b)) => a.cmp(b),
            (Decimal(a), Decimal(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical_f32(*a).total_cmp(&canonical_f32(*b)),
            (Double(a), Double(b)) => canonical_f64(*a).total_cmp(&canonical_f64(*b)),
            (Text(a), Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Bytes(a), Bytes(b)) => a.cmp(b),
            (Inet(a), Inet(b)) => inet_octets(a).cmp(&inet_octets(b)),
            (Uuid(a), Uuid(b)) if self == LogicalType::TimeUuid => {
                time_uuid_order_key(a).cmp(&time_uuid_order_key(b))
            }
            (Uuid(a), Uuid(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            _ => return None,
        })
    }
}

fn canonical_f32(v: f32) -> f32 {
    if v.is_nan() {
        f32::NAN
    } else {
        v
    }
}

fn canonical_f64(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

pub(crate) fn inet_octets(addr: &IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// 60-bit timestamp of a version 1 UUID followed by its clock sequence and
/// node, compared as signed bytes.
pub(crate) fn time_uuid_order_key(uuid: &Uuid) -> (u64, [i8; 8]) {
    let b = uuid.as_bytes();
    let time_low = u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as u64;
    let time_mid = u16::from_be_bytes([b[4], b[5]]) as u64;
    let time_hi = (u16::from_be_bytes([b[6], b[7]]) & 0x0fff) as u64;
    let tail = std::array::from_fn(|i| b[8 + i] as i8);
    ((time_hi << 48) | (time_mid << 32) | time_low, tail)
}
