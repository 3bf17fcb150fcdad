#![forbid(unsafe_code)]
//! Column type catalog, raw wire values and native values.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub(crate) mod native;
pub(crate) mod wire;

pub use native::NativeValue;

/// Declared type of a column.
///
/// Identity comparison only; there is no subtyping between variants. The
/// serialized form is the lowercase column type name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    /// US-ASCII text.
    Ascii,
    /// Arbitrary byte string.
    Bytes,
    /// `true` / `false`.
    Boolean,
    /// 8-bit signed integer.
    TinyInt,
    /// 16-bit signed integer.
    SmallInt,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    BigInt,
    /// Arbitrary-precision integer.
    VarInt,
    /// Arbitrary-precision decimal.
    Decimal,
    /// 32-bit IEEE float.
    Float,
    /// 64-bit IEEE float.
    Double,
    /// IPv4 or IPv6 address.
    Inet,
    /// Calendar date, wire-encoded as unsigned days with the epoch at 2^31.
    Date,
    /// Time of day in nanoseconds since midnight.
    Time,
    /// Instant in milliseconds since the Unix epoch.
    Timestamp,
    /// Any RFC 4122 UUID.
    Uuid,
    /// Version 1 (time-based) UUID.
    TimeUuid,
    /// UTF-8 text.
    Text,
    /// Distributed counter.
    Counter,
    /// Months/days/nanoseconds duration.
    Duration,
    /// Geospatial point.
    Point,
    /// Geospatial line string.
    LineString,
    /// Geospatial polygon.
    Polygon,
}

impl LogicalType {
    /// Every type in the catalog, in declaration order.
    pub const ALL: [LogicalType; 23] = [
        LogicalType::Ascii,
        LogicalType::Bytes,
        LogicalType::Boolean,
        LogicalType::TinyInt,
        LogicalType::SmallInt,
        LogicalType::Int,
        LogicalType::BigInt,
        LogicalType::VarInt,
        LogicalType::Decimal,
        LogicalType::Float,
        LogicalType::Double,
        LogicalType::Inet,
        LogicalType::Date,
        LogicalType::Time,
        LogicalType::Timestamp,
        LogicalType::Uuid,
        LogicalType::TimeUuid,
        LogicalType::Text,
        LogicalType::Counter,
        LogicalType::Duration,
        LogicalType::Point,
        LogicalType::LineString,
        LogicalType::Polygon,
    ];

    /// Stable lowercase name, matching the serialized form.
    pub const fn name(self) -> &'static str {
        match self {
            LogicalType::Ascii => "ascii",
            LogicalType::Bytes => "bytes",
            LogicalType::Boolean => "boolean",
            LogicalType::TinyInt => "tinyint",
            LogicalType::SmallInt => "smallint",
            LogicalType::Int => "int",
            LogicalType::BigInt => "bigint",
            LogicalType::VarInt => "varint",
            LogicalType::Decimal => "decimal",
            LogicalType::Float => "float",
            LogicalType::Double => "double",
            LogicalType::Inet => "inet",
            LogicalType::Date => "date",
            LogicalType::Time => "time",
            LogicalType::Timestamp => "timestamp",
            LogicalType::Uuid => "uuid",
            LogicalType::TimeUuid => "timeuuid",
            LogicalType::Text => "text",
            LogicalType::Counter => "counter",
            LogicalType::Duration => "duration",
            LogicalType::Point => "point",
            LogicalType::LineString => "linestring",
            LogicalType::Polygon => "polygon",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown type name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownTypeName(pub String);

impl fmt::Display for UnknownTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column type '{}'", self.0)
    }
}

impl std::error::Error for UnknownTypeName {}

impl FromStr for LogicalType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalType::ALL
            .iter()
            .copied()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

/// A value in the database's normalized wire form, tagged with its type.
#[derive(Clone, Eq, PartialEq)]
pub struct RawValue {
    ty: LogicalType,
    bytes: Bytes,
}

impl RawValue {
    /// Wraps a wire buffer declared to hold a value of `ty`.
    pub fn new(ty: LogicalType, bytes: impl Into<Bytes>) -> Self {
        Self {
            ty,
            bytes: bytes.into(),
        }
    }

    /// Declared type of the value.
    pub fn ty(&self) -> LogicalType {
        self.ty
    }

    /// The wrapped wire buffer.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The wire bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawValue")
            .field("ty", &self.ty)
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}
