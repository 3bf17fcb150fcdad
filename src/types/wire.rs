//! Normalized wire format of each column type.
//!
//! `compose` is the generic decomposition used for every type without a
//! specialized adapter; `decompose` is its inverse and only backs the
//! native-value fixture path.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bigdecimal::BigDecimal;
use bytes::Bytes;
use num_bigint::BigInt;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{KeyError, Result};
use crate::primitives::bytes::ord;

use super::native::inet_octets;
use super::{LogicalType, NativeValue};

/// Wire dates count days from this offset so that the epoch is `2^31`.
const DATE_EPOCH_OFFSET: i64 = 1 << 31;
/// Exclusive upper bound of a time-of-day value in nanoseconds.
pub(crate) const NANOS_PER_DAY: i64 = 86_400_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

impl LogicalType {
    /// Decodes a normalized wire value of this type into its canonical native form.
    pub fn compose(self, raw: &[u8]) -> Result<NativeValue> {
        match self {
            LogicalType::Ascii => {
                if !raw.is_ascii() {
                    return Err(KeyError::adaptation(self, "value contains non-ASCII bytes"));
                }
                Ok(NativeValue::Text(utf8(self, raw)?))
            }
            LogicalType::Text => Ok(NativeValue::Text(utf8(self, raw)?)),
            LogicalType::Bytes
            | LogicalType::Duration
            | LogicalType::Point
            | LogicalType::LineString
            | LogicalType::Polygon => Ok(NativeValue::Bytes(raw.to_vec())),
            LogicalType::Boolean => {
                let [b] = exact::<1>(self, raw)?;
                Ok(NativeValue::Bool(b != 0))
            }
            LogicalType::TinyInt => Ok(NativeValue::Byte(exact::<1>(self, raw)?[0] as i8)),
            LogicalType::SmallInt => Ok(NativeValue::Short(i16::from_be_bytes(exact(self, raw)?))),
            LogicalType::Int => Ok(NativeValue::Int(i32::from_be_bytes(exact(self, raw)?))),
            LogicalType::BigInt | LogicalType::Counter => {
                Ok(NativeValue::Long(i64::from_be_bytes(exact(self, raw)?)))
            }
            LogicalType::VarInt => {
                if raw.is_empty() {
                    return Err(KeyError::adaptation(self, "empty varint"));
                }
                Ok(NativeValue::VarInt(BigInt::from_signed_bytes_be(raw)))
            }
            LogicalType::Decimal => {
                if raw.len() < 5 {
                    return Err(KeyError::adaptation(
                        self,
                        format!("decimal needs at least 5 bytes, got {}", raw.len()),
                    ));
                }
                let scale = i32::from_be_bytes(exact(self, &raw[..4])?);
                let unscaled = BigInt::from_signed_bytes_be(&raw[4..]);
                Ok(NativeValue::Decimal(BigDecimal::new(unscaled, scale as i64)))
            }
            LogicalType::Float => Ok(NativeValue::Float(f32::from_be_bytes(exact(self, raw)?))),
            LogicalType::Double => Ok(NativeValue::Double(f64::from_be_bytes(exact(self, raw)?))),
            LogicalType::Inet => match raw.len() {
                4 => Ok(NativeValue::Inet(IpAddr::V4(Ipv4Addr::from(
                    exact::<4>(self, raw)?,
                )))),
                16 => Ok(NativeValue::Inet(IpAddr::V6(Ipv6Addr::from(
                    exact::<16>(self, raw)?,
                )))),
                n => Err(KeyError::adaptation(
                    self,
                    format!("inet address must be 4 or 16 bytes, got {n}"),
                )),
            },
            LogicalType::Date => {
                let days = u32::from_be_bytes(exact(self, raw)?) as i64 - DATE_EPOCH_OFFSET;
                Ok(NativeValue::Int(days as i32))
            }
            LogicalType::Time => {
                let nanos = i64::from_be_bytes(exact(self, raw)?);
                check_time_of_day(self, nanos)?;
                Ok(NativeValue::Long(nanos))
            }
            LogicalType::Timestamp => {
                let millis = i64::from_be_bytes(exact(self, raw)?);
                // Instants past the calendar range stay as raw epoch millis.
                Ok(
                    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * NANOS_PER_MILLI)
                        .map_or(NativeValue::Long(millis), NativeValue::Timestamp),
                )
            }
            LogicalType::Uuid => Ok(NativeValue::Uuid(Uuid::from_bytes(exact(self, raw)?))),
            LogicalType::TimeUuid => {
                let uuid = Uuid::from_bytes(exact(self, raw)?);
                check_time_uuid(self, &uuid)?;
                Ok(NativeValue::Uuid(uuid))
            }
        }
    }

    /// Serializes a native value into this type's normalized wire form.
    pub fn decompose(self, value: &NativeValue) -> Result<Bytes> {
        let mut out = Vec::new();
        match (self, value) {
            (LogicalType::Ascii, NativeValue::Text(s)) => {
                if !s.is_ascii() {
                    return Err(KeyError::adaptation(self, "value contains non-ASCII characters"));
                }
                out.extend_from_slice(s.as_bytes());
            }
            (LogicalType::Ascii, NativeValue::Bytes(b)) if b.is_ascii() => out.extend_from_slice(b),
            (LogicalType::Text, NativeValue::Text(s)) => out.extend_from_slice(s.as_bytes()),
            (
                LogicalType::Bytes
                | LogicalType::Duration
                | LogicalType::Point
                | LogicalType::LineString
                | LogicalType::Polygon,
                NativeValue::Bytes(b),
            ) => out.extend_from_slice(b),
            (LogicalType::Boolean, NativeValue::Bool(v)) => out.push(u8::from(*v)),
            (LogicalType::TinyInt, NativeValue::Byte(v)) => out.push(*v as u8),
            (LogicalType::SmallInt, NativeValue::Short(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (LogicalType::Int, NativeValue::Int(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (LogicalType::BigInt | LogicalType::Counter, NativeValue::Long(v)) => {
                out.extend_from_slice(&v.to_be_bytes())
            }
            (LogicalType::VarInt, NativeValue::VarInt(v)) => {
                out.extend_from_slice(&v.to_signed_bytes_be())
            }
            (LogicalType::Decimal, NativeValue::Decimal(v)) => {
                let (unscaled, scale) = v.as_bigint_and_exponent();
                let scale = i32::try_from(scale)
                    .map_err(|_| KeyError::adaptation(self, "decimal scale exceeds 32 bits"))?;
                out.extend_from_slice(&scale.to_be_bytes());
                out.extend_from_slice(&unscaled.to_signed_bytes_be());
            }
            (LogicalType::Float, NativeValue::Float(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (LogicalType::Double, NativeValue::Double(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (LogicalType::Inet, NativeValue::Inet(addr)) => out.extend_from_slice(&inet_octets(addr)),
            (LogicalType::Date, NativeValue::Int(days)) => {
                let wire = (*days as i64 + DATE_EPOCH_OFFSET) as u32;
                out.extend_from_slice(&wire.to_be_bytes());
            }
            (LogicalType::Time, NativeValue::Long(nanos)) => {
                check_time_of_day(self, *nanos)?;
                out.extend_from_slice(&nanos.to_be_bytes());
            }
            (LogicalType::Timestamp, NativeValue::Long(millis)) => {
                out.extend_from_slice(&millis.to_be_bytes())
            }
            (LogicalType::Timestamp, NativeValue::Timestamp(instant)) => {
                let millis = epoch_millis(instant).ok_or_else(|| {
                    KeyError::adaptation(self, "timestamp is not a whole millisecond in range")
                })?;
                out.extend_from_slice(&millis.to_be_bytes());
            }
            (LogicalType::Uuid, NativeValue::Uuid(uuid)) => out.extend_from_slice(uuid.as_bytes()),
            (LogicalType::TimeUuid, NativeValue::Uuid(uuid)) => {
                check_time_uuid(self, uuid)?;
                out.extend_from_slice(uuid.as_bytes());
            }
            (ty, value) => {
                return Err(KeyError::adaptation(
                    ty,
                    format!("cannot serialize a {} value", value.kind_name()),
                ))
            }
        }
        Ok(Bytes::from(out))
    }
}

/// Milliseconds since the epoch, if `instant` sits on a whole millisecond.
pub(crate) fn epoch_millis(instant: &OffsetDateTime) -> Option<i64> {
    let nanos = instant.unix_timestamp_nanos();
    if nanos % NANOS_PER_MILLI != 0 {
        return None;
    }
    i64::try_from(nanos / NANOS_PER_MILLI).ok()
}

fn exact<const N: usize>(ty: LogicalType, raw: &[u8]) -> Result<[u8; N]> {
    if raw.len() != N {
        return Err(KeyError::adaptation(
            ty,
            format!("expected {N} bytes, got {}", raw.len()),
        ));
    }
    ord::head::<N>(raw).ok_or_else(|| KeyError::adaptation(ty, "value truncated"))
}

fn utf8(ty: LogicalType, raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec()).map_err(|err| KeyError::adaptation(ty, err.to_string()))
}

fn check_time_of_day(ty: LogicalType, nanos: i64) -> Result<()> {
    if !(0..NANOS_PER_DAY).contains(&nanos) {
        return Err(KeyError::adaptation(
            ty,
            format!("time of day {nanos}ns outside [0, {NANOS_PER_DAY})"),
        ));
    }
    Ok(())
}

fn check_time_uuid(ty: LogicalType, uuid: &Uuid) -> Result<()> {
    match uuid.get_version_num() {
        1 => Ok(()),
        v => Err(KeyError::adaptation(
            ty,
            format!("expected a version 1 UUID, got version {v}"),
        )),
    }
}
