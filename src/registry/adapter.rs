use crate::error::{KeyError, Result};
use crate::primitives::bytes::ord;
use crate::types::{LogicalType, NativeValue, RawValue};

/// Specialized conversions from a wire value into a codec's native input.
///
/// Types without an adapter are decoded by [`crate::LogicalType::compose`].
/// Adapters reject the same malformed inputs `compose` rejects, so the error
/// category does not depend on which path a registry takes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Adapter {
    /// Hands the wire bytes to the codec unchanged, as [`NativeValue::Bytes`],
    /// after checking they have the declared type's shape.
    UnwrapBuffer,
    /// Reads the wire timestamp as signed milliseconds since the epoch,
    /// yielding [`NativeValue::Long`].
    TimestampToEpoch,
}

impl Adapter {
    /// Converts `raw` into the codec's native input.
    pub fn apply(self, raw: &RawValue) -> Result<NativeValue> {
        match self {
            Adapter::UnwrapBuffer => {
                check_shape(raw)?;
                Ok(NativeValue::Bytes(raw.as_slice().to_vec()))
            }
            Adapter::TimestampToEpoch => {
                let bytes = raw.as_slice();
                let head = ord::head::<8>(bytes)
                    .filter(|_| bytes.len() == 8)
                    .ok_or_else(|| {
                        KeyError::adaptation(
                            raw.ty(),
                            format!("timestamp must be 8 bytes, got {}", bytes.len()),
                        )
                    })?;
                Ok(NativeValue::Long(i64::from_be_bytes(head)))
            }
        }
    }
}

fn check_shape(raw: &RawValue) -> Result<()> {
    let ty = raw.ty();
    let bytes = raw.as_slice();
    match ty {
        LogicalType::Ascii if !bytes.is_ascii() => Err(KeyError::adaptation(
            ty,
            "value contains non-ASCII bytes",
        )),
        LogicalType::Text => std::str::from_utf8(bytes)
            .map(|_| ())
            .map_err(|err| KeyError::adaptation(ty, err.to_string())),
        LogicalType::Inet if !matches!(bytes.len(), 4 | 16) => Err(KeyError::adaptation(
            ty,
            format!("inet address must be 4 or 16 bytes, got {}", bytes.len()),
        )),
        _ => Ok(()),
    }
}
