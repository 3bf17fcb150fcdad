//! Arbitrary-precision integers.
//!
//! Layout: a sign header (`0x7F` negative, `0x80` zero, `0x81` positive), then
//! for non-zero values the magnitude length as a big-endian `u32` and the
//! minimal big-endian magnitude. Negative values complement both length and
//! magnitude so that larger magnitudes sort lower.

use num_bigint::{BigInt, Sign};

use crate::error::{KeyError, Result};
use crate::primitives::bytes::buf::Cursor;
use crate::types::NativeValue;

use super::{mismatch, truncated, CodecKind, KeyCodec};

pub(crate) const NEGATIVE: u8 = 0x7F;
pub(crate) const ZERO: u8 = 0x80;
pub(crate) const POSITIVE: u8 = 0x81;

/// Length of the varint at the front of `src`, reading every byte XORed with
/// `mask`. `None` when the header is invalid or the bytes end early.
pub(crate) fn extent(src: &[u8], mask: u8) -> Option<usize> {
    let negative = match src.first()? ^ mask {
        ZERO => return Some(1),
        NEGATIVE => true,
        POSITIVE => false,
        _ => return None,
    };
    let mut raw_len: [u8; 4] = src.get(1..5)?.try_into().ok()?;
    raw_len.iter_mut().for_each(|b| *b ^= mask);
    let mut len = u32::from_be_bytes(raw_len);
    if negative {
        len = !len;
    }
    let end = usize::try_from(len).ok()?.checked_add(5)?;
    (end <= src.len()).then_some(end)
}

/// Sign-headed, length-prefixed big integer codec.
#[derive(Clone, Debug, Default)]
pub struct VarIntCodec {
    scratch: Vec<u8>,
}

impl VarIntCodec {
    /// Creates a codec with an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyCodec for VarIntCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::VarInt
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        let owned;
        let int = match value {
            NativeValue::VarInt(v) => v,
            NativeValue::Long(v) => {
                owned = BigInt::from(*v);
                &owned
            }
            other => return Err(mismatch(self.kind(), "varint", other)),
        };
        let (sign, magnitude) = int.to_bytes_be();
        if sign == Sign::NoSign {
            out.push(ZERO);
            return Ok(());
        }
        let len = u32::try_from(magnitude.len())
            .map_err(|_| KeyError::codec(self.kind(), "magnitude exceeds u32::MAX bytes"))?;
        if sign == Sign::Minus {
            out.push(NEGATIVE);
            out.extend_from_slice(&(!len).to_be_bytes());
            out.extend(magnitude.iter().map(|b| !b));
        } else {
            out.push(POSITIVE);
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(&magnitude);
        }
        Ok(())
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let kind = self.kind();
        let mut cur = Cursor::new(src);
        let header = cur.take_u8().ok_or_else(|| truncated(kind, 1, 0))?;
        let negative = match header {
            ZERO => return Ok((NativeValue::VarInt(BigInt::from(0)), 1)),
            NEGATIVE => true,
            POSITIVE => false,
            other => {
                return Err(KeyError::codec(
                    kind,
                    format!("invalid sign header {other:#04x}"),
                ))
            }
        };
        let raw_len = cur
            .take_array::<4>()
            .ok_or_else(|| truncated(kind, 5, src.len()))?;
        let mut len = u32::from_be_bytes(raw_len);
        if negative {
            len = !len;
        }
        let len = len as usize;
        let body = cur
            .take(len)
            .ok_or_else(|| truncated(kind, 5 + len, src.len()))?;

        self.scratch.clear();
        if negative {
            self.scratch.extend(body.iter().map(|b| !b));
        } else {
            self.scratch.extend_from_slice(body);
        }
        if self.scratch.first().map_or(true, |&b| b == 0) {
            return Err(KeyError::codec(kind, "magnitude is empty or not minimal"));
        }
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Ok((
            NativeValue::VarInt(BigInt::from_bytes_be(sign, &self.scratch)),
            cur.off,
        ))
    }
}
