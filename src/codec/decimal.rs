//! Arbitrary-precision decimals.
//!
//! A non-zero value is normalized to `±0.d1d2…dn × 10^e` with `d1 != 0` and
//! `dn != 0`. Layout:
//!
//! ```text
//! 0x80                                   zero
//! 0x81 | e (i32, sign flipped) | d+1 … | 0x00   positive
//! 0x7F | !e                    | 0xFE-d … | 0xFF negative
//! ```
//!
//! The negative form is the bitwise complement of the positive one, so larger
//! magnitudes sort lower. Scale is not preserved: `1.0` and `1.00` encode alike.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};

use crate::error::{KeyError, Result};
use crate::primitives::bytes::{buf::Cursor, ord};
use crate::types::NativeValue;

use super::varint::{NEGATIVE, POSITIVE, ZERO};
use super::{mismatch, truncated, CodecKind, KeyCodec};

const DIGITS_END: u8 = 0x00;

/// Length of the decimal at the front of `src`, reading every byte XORed with
/// `mask`. `None` when the header is invalid or the digits are unterminated.
pub(crate) fn extent(src: &[u8], mask: u8) -> Option<usize> {
    let flip = match src.first()? ^ mask {
        ZERO => return Some(1),
        NEGATIVE => !mask,
        POSITIVE => mask,
        _ => return None,
    };
    let digits = src.get(5..)?;
    digits
        .iter()
        .position(|b| b ^ flip == DIGITS_END)
        .map(|at| 5 + at + 1)
}

/// Normalized sign/exponent/digits codec for [`BigDecimal`].
#[derive(Clone, Debug, Default)]
pub struct DecimalCodec {
    digits: String,
}

impl DecimalCodec {
    /// Creates a codec with an empty digit buffer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyCodec for DecimalCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Decimal
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        let NativeValue::Decimal(dec) = value else {
            return Err(mismatch(self.kind(), "decimal", value));
        };
        let sign = dec.sign();
        if sign == Sign::NoSign {
            out.push(ZERO);
            return Ok(());
        }
        let (unscaled, scale) = dec.normalized().as_bigint_and_exponent();
        self.digits.clear();
        self.digits.push_str(&unscaled.magnitude().to_str_radix(10));
        let exponent = i64::try_from(self.digits.len())
            .ok()
            .and_then(|n| n.checked_sub(scale))
            .and_then(|e| i32::try_from(e).ok())
            .ok_or_else(|| KeyError::codec(self.kind(), "decimal exponent exceeds 32 bits"))?;

        let negative = sign == Sign::Minus;
        let start = out.len();
        out.push(POSITIVE);
        ord::put_i32(out, exponent);
        out.extend(self.digits.bytes().map(|d| d - b'0' + 1));
        out.push(DIGITS_END);
        if negative {
            for b in &mut out[start..] {
                *b = !*b;
            }
            // !POSITIVE is 0x7E; the header itself is not complemented.
            out[start] = NEGATIVE;
        }
        Ok(())
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let kind = self.kind();
        let mut cur = Cursor::new(src);
        let header = cur.take_u8().ok_or_else(|| truncated(kind, 1, 0))?;
        let negative = match header {
            ZERO => return Ok((NativeValue::Decimal(BigDecimal::from(0)), 1)),
            NEGATIVE => true,
            POSITIVE => false,
            other => {
                return Err(KeyError::codec(
                    kind,
                    format!("invalid sign header {other:#04x}"),
                ))
            }
        };
        let flip = |b: u8| if negative { !b } else { b };

        let mut raw_exp = cur
            .take_array::<4>()
            .ok_or_else(|| truncated(kind, 5, src.len()))?;
        raw_exp.iter_mut().for_each(|b| *b = flip(*b));
        let exponent = ord::get_i32(raw_exp);

        self.digits.clear();
        loop {
            let b = cur
                .take_u8()
                .map(flip)
                .ok_or_else(|| KeyError::codec(kind, "unterminated decimal digits"))?;
            match b {
                DIGITS_END => break,
                1..=10 => self.digits.push(char::from(b'0' + b - 1)),
                other => {
                    return Err(KeyError::codec(
                        kind,
                        format!("invalid digit byte {other:#04x}"),
                    ))
                }
            }
        }
        if self.digits.is_empty() || self.digits.starts_with('0') || self.digits.ends_with('0') {
            return Err(KeyError::codec(kind, "decimal digits are not normalized"));
        }

        let magnitude = BigUint::parse_bytes(self.digits.as_bytes(), 10)
            .ok_or_else(|| KeyError::codec(kind, "invalid decimal digits"))?;
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        let scale = self.digits.len() as i64 - i64::from(exponent);
        let value = BigDecimal::new(BigInt::from_biguint(sign, magnitude), scale);
        Ok((NativeValue::Decimal(value), cur.off))
    }
}
