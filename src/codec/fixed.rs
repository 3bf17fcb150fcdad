//! Fixed-width codecs: booleans, sign-flipped big-endian integers and IEEE floats.

use crate::error::{KeyError, Result};
use crate::primitives::bytes::ord;
use crate::types::wire::epoch_millis;
use crate::types::NativeValue;

use super::{mismatch, truncated, CodecKind, KeyCodec};

/// `false` → `0x00`, `true` → `0x01`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolCodec;

impl KeyCodec for BoolCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Bool
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        match value {
            NativeValue::Bool(v) => {
                out.push(u8::from(*v));
                Ok(())
            }
            other => Err(mismatch(self.kind(), "bool", other)),
        }
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        match src.first() {
            Some(0) => Ok((NativeValue::Bool(false), 1)),
            Some(1) => Ok((NativeValue::Bool(true), 1)),
            Some(b) => Err(KeyError::codec(
                self.kind(),
                format!("invalid bool byte {b:#04x}"),
            )),
            None => Err(truncated(self.kind(), 1, 0)),
        }
    }
}

macro_rules! int_codec {
    (
        $(#[$doc:meta])*
        $name:ident, $kind:ident, $width:literal, $expected:literal,
        put = $put:path, get = $get:path,
        accept = |$v:ident| { $($pat:pat => $conv:expr),+ $(,)? },
        emit = $variant:ident $(,)?
    ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl KeyCodec for $name {
            fn kind(&self) -> CodecKind {
                CodecKind::$kind
            }

            fn serialize(&mut self, $v: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
                let native = match $v {
                    $($pat => $conv,)+
                    other => return Err(mismatch(self.kind(), $expected, other)),
                };
                $put(out, native);
                Ok(())
            }

            fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
                let head = ord::head::<$width>(src)
                    .ok_or_else(|| truncated(self.kind(), $width, src.len()))?;
                Ok((NativeValue::$variant($get(head)), $width))
            }
        }
    };
}

int_codec!(
    /// 8-bit signed integer with the sign bit flipped.
    ByteCodec, Byte, 1, "byte",
    put = ord::put_i8, get = get_i8_array,
    accept = |value| { NativeValue::Byte(v) => *v },
    emit = Byte,
);

int_codec!(
    /// 16-bit signed integer, sign bit flipped, big-endian.
    ShortCodec, Short, 2, "short",
    put = ord::put_i16, get = ord::get_i16,
    accept = |value| { NativeValue::Short(v) => *v },
    emit = Short,
);

int_codec!(
    /// 32-bit signed integer, sign bit flipped, big-endian. Also carries dates
    /// as signed days since the epoch.
    IntCodec, Int, 4, "int",
    put = ord::put_i32, get = ord::get_i32,
    accept = |value| { NativeValue::Int(v) => *v },
    emit = Int,
);

int_codec!(
    /// 64-bit signed integer, sign bit flipped, big-endian. Also carries times of
    /// day (nanoseconds) and timestamps (milliseconds since the epoch).
    LongCodec, Long, 8, "long",
    put = ord::put_i64, get = ord::get_i64,
    accept = |value| {
        NativeValue::Long(v) => *v,
        NativeValue::Timestamp(instant) => epoch_millis(instant).ok_or_else(|| {
            KeyError::codec(CodecKind::Long, "timestamp is not a whole millisecond in range")
        })?,
    },
    emit = Long,
);

fn get_i8_array(src: [u8; 1]) -> i8 {
    ord::get_i8(src[0])
}

/// IEEE single precision in total order; NaN is canonicalized and sorts last.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatCodec;

impl KeyCodec for FloatCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Float
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        match value {
            NativeValue::Float(v) => {
                ord::put_f32(out, *v);
                Ok(())
            }
            other => Err(mismatch(self.kind(), "float", other)),
        }
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let head = ord::head::<4>(src).ok_or_else(|| truncated(self.kind(), 4, src.len()))?;
        Ok((NativeValue::Float(ord::get_f32(head)), 4))
    }
}

/// IEEE double precision in total order; NaN is canonicalized and sorts last.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleCodec;

impl KeyCodec for DoubleCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Double
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        match value {
            NativeValue::Double(v) => {
                ord::put_f64(out, *v);
                Ok(())
            }
            other => Err(mismatch(self.kind(), "double", other)),
        }
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let head = ord::head::<8>(src).ok_or_else(|| truncated(self.kind(), 8, src.len()))?;
        Ok((NativeValue::Double(ord::get_f64(head)), 8))
    }
}
