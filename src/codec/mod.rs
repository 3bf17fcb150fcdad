#![forbid(unsafe_code)]
//! Order-preserving codecs, one per primitive type family.
//!
//! Every codec guarantees that for two native values `a` and `b` of its family,
//! `a < b` under the family's native ordering exactly when
//! `encode(a) < encode(b)` byte-wise. Every encoding is also self-delimiting
//! (see [`Width`]), so codec outputs can be concatenated into composite keys
//! without any extra framing.

use std::fmt;

use crate::error::{KeyError, Result};
use crate::types::NativeValue;

mod bytes;
mod decimal;
mod fixed;
mod uuid;
mod varint;

pub use self::bytes::{Utf8Codec, VarBytesCodec};
pub use self::decimal::DecimalCodec;
pub use self::fixed::{
    BoolCodec, ByteCodec, DoubleCodec, FloatCodec, IntCodec, LongCodec, ShortCodec,
};
pub use self::uuid::{TimeUuidCodec, UuidCodec};
pub use self::varint::VarIntCodec;

/// Shape of a codec's output, which tells key assemblers how parts delimit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Width {
    /// Always exactly this many bytes.
    Fixed(usize),
    /// Escaped body (`0x00` → `0x00 0xFF`) closed by `0x00 0x01`.
    Terminated,
    /// A leading sign/length header determines where the encoding ends.
    SelfDescribing,
}

impl Width {
    /// Returns `true` when the codec always emits the same number of bytes.
    pub fn is_fixed(self) -> bool {
        matches!(self, Width::Fixed(_))
    }
}

/// Capability shared by every order-preserving codec.
///
/// Codec instances may keep scratch buffers between calls, hence `&mut self`;
/// an instance is owned by a single encode or decode operation.
pub trait KeyCodec {
    /// Identifies the codec.
    fn kind(&self) -> CodecKind;

    /// Appends the order-preserving encoding of `value` to `out`.
    ///
    /// On error `out` may hold a partial encoding; callers truncate it.
    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()>;

    /// Decodes one value from the front of `src`, returning it together with
    /// the number of bytes consumed.
    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)>;

    /// Encodes `value` into a fresh buffer.
    fn encode(&mut self, value: &NativeValue) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.serialize(value, &mut out)?;
        Ok(out)
    }

    /// Decodes a buffer that must hold exactly one encoded value.
    fn decode(&mut self, src: &[u8]) -> Result<NativeValue> {
        let (value, consumed) = self.deserialize(src)?;
        if consumed != src.len() {
            return Err(KeyError::codec(
                self.kind(),
                format!("{} trailing bytes after value", src.len() - consumed),
            ));
        }
        Ok(value)
    }
}

/// The closed set of codecs. Each variant doubles as the factory for its codec.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CodecKind {
    /// [`BoolCodec`].
    Bool,
    /// [`ByteCodec`].
    Byte,
    /// [`ShortCodec`].
    Short,
    /// [`IntCodec`].
    Int,
    /// [`LongCodec`].
    Long,
    /// [`FloatCodec`].
    Float,
    /// [`DoubleCodec`].
    Double,
    /// [`VarIntCodec`].
    VarInt,
    /// [`DecimalCodec`].
    Decimal,
    /// [`VarBytesCodec`].
    VarBytes,
    /// [`Utf8Codec`].
    Utf8,
    /// [`UuidCodec`].
    Uuid,
    /// [`TimeUuidCodec`].
    TimeUuid,
}

impl CodecKind {
    /// Creates a fresh codec instance.
    pub fn create(self) -> Codec {
        match self {
            CodecKind::Bool => Codec::Bool(BoolCodec),
            CodecKind::Byte => Codec::Byte(ByteCodec),
            CodecKind::Short => Codec::Short(ShortCodec),
            CodecKind::Int => Codec::Int(IntCodec),
            CodecKind::Long => Codec::Long(LongCodec),
            CodecKind::Float => Codec::Float(FloatCodec),
            CodecKind::Double => Codec::Double(DoubleCodec),
            CodecKind::VarInt => Codec::VarInt(VarIntCodec::new()),
            CodecKind::Decimal => Codec::Decimal(DecimalCodec::new()),
            CodecKind::VarBytes => Codec::VarBytes(VarBytesCodec),
            CodecKind::Utf8 => Codec::Utf8(Utf8Codec),
            CodecKind::Uuid => Codec::Uuid(UuidCodec),
            CodecKind::TimeUuid => Codec::TimeUuid(TimeUuidCodec),
        }
    }

    /// Output shape of the codec.
    pub const fn width(self) -> Width {
        match self {
            CodecKind::Bool | CodecKind::Byte => Width::Fixed(1),
            CodecKind::Short => Width::Fixed(2),
            CodecKind::Int | CodecKind::Float => Width::Fixed(4),
            CodecKind::Long | CodecKind::Double => Width::Fixed(8),
            CodecKind::Uuid | CodecKind::TimeUuid => Width::Fixed(16),
            CodecKind::VarInt | CodecKind::Decimal => Width::SelfDescribing,
            CodecKind::VarBytes | CodecKind::Utf8 => Width::Terminated,
        }
    }

    /// Number of bytes the encoding at the front of `src` occupies, reading
    /// every byte XORed with `mask` (`0xFF` for a descending part). `None`
    /// when the bytes do not hold a complete encoding.
    pub(crate) fn extent(self, src: &[u8], mask: u8) -> Option<usize> {
        match self {
            CodecKind::VarInt => self::varint::extent(src, mask),
            CodecKind::Decimal => self::decimal::extent(src, mask),
            CodecKind::VarBytes | CodecKind::Utf8 => self::bytes::extent(src, mask),
            fixed => match fixed.width() {
                Width::Fixed(n) => (n <= src.len()).then_some(n),
                Width::Terminated | Width::SelfDescribing => None,
            },
        }
    }

    /// Stable lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            CodecKind::Bool => "bool",
            CodecKind::Byte => "byte",
            CodecKind::Short => "short",
            CodecKind::Int => "int",
            CodecKind::Long => "long",
            CodecKind::Float => "float",
            CodecKind::Double => "double",
            CodecKind::VarInt => "varint",
            CodecKind::Decimal => "decimal",
            CodecKind::VarBytes => "varbytes",
            CodecKind::Utf8 => "utf8",
            CodecKind::Uuid => "uuid",
            CodecKind::TimeUuid => "timeuuid",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A codec instance produced by [`CodecKind::create`].
#[derive(Debug)]
pub enum Codec {
    /// See [`BoolCodec`].
    Bool(BoolCodec),
    /// See [`ByteCodec`].
    Byte(ByteCodec),
    /// See [`ShortCodec`].
    Short(ShortCodec),
    /// See [`IntCodec`].
    Int(IntCodec),
    /// See [`LongCodec`].
    Long(LongCodec),
    /// See [`FloatCodec`].
    Float(FloatCodec),
    /// See [`DoubleCodec`].
    Double(DoubleCodec),
    /// See [`VarIntCodec`].
    VarInt(VarIntCodec),
    /// See [`DecimalCodec`].
    Decimal(DecimalCodec),
    /// See [`VarBytesCodec`].
    VarBytes(VarBytesCodec),
    /// See [`Utf8Codec`].
    Utf8(Utf8Codec),
    /// See [`UuidCodec`].
    Uuid(UuidCodec),
    /// See [`TimeUuidCodec`].
    TimeUuid(TimeUuidCodec),
}

macro_rules! dispatch {
    ($self:expr, $codec:ident => $body:expr) => {
        match $self {
            Codec::Bool($codec) => $body,
            Codec::Byte($codec) => $body,
            Codec::Short($codec) => $body,
            Codec::Int($codec) => $body,
            Codec::Long($codec) => $body,
            Codec::Float($codec) => $body,
            Codec::Double($codec) => $body,
            Codec::VarInt($codec) => $body,
            Codec::Decimal($codec) => $body,
            Codec::VarBytes($codec) => $body,
            Codec::Utf8($codec) => $body,
            Codec::Uuid($codec) => $body,
            Codec::TimeUuid($codec) => $body,
        }
    };
}

impl KeyCodec for Codec {
    fn kind(&self) -> CodecKind {
        dispatch!(self, codec => codec.kind())
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        dispatch!(self, codec => codec.serialize(value, out))
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        dispatch!(self, codec => codec.deserialize(src))
    }
}

/// Error for a native value the codec does not accept.
pub(crate) fn mismatch(kind: CodecKind, expected: &str, got: &NativeValue) -> KeyError {
    KeyError::codec(
        kind,
        format!("expected {expected}, got {}", got.kind_name()),
    )
}

/// Error for key bytes that end before the value does.
pub(crate) fn truncated(kind: CodecKind, need: usize, have: usize) -> KeyError {
    KeyError::codec(
        kind,
        format!("key truncated: need {need} bytes, have {have}"),
    )
}
