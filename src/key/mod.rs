#![forbid(unsafe_code)]
//! Key parts: one column value bound to its type and sort order.

use std::fmt;

use bytes::Bytes;
use tracing::{trace, warn};

use crate::codec::{Codec, CodecKind, KeyCodec};
use crate::error::{KeyError, Result};
use crate::registry::KeyRegistry;
use crate::types::{LogicalType, NativeValue, RawValue};

mod composite;

pub use composite::{CompositeKey, KeyColumn};

/// Direction a key part sorts in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SortOrder {
    /// Native order.
    #[default]
    Ascending,
    /// Reversed order; the part is stored as the complement of its ascending
    /// encoding.
    Descending,
}

impl SortOrder {
    /// Returns `true` for [`SortOrder::Descending`].
    pub fn is_descending(self) -> bool {
        self == SortOrder::Descending
    }
}

/// One column value ready to be encoded into a key.
///
/// Construction only succeeds for types the registry supports; the value
/// itself is not inspected until it is adapted or encoded.
#[derive(Clone)]
pub struct KeyPart<'r> {
    registry: &'r KeyRegistry,
    raw: RawValue,
    codec: CodecKind,
    order: SortOrder,
}

impl<'r> KeyPart<'r> {
    /// Binds a wire value to `ty`, failing with [`KeyError::UnsupportedType`]
    /// when the registry has no codec for it.
    pub fn new(registry: &'r KeyRegistry, value: impl Into<Bytes>, ty: LogicalType) -> Result<Self> {
        Self::from_raw(registry, RawValue::new(ty, value))
    }

    /// Like [`KeyPart::new`] for an already tagged value.
    pub fn from_raw(registry: &'r KeyRegistry, raw: RawValue) -> Result<Self> {
        let codec = resolve(registry, raw.ty())?;
        Ok(Self {
            registry,
            raw,
            codec,
            order: SortOrder::Ascending,
        })
    }

    /// Builds a part from a native value by first serializing it to the
    /// type's wire form. Mostly useful for fixtures.
    pub fn from_native(
        registry: &'r KeyRegistry,
        value: &NativeValue,
        ty: LogicalType,
    ) -> Result<Self> {
        resolve(registry, ty)?;
        let wire = ty.decompose(value)?;
        Self::from_raw(registry, RawValue::new(ty, wire))
    }

    /// Sets the sort order of this part.
    #[must_use]
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Declared column type.
    pub fn ty(&self) -> LogicalType {
        self.raw.ty()
    }

    /// The wire value.
    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    /// Sort order of this part.
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Kind of codec that encodes this part.
    pub fn codec_kind(&self) -> CodecKind {
        self.codec
    }

    /// A fresh codec instance for this part's type.
    pub fn resolved_codec(&self) -> Codec {
        self.codec.create()
    }

    /// The value in the native form the codec consumes.
    pub fn adapted_value(&self) -> Result<NativeValue> {
        self.registry.adapt(&self.raw)
    }

    /// Encodes the part into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Appends the encoded part to `out`. On error `out` is left unchanged.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        let native = self.adapted_value()?;
        if let Err(err) = self.resolved_codec().serialize(&native, out) {
            out.truncate(start);
            return Err(err);
        }
        if self.order.is_descending() {
            complement(&mut out[start..]);
        }
        trace!(
            ty = %self.ty(),
            order = ?self.order,
            key = %hex::encode(&out[start..]),
            "keycodec.key_part.encoded"
        );
        Ok(())
    }

    /// Decodes bytes holding exactly one ascending part of type `ty`.
    pub fn decode(registry: &KeyRegistry, bytes: &[u8], ty: LogicalType) -> Result<NativeValue> {
        let (value, used) = Self::decode_prefix(registry, bytes, ty, SortOrder::Ascending)?;
        if used != bytes.len() {
            return Err(trailing(registry.resolve(ty)?, bytes.len() - used));
        }
        Ok(value)
    }

    /// Decodes one part of type `ty` from the front of `src`, returning the
    /// value and the number of bytes it occupied.
    pub fn decode_prefix(
        registry: &KeyRegistry,
        src: &[u8],
        ty: LogicalType,
        order: SortOrder,
    ) -> Result<(NativeValue, usize)> {
        let kind = registry.resolve(ty)?;
        let mut codec = kind.create();
        let (value, used) = match order {
            SortOrder::Ascending => codec.deserialize(src)?,
            SortOrder::Descending => {
                // Incomplete input is flipped whole so the codec reports it.
                let span = kind.extent(src, 0xFF).map_or(src, |n| &src[..n]);
                let mut flipped = span.to_vec();
                complement(&mut flipped);
                codec.deserialize(&flipped)?
            }
        };
        trace!(
            ty = %ty,
            order = ?order,
            key = %hex::encode(&src[..used]),
            "keycodec.key_part.decoded"
        );
        Ok((value, used))
    }
}

impl fmt::Debug for KeyPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPart")
            .field("raw", &self.raw)
            .field("codec", &self.codec)
            .field("order", &self.order)
            .finish()
    }
}

fn resolve(registry: &KeyRegistry, ty: LogicalType) -> Result<CodecKind> {
    registry.resolve(ty).map_err(|err| {
        warn!(ty = %ty, "keycodec.key_part.unsupported_type");
        err
    })
}

fn complement(bytes: &mut [u8]) {
    for b in bytes {
        *b = !*b;
    }
}

pub(crate) fn trailing(kind: CodecKind, extra: usize) -> KeyError {
    KeyError::codec(kind, format!("{extra} trailing bytes after key"))
}
