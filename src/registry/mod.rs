#![forbid(unsafe_code)]
//! Codec factory and input adapter tables.
//!
//! A [`KeyRegistry`] is built once and then only read, so it is shared by
//! reference (or behind an `Arc`) between any number of threads.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::codec::CodecKind;
use crate::error::{KeyError, Result};
use crate::types::{LogicalType, NativeValue, RawValue};

mod adapter;
mod options;

pub use adapter::Adapter;
pub use options::{AdapterSection, ConfigError, KeyCodecOptions, RegistrySection};

/// Codec for each type in the full catalog, or `None` for types that cannot
/// appear in a key.
const fn standard_codec(ty: LogicalType) -> Option<CodecKind> {
    match ty {
        LogicalType::Ascii | LogicalType::Bytes | LogicalType::Inet => Some(CodecKind::VarBytes),
        LogicalType::Text => Some(CodecKind::Utf8),
        LogicalType::Boolean => Some(CodecKind::Bool),
        LogicalType::TinyInt => Some(CodecKind::Byte),
        LogicalType::SmallInt => Some(CodecKind::Short),
        LogicalType::Int | LogicalType::Date => Some(CodecKind::Int),
        LogicalType::BigInt | LogicalType::Time | LogicalType::Timestamp => Some(CodecKind::Long),
        LogicalType::VarInt => Some(CodecKind::VarInt),
        LogicalType::Decimal => Some(CodecKind::Decimal),
        LogicalType::Float => Some(CodecKind::Float),
        LogicalType::Double => Some(CodecKind::Double),
        LogicalType::Uuid => Some(CodecKind::Uuid),
        LogicalType::TimeUuid => Some(CodecKind::TimeUuid),
        LogicalType::Counter
        | LogicalType::Duration
        | LogicalType::Point
        | LogicalType::LineString
        | LogicalType::Polygon => None,
    }
}

const fn standard_adapter(ty: LogicalType) -> Option<Adapter> {
    match ty {
        LogicalType::Ascii | LogicalType::Bytes | LogicalType::Inet | LogicalType::Text => {
            Some(Adapter::UnwrapBuffer)
        }
        LogicalType::Timestamp => Some(Adapter::TimestampToEpoch),
        _ => None,
    }
}

/// Immutable lookup tables from column type to codec and adapter.
#[derive(Clone, Debug)]
pub struct KeyRegistry {
    factories: FxHashMap<LogicalType, CodecKind>,
    adapters: FxHashMap<LogicalType, Adapter>,
}

impl KeyRegistry {
    /// Registry with every keyable type and every specialized adapter.
    pub fn standard() -> Self {
        Self::from_options(&KeyCodecOptions::default())
    }

    /// Registry with the types and adapters named in `opts` removed.
    pub fn from_options(opts: &KeyCodecOptions) -> Self {
        let factories: FxHashMap<_, _> = LogicalType::ALL
            .iter()
            .filter(|ty| opts.type_enabled(**ty))
            .filter_map(|&ty| standard_codec(ty).map(|kind| (ty, kind)))
            .collect();
        let adapters: FxHashMap<_, _> = LogicalType::ALL
            .iter()
            .filter(|ty| opts.adapter_enabled(**ty) && factories.contains_key(*ty))
            .filter_map(|&ty| standard_adapter(ty).map(|adapter| (ty, adapter)))
            .collect();
        debug!(
            factories = factories.len(),
            adapters = adapters.len(),
            disabled_types = ?opts.registry.disabled,
            disabled_adapters = ?opts.adapters.disabled,
            "keycodec.registry.built"
        );
        Self {
            factories,
            adapters,
        }
    }

    /// Codec for `ty`, or [`KeyError::UnsupportedType`].
    pub fn resolve(&self, ty: LogicalType) -> Result<CodecKind> {
        self.factories
            .get(&ty)
            .copied()
            .ok_or(KeyError::UnsupportedType { ty })
    }

    /// Returns `true` when values of `ty` can be encoded.
    pub fn supports(&self, ty: LogicalType) -> bool {
        self.factories.contains_key(&ty)
    }

    /// Supported types in catalog order.
    pub fn supported_types(&self) -> Vec<LogicalType> {
        LogicalType::ALL
            .into_iter()
            .filter(|ty| self.supports(*ty))
            .collect()
    }

    /// Specialized adapter registered for `ty`, if any.
    pub fn adapter(&self, ty: LogicalType) -> Option<Adapter> {
        self.adapters.get(&ty).copied()
    }

    /// Converts `raw` into its codec's native input: the specialized adapter
    /// when one is registered, the type's generic decomposition otherwise.
    pub fn adapt(&self, raw: &RawValue) -> Result<NativeValue> {
        match self.adapter(raw.ty()) {
            Some(adapter) => adapter.apply(raw),
            None => raw.ty().compose(raw.as_slice()),
        }
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
