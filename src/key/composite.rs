use smallvec::SmallVec;

use crate::codec::CodecKind;
use crate::error::Result;
use crate::registry::KeyRegistry;
use crate::types::{LogicalType, NativeValue};

use super::{trailing, KeyPart, SortOrder};

/// Type and direction of one column in a composite key layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct KeyColumn {
    /// Column type.
    pub ty: LogicalType,
    /// Column sort order.
    pub order: SortOrder,
}

impl KeyColumn {
    /// Ascending column of type `ty`.
    pub const fn asc(ty: LogicalType) -> Self {
        Self {
            ty,
            order: SortOrder::Ascending,
        }
    }

    /// Descending column of type `ty`.
    pub const fn desc(ty: LogicalType) -> Self {
        Self {
            ty,
            order: SortOrder::Descending,
        }
    }
}

/// Store key built by concatenating encoded key parts.
///
/// Every part encoding is self-delimiting, so the concatenation sorts like
/// the tuple of part values and can be split back without extra framing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompositeKey {
    buf: Vec<u8>,
    parts: usize,
}

impl CompositeKey {
    /// Empty key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty key with room for `bytes` bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bytes),
            parts: 0,
        }
    }

    /// Appends one part. On error the key is unchanged.
    pub fn push(&mut self, part: &KeyPart<'_>) -> Result<&mut Self> {
        part.encode_into(&mut self.buf)?;
        self.parts += 1;
        Ok(self)
    }

    /// Appends parts in order, stopping at the first failure.
    pub fn extend<'p, 'r: 'p, I>(&mut self, parts: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = &'p KeyPart<'r>>,
    {
        for part in parts {
            self.push(part)?;
        }
        Ok(self)
    }

    /// Builds a key from a sequence of parts.
    pub fn from_parts<'p, 'r: 'p, I>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'p KeyPart<'r>>,
    {
        let mut key = Self::new();
        key.extend(parts)?;
        Ok(key)
    }

    /// Number of parts appended so far.
    pub fn len(&self) -> usize {
        self.parts
    }

    /// Returns `true` when no part has been appended.
    pub fn is_empty(&self) -> bool {
        self.parts == 0
    }

    /// Encoded bytes so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Clears the key, keeping its allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.parts = 0;
    }

    /// Consumes the builder and returns the key bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Decodes a composite key into one native value per column of `layout`.
    ///
    /// Fails with a codec error when the bytes end early or continue past the
    /// last column.
    pub fn split(
        registry: &KeyRegistry,
        bytes: &[u8],
        layout: &[KeyColumn],
    ) -> Result<SmallVec<[NativeValue; 4]>> {
        let mut values = SmallVec::with_capacity(layout.len());
        let mut off = 0usize;
        for column in layout {
            let (value, used) =
                KeyPart::decode_prefix(registry, &bytes[off..], column.ty, column.order)?;
            values.push(value);
            off += used;
        }
        if off != bytes.len() {
            let kind = match layout.last() {
                Some(column) => registry.resolve(column.ty)?,
                // Nothing was decoded, so the bytes are an uninterpreted string.
                None => CodecKind::VarBytes,
            };
            return Err(trailing(kind, bytes.len() - off));
        }
        Ok(values)
    }

    /// Smallest key greater than every key starting with `prefix`, or `None`
    /// when no such bound exists (empty or all-`0xFF` prefix).
    pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
        let last = prefix.iter().rposition(|&b| b != 0xFF)?;
        let mut bound = prefix[..=last].to_vec();
        bound[last] += 1;
        Some(bound)
    }
}

impl AsRef<[u8]> for CompositeKey {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
