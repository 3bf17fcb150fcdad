//! Terminated codecs for byte strings and UTF-8 text.
//!
//! The body is copied with every `0x00` rewritten to `0x00 0xFF` and closed by
//! `0x00 0x01`. A prefix therefore sorts before any extension of it, and
//! embedded NULs keep their place in byte order.

use crate::error::{KeyError, Result};
use crate::primitives::bytes::ord;
use crate::types::native::inet_octets;
use crate::types::NativeValue;

use super::{mismatch, CodecKind, KeyCodec};

/// Escaped, terminated byte string.
///
/// Accepts `Bytes`, `Text` (as its UTF-8 bytes) and `Inet` (as its octets);
/// always decodes to `Bytes`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VarBytesCodec;

impl KeyCodec for VarBytesCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::VarBytes
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        match value {
            NativeValue::Bytes(b) => ord::put_escaped(out, b),
            NativeValue::Text(s) => ord::put_escaped(out, s.as_bytes()),
            NativeValue::Inet(addr) => ord::put_escaped(out, &inet_octets(addr)),
            other => return Err(mismatch(self.kind(), "bytes", other)),
        }
        Ok(())
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let (body, used) = split(self.kind(), src)?;
        Ok((NativeValue::Bytes(body), used))
    }
}

/// Escaped, terminated UTF-8 string. Byte order equals code point order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8Codec;

impl KeyCodec for Utf8Codec {
    fn kind(&self) -> CodecKind {
        CodecKind::Utf8
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        match value {
            NativeValue::Text(s) => ord::put_escaped(out, s.as_bytes()),
            NativeValue::Bytes(b) => {
                std::str::from_utf8(b)
                    .map_err(|err| KeyError::codec(self.kind(), format!("invalid utf-8: {err}")))?;
                ord::put_escaped(out, b);
            }
            other => return Err(mismatch(self.kind(), "text", other)),
        }
        Ok(())
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let (body, used) = split(self.kind(), src)?;
        let text = String::from_utf8(body)
            .map_err(|err| KeyError::codec(self.kind(), format!("invalid utf-8: {err}")))?;
        Ok((NativeValue::Text(text), used))
    }
}

/// Length of the escaped string at the front of `src`, reading every byte
/// XORed with `mask`. `None` when no terminator is found.
pub(crate) fn extent(src: &[u8], mask: u8) -> Option<usize> {
    let mut idx = 0usize;
    while idx < src.len() {
        if src[idx] ^ mask != ord::ESCAPE {
            idx += 1;
            continue;
        }
        match src.get(idx + 1).map(|b| b ^ mask) {
            Some(ord::ESCAPED_NUL) => idx += 2,
            Some(ord::TERMINATOR) => return Some(idx + 2),
            _ => return None,
        }
    }
    None
}

fn split(kind: CodecKind, src: &[u8]) -> Result<(Vec<u8>, usize)> {
    ord::split_escaped(src)
        .ok_or_else(|| KeyError::codec(kind, "unterminated or malformed escaped string"))
}
