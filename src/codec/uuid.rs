//! UUID codecs.

use ::uuid::Uuid;

use crate::error::{KeyError, Result};
use crate::primitives::bytes::ord;
use crate::types::NativeValue;

use super::{mismatch, truncated, CodecKind, KeyCodec};

/// The 16 bytes as stored; orders as unsigned bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidCodec;

impl KeyCodec for UuidCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Uuid
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        match value {
            NativeValue::Uuid(uuid) => {
                out.extend_from_slice(uuid.as_bytes());
                Ok(())
            }
            other => Err(mismatch(self.kind(), "uuid", other)),
        }
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let head = ord::head::<16>(src).ok_or_else(|| truncated(self.kind(), 16, src.len()))?;
        Ok((NativeValue::Uuid(Uuid::from_bytes(head)), 16))
    }
}

/// Byte `i` of the encoding is byte `TIME_FIRST[i]` of the UUID: time_hi
/// (with its version nibble), time_mid, time_low, then clock sequence and node.
const TIME_FIRST: [usize; 16] = [6, 7, 4, 5, 0, 1, 2, 3, 8, 9, 10, 11, 12, 13, 14, 15];

/// Flipped into the clock sequence and node bytes so they order as signed bytes.
const TAIL_SIGN: u8 = 0x80;

/// Version 1 UUIDs reordered so the embedded timestamp leads.
///
/// The version nibble sits above the 12 high timestamp bits and is the same
/// for every accepted value, so byte order equals timestamp order. Ties on
/// the timestamp fall back to the clock sequence and node as signed bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeUuidCodec;

impl TimeUuidCodec {
    fn check_version(&self, uuid: &Uuid) -> Result<()> {
        match uuid.get_version_num() {
            1 => Ok(()),
            v => Err(KeyError::codec(
                self.kind(),
                format!("expected a version 1 UUID, got version {v}"),
            )),
        }
    }
}

impl KeyCodec for TimeUuidCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::TimeUuid
    }

    fn serialize(&mut self, value: &NativeValue, out: &mut Vec<u8>) -> Result<()> {
        let NativeValue::Uuid(uuid) = value else {
            return Err(mismatch(self.kind(), "uuid", value));
        };
        self.check_version(uuid)?;
        let bytes = uuid.as_bytes();
        out.extend(
            TIME_FIRST
                .iter()
                .map(|&i| if i < 8 { bytes[i] } else { bytes[i] ^ TAIL_SIGN }),
        );
        Ok(())
    }

    fn deserialize(&mut self, src: &[u8]) -> Result<(NativeValue, usize)> {
        let head = ord::head::<16>(src).ok_or_else(|| truncated(self.kind(), 16, src.len()))?;
        let mut bytes = [0u8; 16];
        for (pos, &i) in TIME_FIRST.iter().enumerate() {
            bytes[i] = if i < 8 { head[pos] } else { head[pos] ^ TAIL_SIGN };
        }
        let uuid = Uuid::from_bytes(bytes);
        self.check_version(&uuid)?;
        Ok((NativeValue::Uuid(uuid), 16))
    }
}
