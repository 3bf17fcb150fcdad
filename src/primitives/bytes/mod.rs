#![forbid(unsafe_code)]
//! Order-preserving byte encoders and a checked cursor shared by the key codecs.

pub mod ord {
    //! Order-preserving encoders for fixed-width numerics and escaped byte strings.
    //!
    //! Signed integers flip their sign bit and are written big-endian. Floats use
    //! the usual IEEE trick: negative values invert every bit, non-negative values
    //! flip only the sign bit. Byte strings escape `0x00` as `0x00 0xFF` and end
    //! with `0x00 0x01`, so no encoded string is a proper prefix of another.

    use core::convert::TryInto;

    const SIGN_BIT_64: u64 = 1 << 63;
    const SIGN_BIT_32: u32 = 1 << 31;

    /// Marker byte opening an escape sequence or the terminator.
    pub const ESCAPE: u8 = 0x00;
    /// Follows [`ESCAPE`] to encode a literal `0x00` inside the body.
    pub const ESCAPED_NUL: u8 = 0xFF;
    /// Follows [`ESCAPE`] to end the string.
    pub const TERMINATOR: u8 = 0x01;

    /// Appends an `i8` with its sign bit flipped.
    pub fn put_i8(dst: &mut Vec<u8>, v: i8) {
        dst.push((v as u8) ^ 0x80);
    }

    /// Decodes an `i8` written by [`put_i8`].
    pub fn get_i8(b: u8) -> i8 {
        (b ^ 0x80) as i8
    }

    /// Appends an `i16` big-endian with its sign bit flipped.
    pub fn put_i16(dst: &mut Vec<u8>, v: i16) {
        dst.extend_from_slice(&((v as u16) ^ 0x8000).to_be_bytes());
    }

    /// Decodes an `i16` written by [`put_i16`].
    pub fn get_i16(src: [u8; 2]) -> i16 {
        (u16::from_be_bytes(src) ^ 0x8000) as i16
    }

    /// Appends an `i32` big-endian with its sign bit flipped.
    pub fn put_i32(dst: &mut Vec<u8>, v: i32) {
        dst.extend_from_slice(&((v as u32) ^ SIGN_BIT_32).to_be_bytes());
    }

    /// Decodes an `i32` written by [`put_i32`].
    pub fn get_i32(src: [u8; 4]) -> i32 {
        (u32::from_be_bytes(src) ^ SIGN_BIT_32) as i32
    }

    /// Appends an `i64` big-endian with its sign bit flipped.
    pub fn put_i64(dst: &mut Vec<u8>, v: i64) {
        dst.extend_from_slice(&((v as u64) ^ SIGN_BIT_64).to_be_bytes());
    }

    /// Decodes an `i64` written by [`put_i64`].
    pub fn get_i64(src: [u8; 8]) -> i64 {
        (u64::from_be_bytes(src) ^ SIGN_BIT_64) as i64
    }

    /// Appends an `f32`; every NaN is written as the canonical quiet NaN.
    pub fn put_f32(dst: &mut Vec<u8>, v: f32) {
        let v = if v.is_nan() { f32::NAN } else { v };
        let bits = v.to_bits();
        let encoded = if bits & SIGN_BIT_32 != 0 {
            !bits
        } else {
            bits ^ SIGN_BIT_32
        };
        dst.extend_from_slice(&encoded.to_be_bytes());
    }

    /// Decodes an `f32` written by [`put_f32`].
    pub fn get_f32(src: [u8; 4]) -> f32 {
        let encoded = u32::from_be_bytes(src);
        let bits = if encoded & SIGN_BIT_32 != 0 {
            encoded ^ SIGN_BIT_32
        } else {
            !encoded
        };
        f32::from_bits(bits)
    }

    /// Appends an `f64`; every NaN is written as the canonical quiet NaN.
    pub fn put_f64(dst: &mut Vec<u8>, v: f64) {
        let v = if v.is_nan() { f64::NAN } else { v };
        dst.extend_from_slice(&encode_f64_bits(v).to_be_bytes());
    }

    /// Decodes an `f64` written by [`put_f64`].
    pub fn get_f64(src: [u8; 8]) -> f64 {
        f64::from_bits(decode_f64_bits(u64::from_be_bytes(src)))
    }

    /// Appends `bytes` with embedded NULs escaped, followed by the terminator.
    pub fn put_escaped(dst: &mut Vec<u8>, bytes: &[u8]) {
        dst.reserve(bytes.len() + 2);
        for &b in bytes {
            if b == ESCAPE {
                dst.push(ESCAPE);
                dst.push(ESCAPED_NUL);
            } else {
                dst.push(b);
            }
        }
        dst.push(ESCAPE);
        dst.push(TERMINATOR);
    }

    /// Splits an escaped string off the front of `src`.
    ///
    /// Returns the unescaped body and the number of input bytes consumed
    /// (terminator included), or `None` when the input is truncated or holds an
    /// invalid escape sequence.
    pub fn split_escaped(src: &[u8]) -> Option<(Vec<u8>, usize)> {
        let mut body = Vec::with_capacity(src.len().saturating_sub(2));
        let mut idx = 0usize;
        while idx < src.len() {
            let b = src[idx];
            if b != ESCAPE {
                body.push(b);
                idx += 1;
                continue;
            }
            match src.get(idx + 1).copied() {
                Some(ESCAPED_NUL) => {
                    body.push(0);
                    idx += 2;
                }
                Some(TERMINATOR) => return Some((body, idx + 2)),
                _ => return None,
            }
        }
        None
    }

    /// Reads a fixed-size array from the front of `src`.
    pub fn head<const N: usize>(src: &[u8]) -> Option<[u8; N]> {
        src.get(..N).and_then(|head| head.try_into().ok())
    }

    fn encode_f64_bits(v: f64) -> u64 {
        let bits = v.to_bits();
        if bits & SIGN_BIT_64 != 0 {
            !bits
        } else {
            bits ^ SIGN_BIT_64
        }
    }

    fn decode_f64_bits(encoded: u64) -> u64 {
        if encoded & SIGN_BIT_64 != 0 {
            encoded ^ SIGN_BIT_64
        } else {
            !encoded
        }
    }
}

pub mod buf {
    //! A slice-backed cursor for checked parsing.

    use core::fmt;

    /// A cursor for reading bytes from a slice with offset tracking.
    pub struct Cursor<'a> {
        /// The underlying byte slice.
        pub buf: &'a [u8],
        /// Current read offset.
        pub off: usize,
    }

    impl<'a> Cursor<'a> {
        /// Creates a new cursor starting at offset 0.
        pub fn new(buf: &'a [u8]) -> Self {
            Self { buf, off: 0 }
        }

        /// Takes the next `n` bytes, or `None` if fewer remain.
        pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
            let end = self.off.checked_add(n)?;
            let slice = self.buf.get(self.off..end)?;
            self.off = end;
            Some(slice)
        }

        /// Takes the next `N` bytes as an array.
        pub fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
            let slice = self.take(N)?;
            let mut out = [0u8; N];
            out.copy_from_slice(slice);
            Some(out)
        }

        /// Takes a single byte.
        pub fn take_u8(&mut self) -> Option<u8> {
            self.take(1).map(|b| b[0])
        }

        /// Returns the unread tail without advancing.
        pub fn rest(&self) -> &'a [u8] {
            self.buf.get(self.off..).unwrap_or(&[])
        }

        /// Advances past `n` bytes that were consumed through [`Cursor::rest`].
        pub fn advance(&mut self, n: usize) -> Option<()> {
            self.take(n).map(|_| ())
        }

        /// Returns the number of bytes remaining in the buffer.
        pub fn remaining(&self) -> usize {
            self.buf.len().saturating_sub(self.off)
        }
    }

    impl<'a> fmt::Debug for Cursor<'a> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Cursor")
                .field("off", &self.off)
                .field("remaining", &self.remaining())
                .finish()
        }
    }
}
