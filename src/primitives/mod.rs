//! Low-level primitives for building order-preserving keys.

/// Byte-level utilities and order-preserving encoders.
pub mod bytes;
