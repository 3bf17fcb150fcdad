//! Order-preserving key encoding for typed columns.
//!
//! Each column value is bound to its [`LogicalType`] in a [`KeyPart`] and
//! encoded by the codec a [`KeyRegistry`] resolves for that type. The encoded
//! bytes compare lexicographically exactly like the values compare natively,
//! and parts concatenate into a [`CompositeKey`] that sorts like the tuple of
//! its values. A plain sorted byte store can then serve range scans, ordered
//! iteration and prefix matches without a custom comparator.
//!
//! ```
//! use ordkey::{CompositeKey, KeyPart, KeyRegistry, LogicalType};
//!
//! let registry = KeyRegistry::standard();
//! let low = KeyPart::new(&registry, (-5i32).to_be_bytes().to_vec(), LogicalType::Int)?;
//! let high = KeyPart::new(&registry, 3i32.to_be_bytes().to_vec(), LogicalType::Int)?;
//! assert!(low.encode()? < high.encode()?);
//!
//! let name = KeyPart::new(&registry, b"apple".to_vec(), LogicalType::Text)?;
//! let key = CompositeKey::from_parts([&name, &low])?;
//! assert_eq!(key.len(), 2);
//! # Ok::<(), ordkey::KeyError>(())
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod key;
pub mod primitives;
pub mod registry;
pub mod types;

pub use codec::{Codec, CodecKind, KeyCodec, Width};
pub use error::{KeyError, KeyErrorKind, Result};
pub use key::{CompositeKey, KeyColumn, KeyPart, SortOrder};
pub use registry::{Adapter, ConfigError, KeyCodecOptions, KeyRegistry};
pub use types::{LogicalType, NativeValue, RawValue, UnknownTypeName};
