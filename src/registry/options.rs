use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LogicalType;

/// Options controlling which types and adapters a [`super::KeyRegistry`] carries.
///
/// Loaded from TOML:
///
/// ```toml
/// [registry]
/// disabled = ["decimal"]
///
/// [adapters]
/// disabled = ["timestamp"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyCodecOptions {
    /// Codec factory table overrides.
    pub registry: RegistrySection,
    /// Input adapter table overrides.
    pub adapters: AdapterSection,
}

/// `[registry]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySection {
    /// Types removed from the codec registry; they become unsupported.
    pub disabled: Vec<LogicalType>,
}

/// `[adapters]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterSection {
    /// Types whose specialized adapter is removed; they use generic decomposition.
    pub disabled: Vec<LogicalType>,
}

impl KeyCodecOptions {
    /// Parses options from a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        toml::from_str(src).map_err(|source| ConfigError::Parse { source })
    }

    /// Reads and parses a TOML options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Renders the options as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|source| ConfigError::Serialize { source })
    }

    /// Removes `ty` from the codec registry.
    pub fn disable_type(mut self, ty: LogicalType) -> Self {
        if !self.registry.disabled.contains(&ty) {
            self.registry.disabled.push(ty);
        }
        self
    }

    /// Removes the specialized adapter for `ty`.
    pub fn disable_adapter(mut self, ty: LogicalType) -> Self {
        if !self.adapters.disabled.contains(&ty) {
            self.adapters.disabled.push(ty);
        }
        self
    }

    pub(crate) fn type_enabled(&self, ty: LogicalType) -> bool {
        !self.registry.disabled.contains(&ty)
    }

    pub(crate) fn adapter_enabled(&self, ty: LogicalType) -> bool {
        !self.adapters.disabled.contains(&ty)
    }
}

/// Failures while loading [`KeyCodecOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("failed to read key codec options {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The options file is not valid TOML or names unknown keys or types.
    #[error("failed to parse key codec options {path}: {source}")]
    ParseFile {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// An in-memory options document is not valid.
    #[error("failed to parse key codec options: {source}")]
    Parse {
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// The options could not be rendered as TOML.
    #[error("failed to serialize key codec options: {source}")]
    Serialize {
        /// Underlying TOML error.
        source: toml::ser::Error,
    },
}
