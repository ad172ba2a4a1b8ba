//! Configuration shared by every wingman command.
//!
//! Settings live in `wingman.toml`. [`SharedConfig::discover`] resolves the
//! file from an explicit path, then the `WINGMAN_CONFIG` environment
//! variable, then the platform configuration directory. A missing file at a
//! discovered location falls back to defaults; a missing file that was named
//! explicitly is an error.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "WINGMAN_CONFIG";

/// File name looked up inside the platform configuration directory.
pub const CONFIG_FILE_NAME: &str = "wingman.toml";

/// Locale used when neither the configuration nor the user supplies one.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Errors raised while locating or parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// Path that could not be read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`SharedConfig`].
    #[error("invalid configuration in {origin}: {source}")]
    Parse {
        /// Where the text came from (a path, or `<inline>`).
        origin: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A configuration path is not valid UTF-8.
    #[error("configuration path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the rejected path.
        path: String,
    },
}

/// Digest algorithms available to the hashing commands.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, the manifest default.
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Every supported algorithm, in preference order.
    pub const ALL: [Self; 2] = [Self::Sha256, Self::Sha512];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == normalised)
            .ok_or_else(|| {
                format!("unsupported digest algorithm \"{input}\"; expected sha256 or sha512")
            })
    }
}

/// Shared configuration for the wingman tool.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Default manifest locale offered when prompting.
    ///
    /// Whitespace-only values are treated as absent so that a templated
    /// `locale = ""` falls back to [`FALLBACK_LOCALE`].
    pub locale: Option<String>,
    /// Hashing settings.
    pub hashing: HashingConfig,
    /// Branch-name settings.
    pub branch: BranchConfig,
}

/// Settings for installer hashing.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HashingConfig {
    /// Digest used for installer and signature hashes.
    pub algorithm: DigestAlgorithm,
}

/// Settings for branch-name generation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BranchConfig {
    /// Fixed seed for the branch suffix generator.
    ///
    /// Leave unset in normal use so each run draws a fresh seed from the
    /// operating system; set it to reproduce a branch name.
    pub seed: Option<u64>,
}

impl SharedConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or
    /// contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use wingman::{DigestAlgorithm, SharedConfig};
    ///
    /// let config = SharedConfig::from_toml_str("[hashing]\nalgorithm = \"sha512\"\n")
    ///     .expect("valid configuration");
    /// assert_eq!(config.hashing.algorithm, DigestAlgorithm::Sha512);
    /// assert_eq!(config.default_locale(), "en-US");
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            origin: "<inline>".to_owned(),
            source,
        })
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            origin: path.to_string(),
            source,
        })?;
        info!("loaded configuration from {path}");
        Ok(config)
    }

    /// Loads configuration using the supplied loader.
    ///
    /// This exists so tests can substitute the file system with an in-memory
    /// source.
    ///
    /// # Examples
    ///
    /// ```
    /// use wingman::SharedConfig;
    ///
    /// let config = SharedConfig::load_with(|| SharedConfig::default());
    /// assert!(config.branch.seed.is_none());
    /// ```
    #[must_use]
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        loader()
    }

    /// Locate and load configuration for this process.
    ///
    /// `explicit` (typically a `--config` flag) wins over the
    /// `WINGMAN_CONFIG` environment variable, which wins over
    /// `<config dir>/wingman.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error when an explicitly named file is missing or
    /// unreadable, or when any located file fails to parse.
    pub fn discover(explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let env_value = std::env::var(CONFIG_ENV_VAR).ok();
        let default_dir = default_config_dir()?;
        let Some(location) =
            resolve_config_location(explicit, env_value.as_deref(), default_dir.as_deref())
        else {
            debug!("no configuration location available; using defaults");
            return Ok(Self::default());
        };

        if !location.required && !location.path.exists() {
            debug!("no configuration at {}; using defaults", location.path);
            return Ok(Self::default());
        }
        Self::load_from_path(&location.path)
    }

    /// Returns the configured default locale, falling back to `en-US`.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        normalise_locale(self.locale.as_deref()).unwrap_or(FALLBACK_LOCALE)
    }
}

/// A resolved configuration file location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigLocation {
    /// Path to the configuration file.
    pub path: Utf8PathBuf,
    /// Whether a missing file is an error.
    pub required: bool,
}

/// Decide which configuration file to read.
///
/// Blank environment values are ignored.
#[must_use]
pub fn resolve_config_location(
    explicit: Option<&Utf8Path>,
    env_value: Option<&str>,
    default_dir: Option<&Utf8Path>,
) -> Option<ConfigLocation> {
    if let Some(path) = explicit {
        return Some(ConfigLocation {
            path: path.to_owned(),
            required: true,
        });
    }
    if let Some(value) = env_value.map(str::trim).filter(|value| !value.is_empty()) {
        return Some(ConfigLocation {
            path: Utf8PathBuf::from(value),
            required: true,
        });
    }
    default_dir.map(|dir| ConfigLocation {
        path: dir.join(CONFIG_FILE_NAME),
        required: false,
    })
}

fn default_config_dir() -> Result<Option<Utf8PathBuf>, ConfigError> {
    let Some(dirs) = directories_next::ProjectDirs::from("", "", "wingman") else {
        return Ok(None);
    };
    let dir = dirs.config_dir().to_path_buf();
    Utf8PathBuf::from_path_buf(dir)
        .map(Some)
        .map_err(|path| ConfigError::NonUtf8Path {
            path: path.to_string_lossy().into_owned(),
        })
}

fn normalise_locale(locale: Option<&str>) -> Option<&str> {
    locale.map(str::trim).filter(|value| !value.is_empty())
}
