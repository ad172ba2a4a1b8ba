//! Shared configuration for the wingman manifest authoring tool.
//!
//! The validation core lives in [`wingman_common`] and is re-exported here as
//! [`common`] so downstream crates need a single dependency for settings and
//! field rules.

pub mod config;

pub use config::{
    BranchConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME, ConfigError, ConfigLocation, DigestAlgorithm,
    FALLBACK_LOCALE, HashingConfig, SharedConfig, resolve_config_location,
};
pub use wingman_common as common;
