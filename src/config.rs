//! Layered configuration.
//!
//! Settings are merged with figment, lowest priority first:
//!
//! 1. Built-in defaults (`page.tsx`, `.page-hashes.json`, `src`)
//! 2. `pagestamp.toml` in the working directory, if present
//! 3. `PAGESTAMP_*` environment variables (e.g. `PAGESTAMP_PAGE_NAME`)
//!
//! The positional root on the command line is applied on top by the caller.
//! With no file and no environment overrides the defaults reproduce the
//! fixed behavior: pages named `page.tsx` under `./src`, cache in
//! `./.page-hashes.json`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CACHE_FILE;
use crate::scanner::{WalkerConfig, DEFAULT_PAGE_NAME};

/// Name of the optional configuration file in the working directory.
pub const CONFIG_FILE_NAME: &str = "pagestamp.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PAGESTAMP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Exact file name of a page.
    pub page_name: String,

    /// Cache file, relative to the working directory unless absolute.
    pub cache_file: PathBuf,

    /// Directory scanned when no root is given, relative to the working
    /// directory.
    pub default_root: String,

    /// Descend into symlinked directories.
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_name: DEFAULT_PAGE_NAME.to_string(),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            default_root: "src".to_string(),
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Load configuration for a run in `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is malformed, or an
    /// environment override has the wrong type.
    pub fn load(cwd: &Path) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(cwd).extract()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// The provider stack used by [`load`](Self::load).
    #[must_use]
    pub fn figment(cwd: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(cwd.join(CONFIG_FILE_NAME)))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Absolute cache file location for a run in `cwd`.
    #[must_use]
    pub fn cache_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.cache_file)
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            page_name: self.page_name.clone(),
            follow_symlinks: self.follow_symlinks,
        }
    }
}
