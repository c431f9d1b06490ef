//! Session configuration for the copie renderer.
//!
//! Each test session (or each fixture, for fully isolated tests) owns one
//! session configuration file naming the storage locations the renderer
//! uses across renders:
//!
//! - `cache_dir` — revision exports: when a render requests a specific
//!   git reference, the template is materialized here once per commit and
//!   reused by later renders of the same revision.
//! - `replay_dir` — answer snapshots: after every successful render the
//!   resolved answers are mirrored here, one file per generated project.
//!
//! The file is written once during fixture setup and treated as
//! read-only afterwards; orchestrators share it by path.
//!
//! # File Format
//!
//! ```yaml
//! cache_dir: /tmp/.../user_dir/cache
//! replay_dir: /tmp/.../user_dir/replay
//! ```
//!
//! # Modules
//!
//! - [`loader`] — YAML loading with the instance-scoped `!include`
//!   directive used by template configurations.

pub mod loader;

pub use loader::ConfigLoader;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{CopieError, Result};

/// Storage locations shared by every render in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding cached template revision exports, keyed by
    /// commit SHA.
    pub cache_dir: PathBuf,
    /// Directory holding per-project answer snapshots.
    pub replay_dir: PathBuf,
}

impl SessionConfig {
    /// Create the session storage directories under `user_dir`, write
    /// the configuration file describing them, and return its path.
    ///
    /// The returned path is what [`Copie::new`] expects as its
    /// `config_file` argument.
    ///
    /// [`Copie::new`]: crate::harness::Copie::new
    pub fn provision(user_dir: &Path) -> Result<PathBuf> {
        let config = Self {
            cache_dir: user_dir.join("cache"),
            replay_dir: user_dir.join("replay"),
        };
        fs::create_dir_all(&config.cache_dir)?;
        fs::create_dir_all(&config.replay_dir)?;

        let path = user_dir.join("config.yml");
        fs::write(&path, serde_yaml::to_string(&config)?)?;
        tracing::debug!(path = %path.display(), "provisioned session config");
        Ok(path)
    }

    /// Load a previously provisioned session configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CopieError::ConfigError {
            message: format!("cannot read session config {}: {source}", path.display()),
        })?;
        let config: Self = serde_yaml::from_str(&text)?;
        Ok(config)
    }
}
