//! Test fixtures: ready-made orchestrators for test functions.
//!
//! The fixtures here are the copie equivalents of what a test framework
//! would inject:
//!
//! - [`CopieFixture::new`] — a per-test orchestrator bound to a private
//!   temporary output root, deleted when the fixture drops (unless the
//!   keep flag is set);
//! - [`CopieFixture::session`] — an orchestrator whose output root and
//!   renderer configuration are shared across the whole test process;
//! - [`session_config_file`] — the lazily provisioned, process-wide
//!   session configuration, read-only after creation;
//! - [`init_test_logging`] — once-only tracing setup honoring
//!   `RUST_LOG`.
//!
//! Options come from the environment, mirroring a test runner's
//! command-line flags: `COPIE_TEMPLATE` selects the default template
//! directory (default `.`, resolved to an absolute path), and
//! `COPIE_KEEP_PROJECTS` preserves the output roots for post-mortem
//! inspection.
//!
//! # Example
//!
//! ```rust,no_run
//! use copie::fixtures::CopieFixture;
//! use copie::harness::CopyOptions;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut copie = CopieFixture::new()?;
//! let result = copie.copy_with(CopyOptions::default().with_answer("project_name", "demo"));
//! assert_eq!(result.exit_code(), 0);
//! # Ok(())
//! # }
//! ```

use std::env;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context as _, Result};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::SessionConfig;
use crate::constants::{KEEP_PROJECTS_ENV, TEMPLATE_ENV};
use crate::harness::Copie;

/// Fixture-level options, the analog of test-runner command-line flags.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// Default template directory for orchestrators built from these
    /// options.
    pub template_dir: PathBuf,
    /// Preserve the fixture's output root instead of deleting it on
    /// drop.
    pub keep_projects: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            keep_projects: false,
        }
    }
}

impl HarnessOptions {
    /// Read options from the environment: `COPIE_TEMPLATE` (default
    /// `.`, resolved to an absolute path before use) and
    /// `COPIE_KEEP_PROJECTS` (truthy values: `1`, `true`, `yes`).
    pub fn from_env() -> Result<Self> {
        let template = env::var(TEMPLATE_ENV).unwrap_or_else(|_| ".".to_string());
        let template_dir = std::path::absolute(&template)
            .with_context(|| format!("cannot resolve template directory `{template}`"))?;

        let keep_projects = env::var(KEEP_PROJECTS_ENV)
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes"
                )
            })
            .unwrap_or(false);

        Ok(Self {
            template_dir,
            keep_projects,
        })
    }

    /// Use this template directory.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    /// Preserve (or delete) output roots on fixture drop.
    pub fn with_keep_projects(mut self, keep: bool) -> Self {
        self.keep_projects = keep;
        self
    }
}

/// A per-test orchestrator plus the temporary tree backing it.
///
/// Dereferences to [`Copie`], so tests call `fixture.copy()` directly.
/// Dropping the fixture removes its root unless the keep flag was set.
pub struct CopieFixture {
    // `None` when the root was kept or is session-owned.
    root: Option<TempDir>,
    root_path: PathBuf,
    harness: Copie,
}

impl CopieFixture {
    /// Build a fixture from environment options. One call per test
    /// function gives each test a disjoint output root.
    pub fn new() -> Result<Self> {
        Self::with_options(HarnessOptions::from_env()?)
    }

    /// Build a fixture with explicit options.
    pub fn with_options(options: HarnessOptions) -> Result<Self> {
        init_test_logging(None);

        let root = TempDir::new().context("failed to create fixture root")?;
        let user_dir = root.path().join("user_dir");
        fs::create_dir_all(&user_dir)?;
        let config_file = SessionConfig::provision(&user_dir)?;

        let test_dir = root.path().join("copie");
        fs::create_dir(&test_dir)?;
        let harness = Copie::new(options.template_dir, test_dir, config_file)?;

        let (root, root_path) = if options.keep_projects {
            let path = root.into_path();
            tracing::info!(root = %path.display(), "keeping copied projects");
            (None, path)
        } else {
            let path = root.path().to_path_buf();
            (Some(root), path)
        };

        Ok(Self {
            root,
            root_path,
            harness,
        })
    }

    /// Build a fixture sharing the process-wide session root and
    /// session configuration file. Each call still gets its own test
    /// directory, so sequential fixtures never collide.
    pub fn session() -> Result<Self> {
        static FIXTURE_INDEX: AtomicU32 = AtomicU32::new(0);

        init_test_logging(None);
        let options = HarnessOptions::from_env()?;
        let state = session_state();

        let index = FIXTURE_INDEX.fetch_add(1, Ordering::Relaxed);
        let test_dir = state.root.join(format!("copie-{index:03}"));
        fs::create_dir(&test_dir)?;
        let harness = Copie::new(options.template_dir, test_dir, state.config_file.clone())?;

        Ok(Self {
            root: None,
            root_path: state.root.clone(),
            harness,
        })
    }

    /// The root directory backing this fixture.
    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Consume the fixture, keeping its root on disk regardless of the
    /// keep flag.
    pub fn keep(mut self) -> PathBuf {
        if let Some(root) = self.root.take() {
            let _ = root.into_path();
        }
        self.root_path.clone()
    }
}

impl Deref for CopieFixture {
    type Target = Copie;

    fn deref(&self) -> &Self::Target {
        &self.harness
    }
}

impl DerefMut for CopieFixture {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.harness
    }
}

struct SessionState {
    root: PathBuf,
    config_file: PathBuf,
}

static SESSION: OnceLock<SessionState> = OnceLock::new();

fn session_state() -> &'static SessionState {
    SESSION.get_or_init(|| {
        let root = tempfile::Builder::new()
            .prefix("copie-session-")
            .tempdir()
            .expect("failed to create session root")
            .into_path();
        let user_dir = root.join("user_dir");
        fs::create_dir_all(&user_dir).expect("failed to create session user dir");
        let config_file =
            SessionConfig::provision(&user_dir).expect("failed to provision session config");
        SessionState { root, config_file }
    })
}

/// The process-wide session configuration file, provisioned on first
/// use. Created once, read-only afterwards; safe to share across
/// concurrent readers.
pub fn session_config_file() -> &'static Path {
    &session_state().config_file
}

/// Global flag to ensure logging is only initialized once in tests.
static INIT_LOGGING: OnceLock<()> = OnceLock::new();

/// Initialize tracing for tests, once per process.
///
/// Respects `RUST_LOG` when set; otherwise uses the provided level, or
/// stays silent when neither is given.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.get_or_init(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
