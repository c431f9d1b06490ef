//! The renderer collaborator contract.
//!
//! The harness does not render templates itself: it drives a
//! [`Renderer`], handing it a fully described request and mapping
//! whatever comes back into a [`RunResult`](crate::harness::RunResult).
//! The trait has exactly two operations, mirroring the two harness
//! workflows:
//!
//! - [`Renderer::render_fresh`] — instantiate a template into an empty
//!   (or pre-staged) destination.
//! - [`Renderer::render_update`] — re-render an existing project in
//!   place against a possibly different template revision.
//!
//! Both return a [`Worker`]: the materialized destination plus the final
//! recorded answers, including internal-prefixed bookkeeping entries the
//! orchestrator filters out before exposing them to tests.
//!
//! [`TeraRenderer`] is the default implementation; tests that want to
//! exercise the orchestration layer in isolation can substitute their
//! own `Renderer` via [`Copie::with_renderer`](crate::harness::Copie::with_renderer).

pub mod engine;

pub use engine::TeraRenderer;

use std::path::{Path, PathBuf};

use crate::core::Result;
use crate::template::AnswerMap;

/// Request for a fresh render of a template into a new destination.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    /// Template directory to render from.
    pub src_path: PathBuf,
    /// Destination directory; must already exist.
    pub dst_path: PathBuf,
    /// Caller-supplied answer overrides.
    pub answers: AnswerMap,
    /// Permit unsafe template operations (post-render tasks).
    pub unsafe_ok: bool,
    /// Use declared defaults as the answer baseline.
    pub use_defaults: bool,
    /// Template revision to render; `None` means the working tree tip.
    pub vcs_ref: Option<String>,
}

/// Request for an in-place re-render of an existing project.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// The existing project directory.
    pub dst_path: PathBuf,
    /// Caller-supplied answer overrides.
    pub answers: AnswerMap,
    /// Permit unsafe template operations (post-render tasks).
    pub unsafe_ok: bool,
    /// Use declared defaults as the answer baseline.
    pub use_defaults: bool,
    /// Permit rewriting files whose content differs.
    pub overwrite: bool,
    /// Template revision to render; `None` means the working tree tip.
    pub vcs_ref: Option<String>,
}

/// Outcome of a successful render: where the project landed and what
/// answers were recorded.
#[derive(Debug, Clone)]
pub struct Worker {
    dst_path: PathBuf,
    answers: AnswerMap,
}

impl Worker {
    /// Build a worker result. Renderer implementations call this after
    /// materializing the destination.
    pub fn new(dst_path: PathBuf, answers: AnswerMap) -> Self {
        Self { dst_path, answers }
    }

    /// The materialized destination path.
    pub fn dst_path(&self) -> &Path {
        &self.dst_path
    }

    /// The final recorded answers, internal-prefixed bookkeeping
    /// entries included.
    pub fn recorded_answers(&self) -> &AnswerMap {
        &self.answers
    }
}

/// External collaborator that turns templates into file trees.
///
/// Implementations report failure through
/// [`CopieError`](crate::CopieError); the
/// [`RendererExit`](crate::CopieError::RendererExit) variant is the
/// early-termination signal and is mapped to a distinct outcome arm by
/// the orchestrator.
pub trait Renderer {
    /// Render a template into a fresh destination.
    fn render_fresh(&self, request: &CopyRequest) -> Result<Worker>;

    /// Re-render an existing project in place.
    fn render_update(&self, request: &UpdateRequest) -> Result<Worker>;
}
