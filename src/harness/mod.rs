//! The render orchestrator tests interact with.
//!
//! [`Copie`] owns a private output root and hands out one
//! counter-indexed directory per render, drives the configured
//! [`Renderer`], and maps every outcome — success or failure — into a
//! [`RunResult`]. The two workflows are:
//!
//! - [`Copie::copy`] / [`Copie::copy_with`] — fresh render into a newly
//!   allocated directory;
//! - [`Copie::update`] / [`Copie::update_with`] — in-place re-render of
//!   a previously generated project, typically against a new template
//!   revision.
//!
//! Template-authoring mistakes (missing configuration, missing
//! subdirectory declaration) are wrapped into a failed result exactly
//! like render-time failures, so a test always gets a `RunResult` back;
//! only caller-contract violations (updating a deleted project, chaining
//! onto a failed parent) surface eagerly.
//!
//! An orchestrator is single-threaded by design: allocation mutates the
//! counter, so every rendering method takes `&mut self`. Parallel test
//! execution wants one orchestrator per worker, each with its own test
//! directory — which is what the [`fixtures`](crate::fixtures) layer
//! provides.

pub mod chain;
pub mod result;

pub use chain::Chained;
pub use result::{Outcome, RunResult};

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::constants::{OUTPUT_DIR_COUNTER_WIDTH, OUTPUT_DIR_PREFIX};
use crate::core::{CopieError, Result};
use crate::renderer::{CopyRequest, Renderer, TeraRenderer, UpdateRequest};
use crate::template::{AnswerMap, TemplateConfig, public_answers};

/// Options for a fresh render.
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Answer overrides applied on top of the template's declared
    /// defaults.
    pub extra_answers: AnswerMap,
    /// Template to render; the orchestrator's default when `None`.
    pub template_dir: Option<PathBuf>,
    /// Template revision; the working tree tip when `None`.
    pub vcs_ref: Option<String>,
}

impl CopyOptions {
    /// Add one answer override.
    pub fn with_answer(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_answers.insert(name.into(), value.into());
        self
    }

    /// Render this template instead of the orchestrator's default.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    /// Render the template at this revision.
    pub fn with_vcs_ref(mut self, reference: impl Into<String>) -> Self {
        self.vcs_ref = Some(reference.into());
        self
    }
}

/// Options for an in-place update.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Answer overrides applied on top of the recorded answers.
    pub extra_answers: AnswerMap,
    /// Template revision; the working tree tip when `None`.
    pub vcs_ref: Option<String>,
}

impl UpdateOptions {
    /// Add one answer override.
    pub fn with_answer(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_answers.insert(name.into(), value.into());
        self
    }

    /// Update against this template revision.
    pub fn with_vcs_ref(mut self, reference: impl Into<String>) -> Self {
        self.vcs_ref = Some(reference.into());
        self
    }
}

/// Long-lived per-test (or per-session) render orchestrator.
///
/// Owns `test_dir` exclusively; shares `config_file` read-only. The
/// counter starts at 0 and is never reused within the orchestrator's
/// lifetime, so no two renders from the same instance can collide.
pub struct Copie<R: Renderer = TeraRenderer> {
    default_template_dir: PathBuf,
    test_dir: PathBuf,
    config_file: PathBuf,
    renderer: R,
    counter: u32,
}

impl Copie<TeraRenderer> {
    /// Create an orchestrator with the default Tera renderer bound to a
    /// provisioned session configuration file.
    pub fn new(
        default_template_dir: impl Into<PathBuf>,
        test_dir: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        let config_file = config_file.into();
        let renderer = TeraRenderer::new(&config_file)?;
        Ok(Self::with_renderer(
            default_template_dir,
            test_dir,
            config_file,
            renderer,
        ))
    }
}

impl<R: Renderer> Copie<R> {
    /// Create an orchestrator with a caller-supplied renderer.
    pub fn with_renderer(
        default_template_dir: impl Into<PathBuf>,
        test_dir: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
        renderer: R,
    ) -> Self {
        Self {
            default_template_dir: default_template_dir.into(),
            test_dir: test_dir.into(),
            config_file: config_file.into(),
            renderer,
            counter: 0,
        }
    }

    /// The template rendered when a call does not name one.
    pub fn default_template_dir(&self) -> &Path {
        &self.default_template_dir
    }

    /// The output root owned by this orchestrator.
    pub fn test_dir(&self) -> &Path {
        &self.test_dir
    }

    /// The shared session configuration file.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Allocate the next output directory: `copie000`, `copie001`, ...
    ///
    /// Creates the directory and increments the counter; a filesystem
    /// error (unwritable parent) propagates.
    fn new_output_dir(&mut self) -> Result<PathBuf> {
        let name = format!(
            "{OUTPUT_DIR_PREFIX}{:0width$}",
            self.counter,
            width = OUTPUT_DIR_COUNTER_WIDTH
        );
        let dir = self.test_dir.join(name);
        fs::create_dir(&dir)?;
        self.counter += 1;
        tracing::debug!(dir = %dir.display(), "allocated output directory");
        Ok(dir)
    }

    /// Render the default template with default options.
    pub fn copy(&mut self) -> RunResult {
        self.copy_with(CopyOptions::default())
    }

    /// Render a template into a freshly allocated output directory.
    ///
    /// Configuration problems, render failures, and early terminations
    /// are all folded into the returned [`RunResult`]; this method never
    /// panics for template-side problems.
    pub fn copy_with(&mut self, options: CopyOptions) -> RunResult {
        self.run_copy(options, None)
    }

    pub(crate) fn run_copy(&mut self, options: CopyOptions, stage_from: Option<&Path>) -> RunResult {
        let template_dir = options
            .template_dir
            .clone()
            .unwrap_or_else(|| self.default_template_dir.clone());

        let attempt = (|| -> Result<RunResult> {
            // Validate before allocating, so an unusable template leaves
            // nothing behind.
            let config = TemplateConfig::load(&template_dir)?;
            config.validate()?;

            let dst = self.new_output_dir()?;
            if let Some(parent) = stage_from {
                chain::copy_tree(parent, &dst)?;
                tracing::debug!(
                    from = %parent.display(),
                    to = %dst.display(),
                    "staged parent output into child destination"
                );
            }

            let request = CopyRequest {
                src_path: template_dir.clone(),
                dst_path: dst,
                answers: options.extra_answers,
                unsafe_ok: true,
                use_defaults: true,
                vcs_ref: options.vcs_ref,
            };
            let worker = self.renderer.render_fresh(&request)?;
            Ok(RunResult::success(
                worker.dst_path().to_path_buf(),
                public_answers(worker.recorded_answers()),
            ))
        })();

        attempt.unwrap_or_else(RunResult::from_error)
    }

    /// Re-render a previously generated project with default options.
    ///
    /// # Panics
    ///
    /// Panics when `prior` is not a successful result or its project
    /// directory no longer exists — both are caller contract errors,
    /// not render failures.
    pub fn update(&mut self, prior: &RunResult) -> RunResult {
        self.update_with(prior, UpdateOptions::default())
    }

    /// Re-render a previously generated project in place, optionally at
    /// a different template revision.
    ///
    /// The returned result's project directory is always the original
    /// one: update never relocates a project.
    ///
    /// # Panics
    ///
    /// See [`Copie::update`].
    pub fn update_with(&mut self, prior: &RunResult, options: UpdateOptions) -> RunResult {
        let project_dir = prior
            .project_dir()
            .expect("update requires a successful prior result with a project directory");
        assert!(
            project_dir.exists(),
            "project directory {} does not exist",
            project_dir.display()
        );

        let request = UpdateRequest {
            dst_path: project_dir.to_path_buf(),
            answers: options.extra_answers,
            unsafe_ok: true,
            use_defaults: true,
            overwrite: true,
            vcs_ref: options.vcs_ref,
        };

        match self.renderer.render_update(&request) {
            Ok(worker) => RunResult::success(
                project_dir.to_path_buf(),
                public_answers(worker.recorded_answers()),
            ),
            Err(error) => RunResult::from_error(error),
        }
    }

    /// Chain a child template onto a completed parent render.
    ///
    /// Fails eagerly — before any child-side work — with
    /// [`CopieError::ChainedParentFailed`] unless the parent result has
    /// a successful exit code. The returned [`Chained`] stages the
    /// parent's output into the child's destination before rendering, so
    /// the child template can consume it as external data.
    pub fn chain<'a>(
        &'a mut self,
        parent: &RunResult,
        child_template: impl Into<PathBuf>,
    ) -> Result<Chained<'a, R>> {
        if parent.exit_code() != 0 {
            return Err(CopieError::ChainedParentFailed {
                exit_code: parent.exit_code(),
            });
        }
        let parent_dir = parent
            .project_dir()
            .expect("successful results always carry a project directory")
            .to_path_buf();
        Ok(Chained::new(self, parent_dir, child_template.into()))
    }
}
