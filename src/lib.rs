//! copie - a test harness for Copier-style project templates
//!
//! copie lets a test author render a project template and assert on the
//! outcome. It wraps one invocation pattern of a template renderer —
//! "render template X into directory Y with answers Z" — behind a small
//! orchestration layer that validates the template, allocates isolated
//! output directories, merges answers, and normalizes success and failure
//! into a single result value.
//!
//! # Architecture Overview
//!
//! Each test builds (or receives from a fixture) a [`Copie`]
//! orchestrator bound to a default template and a private output root.
//! Every `copy` call:
//!
//! 1. Resolves and validates the template's `copier.yml`/`copier.yaml`
//!    configuration — it must declare an output `_subdirectory`.
//! 2. Allocates the next counter-indexed output directory
//!    (`copie000`, `copie001`, ...), never reusing a name.
//! 3. Drives the [`Renderer`] with the template's declared defaults
//!    merged under the caller's overrides.
//! 4. Returns a [`RunResult`] whether the render succeeded, failed, or
//!    terminated early — tests assert on its fields instead of catching
//!    errors.
//!
//! A second workflow, [`Copie::update`], re-renders an existing project
//! in place against a (possibly different) template revision, and
//! [`Copie::chain`] wires a child template to consume a parent render's
//! output as external data.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use copie::fixtures::CopieFixture;
//! use copie::harness::CopyOptions;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut copie = CopieFixture::new()?;
//!
//! let result = copie.copy_with(
//!     CopyOptions::default()
//!         .with_template_dir("tests/data/demo-template")
//!         .with_answer("project_name", "demo"),
//! );
//!
//! assert_eq!(result.exit_code(), 0);
//! let project = result.project_dir().expect("render succeeded");
//! assert!(project.join("README.md").is_file());
//! # Ok(())
//! # }
//! ```
//!
//! # Template Format
//!
//! A template directory contains a `copier.yml` (or `.yaml`)
//! configuration and a content root named by its `_subdirectory` key.
//! Top-level keys starting with `_` are renderer settings; everything
//! else declares an answer with its default:
//!
//! ```yaml
//! _subdirectory: template
//! _answers_file: .demo-answers.yml
//! project_name: demo
//! author: {type: str, default: anonymous}
//! ```
//!
//! Inside the content root, files ending in `.tera` are rendered through
//! the Tera engine (and the suffix stripped); other files are copied
//! verbatim. Path segments may contain template expressions, and a
//! segment rendering to the empty string omits the entry.
//!
//! # Core Modules
//!
//! - [`harness`] - The [`Copie`] orchestrator, [`RunResult`], and
//!   parent/child chaining
//! - [`renderer`] - The renderer contract and the Tera-backed default
//!   implementation
//! - [`template`] - Configuration resolution, validation, and answer
//!   merging
//! - [`config`] - Session configuration and include-aware YAML loading
//! - [`git`] - Synchronous wrapper over the system git binary for
//!   revision selection
//! - [`fixtures`] - Per-test and session-scoped fixtures, environment
//!   options, test logging
//! - [`core`] - The [`CopieError`] taxonomy
//!
//! [`Copie`]: harness::Copie
//! [`Copie::update`]: harness::Copie::update
//! [`Copie::chain`]: harness::Copie::chain
//! [`RunResult`]: harness::RunResult
//! [`Renderer`]: renderer::Renderer

pub mod config;
pub mod constants;
pub mod core;
pub mod fixtures;
pub mod git;
pub mod harness;
pub mod renderer;
pub mod template;

pub use crate::core::CopieError;
pub use fixtures::{CopieFixture, HarnessOptions};
pub use harness::{Copie, CopyOptions, Outcome, RunResult, UpdateOptions};
pub use renderer::{Renderer, TeraRenderer, Worker};
