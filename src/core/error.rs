//! Error handling for the copie harness.
//!
//! A single strongly-typed enum, [`CopieError`], covers every failure mode
//! in the crate. Test authors receive it in one of two ways:
//!
//! 1. Captured inside a failed [`RunResult`](crate::harness::RunResult),
//!    preserved unmodified so the test can match on the variant.
//! 2. Returned (or panicked) eagerly for caller-contract violations such
//!    as chaining onto a failed parent result.
//!
//! Common standard library and ecosystem errors convert automatically:
//! [`std::io::Error`] → [`CopieError::Io`] and [`serde_yaml::Error`] →
//! [`CopieError::Yaml`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for copie operations.
///
/// Each variant represents a specific failure mode with enough context to
/// assert on it from a test. Variants carry owned data only, so a
/// `CopieError` can be stored inside a result value and inspected long
/// after the operation that produced it.
#[derive(Error, Debug)]
pub enum CopieError {
    /// No `copier.*` configuration file with a recognized extension was
    /// found in the template directory.
    #[error("no copier.yml or copier.yaml found in template directory: {dir}")]
    ConfigNotFound {
        /// The template directory that was searched
        dir: String,
    },

    /// The configuration file exists but no document declares the
    /// output-subdirectory key.
    ///
    /// Templates without a subdirectory would render their files one
    /// level deeper than this harness expects, so they are rejected
    /// before the render step runs.
    #[error("template configuration {config} does not declare `_subdirectory`")]
    MissingSubdirectory {
        /// Path of the offending configuration file
        config: String,
    },

    /// The declared subdirectory does not exist under the template root.
    #[error("template subdirectory `{subdirectory}` not found under {template_dir}")]
    SubdirectoryMissing {
        /// The template directory being rendered
        template_dir: String,
        /// The subdirectory named by the configuration
        subdirectory: String,
    },

    /// A file referenced by an `!include` directive does not exist.
    ///
    /// The message always contains the resolved absolute path.
    #[error("included configuration file not found: {path}")]
    IncludeNotFound {
        /// Absolute path of the missing include target
        path: PathBuf,
    },

    /// `!include` nesting exceeded [`MAX_INCLUDE_DEPTH`].
    ///
    /// [`MAX_INCLUDE_DEPTH`]: crate::constants::MAX_INCLUDE_DEPTH
    #[error("include depth exceeded while resolving: {path}")]
    IncludeDepthExceeded {
        /// The include target at which the limit was hit
        path: PathBuf,
    },

    /// An `!include` directive was applied to something other than a
    /// file path string.
    #[error("`!include` expects a file path string")]
    InvalidInclude,

    /// The renderer requested early termination and carries an explicit
    /// exit status, e.g. a post-render task exiting non-zero.
    #[error("renderer terminated early with status {code}: {reason}")]
    RendererExit {
        /// The exit status carried by the termination signal
        code: i32,
        /// Human-readable description of what terminated
        reason: String,
    },

    /// A template expression failed to render.
    #[error("failed to render `{path}`")]
    Template {
        /// Template-relative path of the file (or path segment) that
        /// failed
        path: String,
        /// The underlying engine error
        #[source]
        source: tera::Error,
    },

    /// The template declares tasks but the caller did not permit unsafe
    /// operations.
    #[error("template declares `_tasks` but unsafe operations were not permitted")]
    UnsafeNotAllowed,

    /// An `_external_data` entry points at a file that does not exist in
    /// the destination.
    #[error("external data `{name}` not found at {path}")]
    ExternalDataMissing {
        /// The external-data entry name
        name: String,
        /// Destination-relative path that was resolved
        path: PathBuf,
    },

    /// No recorded-answers file could be located in a project directory
    /// that is being updated.
    #[error("no recorded answers file found in {project_dir}")]
    AnswersFileMissing {
        /// The project directory that was searched
        project_dir: String,
    },

    /// A file would be overwritten but the overwrite flag was not set.
    #[error("refusing to overwrite {path} without the overwrite flag")]
    WouldOverwrite {
        /// The file that differs from the newly rendered content
        path: String,
    },

    /// Git command execution failed.
    #[error("git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g. "rev-parse", "worktree add")
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// A version-control reference was requested for a template
    /// directory that is not a git repository.
    #[error("not a git repository: {path}")]
    GitRepoInvalid {
        /// The template directory that lacks a repository
        path: String,
    },

    /// A chained render was constructed from a parent result that did
    /// not succeed. Chaining requires a successful exit code.
    #[error("chaining requires a parent result with a successful exit code, got {exit_code}")]
    ChainedParentFailed {
        /// The parent result's exit code
        exit_code: i32,
    },

    /// Session or template configuration is structurally invalid.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of what is invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
