//! Core types for the copie harness.
//!
//! This module holds the crate-wide error taxonomy. Everything that can
//! fail in copie — configuration resolution, YAML loading, git calls,
//! rendering — funnels into [`CopieError`], so test code can match on a
//! single enum regardless of which layer produced the failure.
//!
//! # Error Categories
//!
//! - **Configuration**: [`CopieError::ConfigNotFound`],
//!   [`CopieError::MissingSubdirectory`] — the template is authored
//!   incorrectly for this harness; raised before any render work runs.
//! - **Rendering**: [`CopieError::Template`],
//!   [`CopieError::SubdirectoryMissing`],
//!   [`CopieError::ExternalDataMissing`] — runtime failures inside the
//!   renderer, captured into a failed [`RunResult`].
//! - **Early termination**: [`CopieError::RendererExit`] — the renderer
//!   stopped deliberately and carries an explicit exit status.
//! - **Caller misuse**: [`CopieError::ChainedParentFailed`] — raised
//!   eagerly, never softened into a result value.
//!
//! [`RunResult`]: crate::harness::RunResult

pub mod error;

pub use error::CopieError;

/// Convenient result alias used across the crate.
pub type Result<T, E = CopieError> = std::result::Result<T, E>;
