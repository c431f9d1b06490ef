//! The outcome record of one render or update attempt.
//!
//! Every `copy`/`update` call produces exactly one [`RunResult`], whether
//! the attempt succeeded or not. Tests assert on its fields; nothing is
//! thrown past them for failures the template or renderer produced.

use std::path::{Path, PathBuf};

use crate::core::CopieError;
use crate::template::AnswerMap;

/// How one attempt ended.
///
/// Two distinct failure arms (rather than one shared error slot) keep
/// "the renderer blew up" and "the renderer deliberately stopped with a
/// status" distinguishable without inspecting error internals.
#[derive(Debug)]
pub enum Outcome {
    /// The attempt succeeded.
    Success,
    /// Ordinary failure; the exit code is fixed at `-1`.
    Failure(CopieError),
    /// The renderer terminated early and carried an explicit status.
    Terminated {
        /// The carried exit status.
        code: i32,
        /// The termination signal, preserved for inspection.
        error: CopieError,
    },
}

/// Immutable record of one render/update attempt.
///
/// Constructed by the orchestrator, returned by value; plain data with
/// no identity beyond its fields.
#[derive(Debug)]
pub struct RunResult {
    outcome: Outcome,
    project_dir: Option<PathBuf>,
    answers: AnswerMap,
}

impl RunResult {
    pub(crate) fn success(project_dir: PathBuf, answers: AnswerMap) -> Self {
        Self {
            outcome: Outcome::Success,
            project_dir: Some(project_dir),
            answers,
        }
    }

    /// Wrap a captured error, routing early-termination signals to their
    /// own arm. Failed attempts expose no project directory and no
    /// answers.
    pub(crate) fn from_error(error: CopieError) -> Self {
        let outcome = match error {
            CopieError::RendererExit { code, .. } => Outcome::Terminated { code, error },
            other => Outcome::Failure(other),
        };
        Self {
            outcome,
            project_dir: None,
            answers: AnswerMap::new(),
        }
    }

    /// The attempt's outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// `true` when the attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    /// `0` on success, `-1` for ordinary failures, the carried status
    /// for early terminations.
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            Outcome::Success => 0,
            Outcome::Failure(_) => -1,
            Outcome::Terminated { code, .. } => *code,
        }
    }

    /// The captured failure, if the attempt failed.
    pub fn error(&self) -> Option<&CopieError> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure(error) | Outcome::Terminated { error, .. } => Some(error),
        }
    }

    /// Absolute path of the generated project root; present only on
    /// success.
    pub fn project_dir(&self) -> Option<&Path> {
        if self.is_success() {
            self.project_dir.as_deref()
        } else {
            None
        }
    }

    /// The caller-visible resolved answers. Internal-prefixed entries
    /// never appear here; failed attempts have no answers at all.
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }
}
