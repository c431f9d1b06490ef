//! Git operations wrapper for template revisions.
//!
//! This module provides a small, synchronous wrapper around the system
//! `git` command. Like Cargo's `git-fetch-with-cli`, copie shells out to
//! the installed git binary rather than embedding a git library, so the
//! template repositories under test behave exactly as they do in the
//! author's working copy (same config, same attribute handling).
//!
//! Only read operations are exposed: resolving a reference to a commit
//! and materializing a revision's tree. Exports go through
//! `git worktree`, and land in the session cache keyed by commit SHA, so
//! rendering the same revision twice pays the checkout cost once.
//!
//! All operations block the calling thread; the harness is
//! single-threaded by design and imposes no timeouts.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::{CopieError, Result};

/// Handle to an existing git repository.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

/// A template revision materialized on disk.
#[derive(Debug, Clone)]
pub struct ExportedTree {
    /// Root of the exported tree.
    pub path: PathBuf,
    /// The commit SHA the tree was exported at.
    pub commit: String,
}

impl GitRepo {
    /// Return a handle when `dir` is the root of a git repository
    /// (a `.git` directory, or a `.git` file for linked worktrees).
    pub fn discover(dir: &Path) -> Option<Self> {
        if dir.join(".git").exists() {
            Some(Self {
                path: dir.to_path_buf(),
            })
        } else {
            None
        }
    }

    /// The repository root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn run(&self, args: &[&str], operation: &str) -> Result<std::process::Output> {
        tracing::debug!(?args, repo = %self.path.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .map_err(|source| CopieError::GitCommandError {
                operation: operation.to_string(),
                stderr: source.to_string(),
            })?;

        if !output.status.success() {
            return Err(CopieError::GitCommandError {
                operation: operation.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Resolve a reference (tag, branch, commit) to a full commit SHA.
    pub fn rev_parse(&self, reference: &str) -> Result<String> {
        let spec = format!("{reference}^{{commit}}");
        let output = self.run(&["rev-parse", "--verify", &spec], "rev-parse")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Materialize the tree of `reference` under `cache_dir`, reusing a
    /// previous export of the same commit when one exists.
    pub fn export(&self, reference: &str, cache_dir: &Path) -> Result<ExportedTree> {
        let commit = self.rev_parse(reference)?;
        let dest = cache_dir.join("exports").join(&commit);
        if dest.is_dir() {
            tracing::debug!(commit = %commit, "reusing cached revision export");
            return Ok(ExportedTree { path: dest, commit });
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let dest_arg = dest.display().to_string();
        self.run(
            &["worktree", "add", "--force", "--detach", &dest_arg, &commit],
            "worktree add",
        )?;
        tracing::debug!(commit = %commit, dest = %dest.display(), "exported template revision");
        Ok(ExportedTree { path: dest, commit })
    }
}
