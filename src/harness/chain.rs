//! Parent/child template chaining.
//!
//! Some templates consume the rendered output of another template as
//! input data: a "child" template whose configuration declares
//! `_external_data` entries pointing at the answers file a "parent"
//! render produced. [`Chained`] wires the two together: every child
//! `copy` first copies the parent's rendered tree into the child's
//! freshly allocated destination, then renders the child template over
//! it. The parent's answers file travels with the staged tree, so the
//! child's external-data lookup finds it in place.
//!
//! Construction goes through [`Copie::chain`], which checks the parent
//! result eagerly — a failed parent is a caller error at the chaining
//! call, not something to discover deep inside a renderer backtrace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::harness::{Copie, CopyOptions, RunResult};
use crate::renderer::Renderer;

/// Orchestrator scoped to a child template, staging a parent's output
/// before each render.
///
/// Borrows the parent orchestrator mutably: child renders allocate from
/// the same counter sequence, so parent and child outputs interleave in
/// one test directory without colliding.
pub struct Chained<'a, R: Renderer> {
    harness: &'a mut Copie<R>,
    parent_dir: PathBuf,
    child_template: PathBuf,
}

impl<'a, R: Renderer> Chained<'a, R> {
    pub(crate) fn new(
        harness: &'a mut Copie<R>,
        parent_dir: PathBuf,
        child_template: PathBuf,
    ) -> Self {
        Self {
            harness,
            parent_dir,
            child_template,
        }
    }

    /// The staged parent project directory.
    pub fn parent_dir(&self) -> &Path {
        &self.parent_dir
    }

    /// Render the child template with default options.
    pub fn copy(&mut self) -> RunResult {
        self.copy_with(CopyOptions::default())
    }

    /// Render the child template; `options.template_dir` is ignored in
    /// favor of the chained child template.
    pub fn copy_with(&mut self, mut options: CopyOptions) -> RunResult {
        options.template_dir = Some(self.child_template.clone());
        self.harness.run_copy(options, Some(&self.parent_dir))
    }
}

/// Recursively copy a rendered tree. Symlinks and special files are
/// skipped, matching what the renderer materializes.
pub(crate) fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_tree(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
