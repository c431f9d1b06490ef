//! Template revision selection tests.
//!
//! These build a real git repository around a template, tag it, then
//! mutate the working tree to tell the two apart.

use std::fs;
use std::path::{Path, PathBuf};

use copie::harness::CopyOptions;
use copie::{CopieError, CopieFixture, HarnessOptions};
use tempfile::TempDir;

use super::common::{TestGit, write_template};

/// A tagged template whose working tree has drifted past the tag.
fn tagged_template(base: &Path) -> (PathBuf, TestGit) {
    let template = base.join("tagged-template");
    write_template(
        &template,
        "_subdirectory: template\n",
        &[("template/content.txt.tera", "v1 content\n")],
    )
    .unwrap();

    let git = TestGit::new(&template);
    git.init().unwrap();
    git.commit_all("template v1").unwrap();
    git.tag("v1").unwrap();

    // Working tree moves on past the tag.
    fs::write(
        template.join("template/content.txt.tera"),
        "working tree content\n",
    )
    .unwrap();

    (template, git)
}

#[test]
fn vcs_ref_renders_the_tagged_revision() {
    let tmp = TempDir::new().unwrap();
    let (template, _git) = tagged_template(tmp.path());

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy_with(CopyOptions::default().with_vcs_ref("v1"));

    assert_eq!(result.exit_code(), 0);
    let content =
        fs::read_to_string(result.project_dir().unwrap().join("content.txt")).unwrap();
    assert_eq!(content, "v1 content\n");
}

#[test]
fn default_ref_renders_the_working_tree() {
    let tmp = TempDir::new().unwrap();
    let (template, _git) = tagged_template(tmp.path());

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    let content =
        fs::read_to_string(result.project_dir().unwrap().join("content.txt")).unwrap();
    assert_eq!(content, "working tree content\n");
}

#[test]
fn vcs_ref_on_a_plain_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("plain");
    write_template(
        &template,
        "_subdirectory: template\n",
        &[("template/content.txt", "content\n")],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy_with(CopyOptions::default().with_vcs_ref("v1"));

    assert_eq!(result.exit_code(), -1);
    assert!(matches!(result.error(), Some(CopieError::GitRepoInvalid { .. })));
}

#[test]
fn unknown_reference_fails_as_a_git_error() {
    let tmp = TempDir::new().unwrap();
    let (template, _git) = tagged_template(tmp.path());

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy_with(CopyOptions::default().with_vcs_ref("no-such-tag"));

    assert_eq!(result.exit_code(), -1);
    assert!(matches!(
        result.error(),
        Some(CopieError::GitCommandError { .. })
    ));
}

#[test]
fn commit_sha_is_recorded_with_the_answers() {
    let tmp = TempDir::new().unwrap();
    let (template, git) = tagged_template(tmp.path());

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy_with(CopyOptions::default().with_vcs_ref("v1"));
    assert_eq!(result.exit_code(), 0);

    let answers_path = result.project_dir().unwrap().join(".copie-answers.yml");
    let recorded: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(answers_path).unwrap()).unwrap();
    assert_eq!(recorded["_commit"], git.head_sha().unwrap().as_str());

    // Bookkeeping entries stay out of the public answers.
    assert!(!result.answers().contains_key("_commit"));
}

#[test]
fn update_can_move_a_project_between_revisions() {
    let tmp = TempDir::new().unwrap();
    let (template, git) = tagged_template(tmp.path());
    git.commit_all("template v2").unwrap();
    git.tag("v2").unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();

    let v1 = copie.copy_with(CopyOptions::default().with_vcs_ref("v1"));
    assert_eq!(v1.exit_code(), 0);
    let content_path = v1.project_dir().unwrap().join("content.txt");
    assert_eq!(fs::read_to_string(&content_path).unwrap(), "v1 content\n");

    let v2 = copie.update_with(&v1, copie::UpdateOptions::default().with_vcs_ref("v2"));
    assert_eq!(v2.exit_code(), 0);
    assert_eq!(v2.project_dir(), v1.project_dir());
    assert_eq!(
        fs::read_to_string(&content_path).unwrap(),
        "working tree content\n"
    );
}
