//! Parent/child template chaining tests.
//!
//! Two miniature templates: a parent producing a data file and an
//! answers file, and a child whose configuration consumes the parent's
//! answers through `_external_data`.

use std::fs;
use std::path::{Path, PathBuf};

use copie::CopieError;

use super::common::{fixture_with_basic_template, write_template};

fn create_parent_template(base: &Path) -> PathBuf {
    let template = base.join("parent_template");
    write_template(
        &template,
        concat!(
            "_subdirectory: template\n",
            "_answers_file: .parent-answers.yml\n",
            "project_name: parent project\n",
        ),
        &[(
            "template/parent_file.txt.tera",
            "parent-data\n{{ project_name }}\n",
        )],
    )
    .unwrap();
    template
}

fn create_child_template(base: &Path) -> PathBuf {
    let template = base.join("child_template");
    write_template(
        &template,
        concat!(
            "_subdirectory: template\n",
            "_answers_file: .child-answers.yml\n",
            "child_name: foo bar\n",
            "_external_data:\n",
            "  parent: .parent-answers.yml\n",
            "project_name: \"{{ _external_data.parent.project_name }}\"\n",
        ),
        &[(
            "template/child.txt.tera",
            "child-generated\n{{ project_name }}\n{{ child_name }}\n",
        )],
    )
    .unwrap();
    template
}

#[test]
fn parent_child_roundtrip() {
    let (tmp, mut copie) = fixture_with_basic_template().unwrap();
    let parent_template = create_parent_template(tmp.path());
    let child_template = create_child_template(tmp.path());

    let parent_result =
        copie.copy_with(copie::CopyOptions::default().with_template_dir(&parent_template));
    assert_eq!(parent_result.exit_code(), 0);
    let parent_file = parent_result.project_dir().unwrap().join("parent_file.txt");
    assert_eq!(
        fs::read_to_string(&parent_file).unwrap(),
        "parent-data\nparent project\n"
    );

    let mut chained = copie.chain(&parent_result, &child_template).unwrap();
    let child_result = chained.copy();
    assert_eq!(child_result.exit_code(), 0);
    let child_project = child_result.project_dir().unwrap();

    // The parent's output was staged into the child project...
    let staged = child_project.join("parent_file.txt");
    assert!(staged.is_file());
    assert_eq!(
        fs::read_to_string(&staged).unwrap(),
        "parent-data\nparent project\n"
    );
    assert!(child_project.join(".parent-answers.yml").is_file());

    // ...and the child rendered with the parent's data.
    let child_file = child_project.join("child.txt");
    assert_eq!(
        fs::read_to_string(&child_file).unwrap(),
        "child-generated\nparent project\nfoo bar\n"
    );
}

#[test]
fn parent_and_child_outputs_do_not_collide() {
    let (tmp, mut copie) = fixture_with_basic_template().unwrap();
    let parent_template = create_parent_template(tmp.path());
    let child_template = create_child_template(tmp.path());

    let parent_result =
        copie.copy_with(copie::CopyOptions::default().with_template_dir(&parent_template));
    let parent_dir = parent_result.project_dir().unwrap().to_path_buf();

    let mut chained = copie.chain(&parent_result, &child_template).unwrap();
    let child_result = chained.copy();

    let child_dir = child_result.project_dir().unwrap();
    assert_ne!(parent_dir, child_dir);
    // Same counter sequence, so the child landed in the next slot.
    assert_eq!(parent_dir.file_name().unwrap(), "copie000");
    assert_eq!(child_dir.file_name().unwrap(), "copie001");
}

#[test]
fn chaining_a_failed_parent_is_rejected_eagerly() {
    let (tmp, mut copie) = fixture_with_basic_template().unwrap();
    let child_template = create_child_template(tmp.path());

    let empty = tmp.path().join("empty");
    fs::create_dir(&empty).unwrap();
    let failed_parent =
        copie.copy_with(copie::CopyOptions::default().with_template_dir(&empty));
    assert_ne!(failed_parent.exit_code(), 0);

    let error = copie
        .chain(&failed_parent, &child_template)
        .err()
        .expect("chaining must fail");
    assert!(matches!(error, CopieError::ChainedParentFailed { .. }));
    assert!(error.to_string().contains("successful exit code"));
}

#[test]
fn child_without_external_data_file_fails_at_render_time() {
    let (tmp, mut copie) = fixture_with_basic_template().unwrap();
    let child_template = create_child_template(tmp.path());

    // Render the child directly, without a parent: the declared
    // external data file is missing from the destination.
    let result =
        copie.copy_with(copie::CopyOptions::default().with_template_dir(&child_template));

    assert_eq!(result.exit_code(), -1);
    assert!(matches!(
        result.error(),
        Some(CopieError::ExternalDataMissing { .. })
    ));
}
