//! Fresh-render workflow tests.

use std::fs;

use copie::harness::{CopyOptions, Outcome};
use copie::{CopieError, CopieFixture, HarnessOptions};
use tempfile::TempDir;

use super::common::{basic_template, fixture_with_basic_template, write_template};

#[test]
fn copy_renders_declared_defaults() {
    let (_tmp, mut copie) = fixture_with_basic_template().unwrap();

    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    assert!(result.error().is_none());
    let project = result.project_dir().expect("successful render");
    assert!(project.is_dir());

    let readme = fs::read_to_string(project.join("README.rst")).unwrap();
    assert_eq!(readme, "foobar\nTest Project\n");
}

#[test]
fn copy_applies_extra_answers() {
    let (_tmp, mut copie) = fixture_with_basic_template().unwrap();

    let result =
        copie.copy_with(CopyOptions::default().with_answer("repo_name", "helloworld"));

    assert_eq!(result.exit_code(), 0);
    let project = result.project_dir().unwrap();
    let readme = fs::read_to_string(project.join("README.rst")).unwrap();
    assert!(readme.starts_with("helloworld\n"));

    // Overrides surface in the result alongside untouched defaults.
    assert_eq!(result.answers()["repo_name"], "helloworld");
    assert_eq!(result.answers()["short_description"], "Test Project");
}

#[test]
fn sequential_copies_allocate_distinct_counter_dirs() {
    let (_tmp, mut copie) = fixture_with_basic_template().unwrap();

    let dirs: Vec<_> = (0..3)
        .map(|_| {
            let result = copie.copy();
            assert_eq!(result.exit_code(), 0);
            result.project_dir().unwrap().to_path_buf()
        })
        .collect();

    let names: Vec<_> = dirs
        .iter()
        .map(|dir| dir.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["copie000", "copie001", "copie002"]);
    for dir in &dirs {
        assert!(dir.is_dir());
    }
}

#[test]
fn missing_config_is_wrapped_into_a_failed_result() {
    let tmp = TempDir::new().unwrap();
    let empty_template = tmp.path().join("empty");
    fs::create_dir(&empty_template).unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&empty_template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), -1);
    assert!(matches!(result.error(), Some(CopieError::ConfigNotFound { .. })));
    assert!(result.project_dir().is_none());
    assert!(result.answers().is_empty());
}

#[test]
fn missing_subdirectory_fails_before_any_allocation() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("no-subdir");
    write_template(
        &template,
        "repo_name: {type: str, default: foobar}\n",
        &[("template/README.rst.tera", "{{ repo_name }}\n")],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), -1);
    assert!(matches!(
        result.error(),
        Some(CopieError::MissingSubdirectory { .. })
    ));
    // Validation runs before allocation, so nothing was left behind.
    assert!(!copie.test_dir().join("copie000").exists());
}

#[test]
fn override_round_trips_through_a_bare_expression() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("round-trip");
    write_template(
        &template,
        "_subdirectory: template\n",
        &[("template/v.txt.tera", "{{ v }}")],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy_with(CopyOptions::default().with_answer("v", "hello"));

    assert_eq!(result.exit_code(), 0);
    let content = fs::read_to_string(result.project_dir().unwrap().join("v.txt")).unwrap();
    assert_eq!(content, "hello");
}

#[test]
fn internal_answers_never_surface() {
    let (_tmp, mut copie) = fixture_with_basic_template().unwrap();

    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    assert!(!result.answers().is_empty());
    assert!(result.answers().keys().all(|name| !name.starts_with('_')));
}

#[test]
fn path_segments_are_rendered() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("pathy");
    write_template(
        &template,
        "_subdirectory: template\nrepo_name: demo\n",
        &[(
            "template/{{ repo_name }}/note.txt.tera",
            "inside {{ repo_name }}\n",
        )],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    let note = result.project_dir().unwrap().join("demo/note.txt");
    assert_eq!(fs::read_to_string(note).unwrap(), "inside demo\n");
}

#[test]
fn conditional_file_names_can_omit_the_entry() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("conditional");
    write_template(
        &template,
        "_subdirectory: template\nwith_extra: false\n",
        &[
            (
                "template/{% if with_extra %}extra.txt{% endif %}.tera",
                "extra\n",
            ),
            ("template/base.txt", "base\n"),
        ],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();

    let without = copie.copy();
    assert_eq!(without.exit_code(), 0);
    let project = without.project_dir().unwrap();
    assert!(project.join("base.txt").is_file());
    assert!(!project.join("extra.txt").exists());

    let with = copie.copy_with(CopyOptions::default().with_answer("with_extra", true));
    assert_eq!(with.exit_code(), 0);
    assert!(with.project_dir().unwrap().join("extra.txt").is_file());
}

#[test]
fn exclude_patterns_prune_entries() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("excluding");
    write_template(
        &template,
        "_subdirectory: template\n_exclude: ['*.skip']\n",
        &[
            ("template/kept.txt", "kept\n"),
            ("template/dropped.skip", "dropped\n"),
        ],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    let project = result.project_dir().unwrap();
    assert!(project.join("kept.txt").is_file());
    assert!(!project.join("dropped.skip").exists());
}

#[test]
fn verbatim_files_are_copied_unrendered() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("verbatim");
    write_template(
        &template,
        "_subdirectory: template\n",
        &[("template/raw.txt", "not rendered: {{ v }}\n")],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    let raw = fs::read_to_string(result.project_dir().unwrap().join("raw.txt")).unwrap();
    assert_eq!(raw, "not rendered: {{ v }}\n");
}

#[test]
fn answers_file_is_recorded_in_the_project() {
    let (_tmp, mut copie) = fixture_with_basic_template().unwrap();

    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    let answers_path = result.project_dir().unwrap().join(".copie-answers.yml");
    let recorded: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(answers_path).unwrap()).unwrap();
    assert_eq!(recorded["repo_name"], "foobar");
    assert!(recorded["_src_path"].as_str().is_some());
}

#[cfg(unix)]
#[test]
fn failing_task_terminates_with_its_exit_status() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("tasked");
    write_template(
        &template,
        "_subdirectory: template\n_tasks: ['exit 7']\n",
        &[("template/file.txt", "content\n")],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), 7);
    assert!(matches!(result.outcome(), Outcome::Terminated { code: 7, .. }));
    assert!(matches!(result.error(), Some(CopieError::RendererExit { .. })));
    assert!(result.project_dir().is_none());
}

#[cfg(unix)]
#[test]
fn tasks_run_in_the_generated_project() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("tasked-ok");
    write_template(
        &template,
        "_subdirectory: template\n_tasks: ['touch created-by-task']\n",
        &[("template/file.txt", "content\n")],
    )
    .unwrap();

    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&template))
            .unwrap();
    let result = copie.copy();

    assert_eq!(result.exit_code(), 0);
    assert!(result.project_dir().unwrap().join("created-by-task").is_file());
}

#[test]
fn explicit_template_dir_overrides_the_default() {
    let tmp = TempDir::new().unwrap();
    // Fixture default points at a template that would fail...
    let broken = tmp.path().join("broken");
    fs::create_dir(&broken).unwrap();
    let mut copie =
        CopieFixture::with_options(HarnessOptions::default().with_template_dir(&broken)).unwrap();

    // ...but the per-call template wins.
    let good = basic_template(tmp.path()).unwrap();
    let result = copie.copy_with(CopyOptions::default().with_template_dir(&good));
    assert_eq!(result.exit_code(), 0);
}
