//! Fixture lifecycle and option tests.

use std::fs;
use std::path::PathBuf;

use copie::fixtures::{CopieFixture, HarnessOptions, session_config_file};
use serial_test::serial;
use tempfile::TempDir;

use super::common::basic_template;

#[test]
fn output_root_is_removed_when_the_fixture_drops() {
    let tmp = TempDir::new().unwrap();
    let template = basic_template(tmp.path()).unwrap();

    let root = {
        let mut copie =
            CopieFixture::with_options(HarnessOptions::default().with_template_dir(template))
                .unwrap();
        let result = copie.copy();
        assert_eq!(result.exit_code(), 0);
        copie.root().to_path_buf()
    };

    assert!(!root.exists());
}

#[test]
fn keep_flag_preserves_the_output_root() {
    let tmp = TempDir::new().unwrap();
    let template = basic_template(tmp.path()).unwrap();

    let root = {
        let mut copie = CopieFixture::with_options(
            HarnessOptions::default()
                .with_template_dir(template)
                .with_keep_projects(true),
        )
        .unwrap();
        let result = copie.copy();
        assert_eq!(result.exit_code(), 0);
        copie.root().to_path_buf()
    };

    assert!(root.exists());
    assert!(root.join("copie/copie000").is_dir());
    fs::remove_dir_all(root).unwrap();
}

#[test]
#[serial]
fn options_come_from_the_environment() {
    let tmp = TempDir::new().unwrap();
    let template = basic_template(tmp.path()).unwrap();

    // SAFETY: the test is serialized; no other thread reads the
    // environment concurrently.
    unsafe {
        std::env::set_var("COPIE_TEMPLATE", &template);
        std::env::set_var("COPIE_KEEP_PROJECTS", "1");
    }
    let options = HarnessOptions::from_env().unwrap();
    unsafe {
        std::env::remove_var("COPIE_TEMPLATE");
        std::env::remove_var("COPIE_KEEP_PROJECTS");
    }

    assert!(options.template_dir.is_absolute());
    assert_eq!(options.template_dir, template);
    assert!(options.keep_projects);
}

#[test]
#[serial]
fn template_option_defaults_to_the_working_directory() {
    unsafe {
        std::env::remove_var("COPIE_TEMPLATE");
        std::env::remove_var("COPIE_KEEP_PROJECTS");
    }
    let options = HarnessOptions::from_env().unwrap();

    assert!(options.template_dir.is_absolute());
    assert_eq!(
        options.template_dir.canonicalize().unwrap(),
        std::env::current_dir().unwrap().canonicalize().unwrap()
    );
    assert!(!options.keep_projects);
}

#[test]
#[serial]
fn session_fixtures_share_config_but_not_test_dirs() {
    let tmp = TempDir::new().unwrap();
    let template = basic_template(tmp.path()).unwrap();
    // SAFETY: the test is serialized; no other thread reads the
    // environment concurrently.
    unsafe {
        std::env::set_var("COPIE_TEMPLATE", &template);
    }

    let first = CopieFixture::session().unwrap();
    let second = CopieFixture::session().unwrap();
    unsafe {
        std::env::remove_var("COPIE_TEMPLATE");
    }

    assert_eq!(first.config_file(), session_config_file());
    assert_eq!(second.config_file(), session_config_file());
    assert_ne!(first.test_dir(), second.test_dir());

    let mut dirs: Vec<PathBuf> = vec![first.test_dir().into(), second.test_dir().into()];
    dirs.sort();
    assert!(dirs[0].is_dir());
    assert!(dirs[1].is_dir());
}
