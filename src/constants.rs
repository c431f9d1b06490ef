//! Global constants used throughout the copie codebase.
//!
//! File-name conventions, reserved configuration keys, and environment
//! variable names live here so the rest of the crate never hard-codes
//! them twice.

/// Stem of the template configuration file (`copier.yml` / `copier.yaml`).
pub const CONFIG_FILE_STEM: &str = "copier";

/// Recognized extensions for the template configuration file, in the
/// order they are tried during resolution.
pub const CONFIG_FILE_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Configuration key naming the template's sole content root.
///
/// Templates without this key are rejected before any rendering happens:
/// the harness assumes generated files live directly under the project
/// directory, which only holds when the template declares a subdirectory.
pub const SUBDIRECTORY_KEY: &str = "_subdirectory";

/// Configuration key overriding the recorded-answers file name.
pub const ANSWERS_FILE_KEY: &str = "_answers_file";

/// Default name of the recorded-answers file written into each
/// generated project.
pub const DEFAULT_ANSWERS_FILE: &str = ".copie-answers.yml";

/// Configuration key listing glob patterns excluded from rendering.
pub const EXCLUDE_KEY: &str = "_exclude";

/// Configuration key listing post-render shell tasks.
pub const TASKS_KEY: &str = "_tasks";

/// Configuration key mapping names to destination-relative YAML files
/// exposed to templates as `_external_data.<name>`.
pub const EXTERNAL_DATA_KEY: &str = "_external_data";

/// Prefix marking an answer name as internal bookkeeping.
///
/// Entries with this prefix are recorded in the answers file but never
/// surface in [`RunResult::answers`](crate::harness::RunResult::answers).
pub const INTERNAL_PREFIX: &str = "_";

/// Recorded-answers key holding the source template path.
pub const SRC_PATH_ANSWER: &str = "_src_path";

/// Recorded-answers key holding the rendered template commit, when the
/// template directory is a git repository.
pub const COMMIT_ANSWER: &str = "_commit";

/// Suffix marking a template file as renderable; stripped from the
/// generated file name. Files without it are copied verbatim.
pub const TEMPLATE_SUFFIX: &str = ".tera";

/// Prefix of the counter-indexed output directories allocated under an
/// orchestrator's test directory (`copie000`, `copie001`, ...).
pub const OUTPUT_DIR_PREFIX: &str = "copie";

/// Zero-padded width of the output directory counter.
pub const OUTPUT_DIR_COUNTER_WIDTH: usize = 3;

/// Git reference rendered by default: the working tree as it stands.
pub const DEFAULT_VCS_REF: &str = "HEAD";

/// Environment variable selecting the default template directory for
/// fixtures (the analog of a `--template` test-runner option).
pub const TEMPLATE_ENV: &str = "COPIE_TEMPLATE";

/// Environment variable suppressing post-test deletion of the fixture
/// output root (the analog of a `--keep-copied-projects` flag).
pub const KEEP_PROJECTS_ENV: &str = "COPIE_KEEP_PROJECTS";

/// Maximum nesting depth for `!include` resolution in configuration
/// files. Guards against include cycles.
pub const MAX_INCLUDE_DEPTH: usize = 16;
