//! Template configuration resolution and validation.
//!
//! A template is a directory tree of parameterized file stubs plus a
//! configuration file declaring its answers. This module locates that
//! configuration (`copier.yml` or `copier.yaml`), parses its possibly
//! multi-document YAML body through the include-aware
//! [`ConfigLoader`](crate::config::ConfigLoader), and enforces the one
//! structural invariant the harness depends on: the template must declare
//! an output subdirectory.
//!
//! Keys beginning with `_` are renderer settings (`_subdirectory`,
//! `_answers_file`, `_exclude`, `_tasks`, `_external_data`); every other
//! top-level key declares an answer. See [`answers`] for how defaults are
//! extracted and merged with caller overrides.

pub mod answers;

pub use answers::{AnswerMap, declared_defaults, merge_answers, public_answers};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::ConfigLoader;
use crate::constants::{
    ANSWERS_FILE_KEY, CONFIG_FILE_EXTENSIONS, CONFIG_FILE_STEM, DEFAULT_ANSWERS_FILE, EXCLUDE_KEY,
    EXTERNAL_DATA_KEY, SUBDIRECTORY_KEY, TASKS_KEY,
};
use crate::core::{CopieError, Result};

/// Parsed template configuration.
///
/// Consumed read-only; the template author owns the file. Construction
/// does not validate the subdirectory invariant — call
/// [`TemplateConfig::validate`] before rendering.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    path: PathBuf,
    template_dir: PathBuf,
    documents: Vec<Mapping>,
}

impl TemplateConfig {
    /// Locate the configuration file in `template_dir`.
    ///
    /// Files named `copier.*` are considered; the one whose extension is
    /// a recognized configuration extension wins. Fails with
    /// [`CopieError::ConfigNotFound`] when nothing matches.
    pub fn resolve(template_dir: &Path) -> Result<PathBuf> {
        for extension in CONFIG_FILE_EXTENSIONS {
            let candidate = template_dir.join(format!("{CONFIG_FILE_STEM}.{extension}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(CopieError::ConfigNotFound {
            dir: template_dir.display().to_string(),
        })
    }

    /// Resolve and parse the configuration of the template at
    /// `template_dir`, resolving `!include` directives against it.
    pub fn load(template_dir: &Path) -> Result<Self> {
        let path = Self::resolve(template_dir)?;
        let loader = ConfigLoader::new(template_dir);
        let documents = loader
            .load_file(&path)?
            .into_iter()
            .filter_map(|document| match document {
                Value::Mapping(mapping) => Some(mapping),
                _ => None,
            })
            .collect();
        tracing::debug!(config = %path.display(), "loaded template configuration");
        Ok(Self {
            path,
            template_dir: template_dir.to_path_buf(),
            documents,
        })
    }

    /// Enforce the output-subdirectory invariant.
    ///
    /// At least one document must declare [`SUBDIRECTORY_KEY`]; without
    /// it, generated files would not live directly under the project
    /// directory and the harness's layout assumptions break.
    pub fn validate(&self) -> Result<()> {
        if self.subdirectory().is_some() {
            Ok(())
        } else {
            Err(CopieError::MissingSubdirectory {
                config: self.path.display().to_string(),
            })
        }
    }

    /// Path of the configuration file itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The template directory this configuration was loaded from.
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// The declared content root, when present.
    pub fn subdirectory(&self) -> Option<&str> {
        self.setting(SUBDIRECTORY_KEY).and_then(Value::as_str)
    }

    /// Name of the recorded-answers file written into generated
    /// projects.
    pub fn answers_file(&self) -> &str {
        self.setting(ANSWERS_FILE_KEY)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ANSWERS_FILE)
    }

    /// Glob patterns excluded from rendering, relative to the content
    /// root.
    pub fn exclude_patterns(&self) -> Vec<String> {
        self.string_sequence(EXCLUDE_KEY)
    }

    /// Post-render shell tasks, in declaration order.
    pub fn tasks(&self) -> Vec<String> {
        self.string_sequence(TASKS_KEY)
    }

    /// External data declarations: name → destination-relative path of a
    /// YAML file to load before rendering.
    pub fn external_data(&self) -> BTreeMap<String, String> {
        let mut entries = BTreeMap::new();
        if let Some(Value::Mapping(mapping)) = self.setting(EXTERNAL_DATA_KEY) {
            for (key, value) in mapping {
                if let (Some(name), Some(path)) = (key.as_str(), value.as_str()) {
                    entries.insert(name.to_string(), path.to_string());
                }
            }
        }
        entries
    }

    /// Defaults of every declared answer, across all documents.
    pub fn declared_defaults(&self) -> AnswerMap {
        declared_defaults(&self.documents)
    }

    /// First occurrence of a setting key across the documents.
    fn setting(&self, key: &str) -> Option<&Value> {
        self.documents.iter().find_map(|document| document.get(key))
    }

    fn string_sequence(&self, key: &str) -> Vec<String> {
        match self.setting(key) {
            Some(Value::Sequence(entries)) => entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Write a minimal template to `dir` for documentation examples and
/// tests: a configuration body plus `(relative path, contents)` pairs.
///
/// Relative paths are created under `dir` as-is, so content files belong
/// under the subdirectory the configuration declares.
pub fn write_template(dir: &Path, config: &str, files: &[(&str, &str)]) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("copier.yml"), config)?;
    for (relative, contents) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(())
}
