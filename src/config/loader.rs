//! YAML loading with an instance-scoped `!include` directive.
//!
//! Large template configurations can be split across files: a value
//! tagged `!include <path>` is replaced at load time by the parsed
//! contents of the referenced file. Paths resolve against the loader's
//! base directory (normally the template directory), and includes nest up
//! to [`MAX_INCLUDE_DEPTH`](crate::constants::MAX_INCLUDE_DEPTH) levels.
//!
//! The directive is scoped to the [`ConfigLoader`] instance rather than
//! registered globally in the parser, so two templates loaded in the same
//! process never see each other's base directory.
//!
//! ```yaml
//! _subdirectory: template
//! project_name: demo
//! extra_questions: !include questions/extra.yml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

use crate::constants::MAX_INCLUDE_DEPTH;
use crate::core::{CopieError, Result};

/// Tag recognized on values that should be replaced by another file's
/// parsed contents.
const INCLUDE_TAG: &str = "!include";

/// YAML loader that resolves `!include` directives against a fixed base
/// directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a loader resolving includes relative to `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Load a possibly multi-document YAML file, resolving includes in
    /// every document.
    pub fn load_file(&self, path: &Path) -> Result<Vec<Value>> {
        let text = fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Load possibly multi-document YAML text, resolving includes in
    /// every document.
    pub fn load_str(&self, text: &str) -> Result<Vec<Value>> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document)?;
            documents.push(self.resolve(value, 0)?);
        }
        Ok(documents)
    }

    fn resolve(&self, value: Value, depth: usize) -> Result<Value> {
        match value {
            Value::Tagged(tagged) if tagged.tag == INCLUDE_TAG => {
                let target = tagged.value.as_str().ok_or(CopieError::InvalidInclude)?;
                self.load_include(Path::new(target), depth)
            }
            Value::Mapping(mapping) => {
                let mut resolved = serde_yaml::Mapping::with_capacity(mapping.len());
                for (key, entry) in mapping {
                    resolved.insert(key, self.resolve(entry, depth)?);
                }
                Ok(Value::Mapping(resolved))
            }
            Value::Sequence(sequence) => {
                let resolved = sequence
                    .into_iter()
                    .map(|entry| self.resolve(entry, depth))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Sequence(resolved))
            }
            other => Ok(other),
        }
    }

    fn load_include(&self, target: &Path, depth: usize) -> Result<Value> {
        let joined = self.base_dir.join(target);
        let path = std::path::absolute(&joined).unwrap_or(joined);
        if depth >= MAX_INCLUDE_DEPTH {
            return Err(CopieError::IncludeDepthExceeded { path });
        }
        if !path.is_file() {
            return Err(CopieError::IncludeNotFound { path });
        }
        tracing::trace!(path = %path.display(), depth, "resolving include");
        let text = fs::read_to_string(&path)?;
        let value: Value = serde_yaml::from_str(&text)?;
        self.resolve(value, depth + 1)
    }
}
