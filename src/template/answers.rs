//! Answer extraction and merging.
//!
//! An *answer* is a named value supplied to a template to parameterize
//! rendering. Templates declare answers in their configuration, either as
//! a literal default or as a structured declaration with a `default` key;
//! callers supply overrides at render time. This module computes the
//! effective answer set.

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};

use crate::constants::INTERNAL_PREFIX;

/// Resolved answers, keyed by answer name.
pub type AnswerMap = BTreeMap<String, Value>;

/// Extract the default value from one answer declaration.
///
/// A plain scalar (or sequence) *is* the default; a structured
/// declaration contributes the value under its `default` key, or nothing
/// when that key is absent.
pub fn default_of(declaration: &Value) -> Option<Value> {
    match declaration {
        Value::Mapping(fields) => fields.get("default").cloned(),
        other => Some(other.clone()),
    }
}

/// Collect the declared defaults from a template configuration's
/// documents. Keys with the internal prefix are renderer settings, not
/// answers, and are skipped.
pub fn declared_defaults(documents: &[Mapping]) -> AnswerMap {
    let mut defaults = AnswerMap::new();
    for document in documents {
        for (key, declaration) in document {
            let Some(name) = key.as_str() else { continue };
            if name.starts_with(INTERNAL_PREFIX) {
                continue;
            }
            if let Some(default) = default_of(declaration) {
                defaults.insert(name.to_string(), default);
            }
        }
    }
    defaults
}

/// Right-biased shallow union: overrides always win, and override names
/// absent from the declared set are added.
pub fn merge_answers(defaults: &AnswerMap, overrides: &AnswerMap) -> AnswerMap {
    let mut merged = defaults.clone();
    for (name, value) in overrides {
        merged.insert(name.clone(), value.clone());
    }
    merged
}

/// Strip internal bookkeeping entries, leaving only the caller-visible
/// answers.
pub fn public_answers(all: &AnswerMap) -> AnswerMap {
    all.iter()
        .filter(|(name, _)| !name.starts_with(INTERNAL_PREFIX))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
