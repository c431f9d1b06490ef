//! Tera-backed renderer.
//!
//! The default [`Renderer`] implementation. It understands the template
//! format described in the crate docs: a `copier.*` configuration next to
//! a content subdirectory, `.tera`-suffixed files rendered through Tera
//! with the suffix stripped, everything else copied verbatim, and file or
//! directory names that may themselves contain template expressions.
//!
//! Beyond plain rendering it implements:
//!
//! - revision selection: a non-`HEAD` `vcs_ref` is materialized through
//!   [`GitRepo::export`] into the session cache and rendered from there;
//! - `_exclude` glob patterns, pruned during traversal;
//! - `_external_data` files loaded from the destination and exposed to
//!   templates;
//! - `_tasks` shell commands run in the generated project, gated by the
//!   unsafe flag — a task exiting non-zero becomes the early-termination
//!   signal [`CopieError::RendererExit`];
//! - answer recording: the resolved answers plus `_src_path`/`_commit`
//!   bookkeeping are written to the project's answers file and mirrored
//!   into the session replay directory.
//!
//! String answer values containing template syntax are themselves
//! rendered once, against the non-templated answers and the external
//! data, so a declared default may reference another answer
//! (`project_name: "{{ _external_data.parent.project_name }}"`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use glob::Pattern;
use serde_yaml::{Mapping, Value};
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::config::SessionConfig;
use crate::constants::{COMMIT_ANSWER, DEFAULT_VCS_REF, SRC_PATH_ANSWER, TEMPLATE_SUFFIX};
use crate::core::{CopieError, Result};
use crate::git::GitRepo;
use crate::renderer::{CopyRequest, Renderer, UpdateRequest, Worker};
use crate::template::{AnswerMap, TemplateConfig, merge_answers, public_answers};

/// Template source resolved to an on-disk tree, possibly a cached
/// revision export.
#[derive(Debug)]
struct SourceTree {
    root: PathBuf,
    commit: Option<String>,
}

/// Renderer backed by the Tera engine and the system git binary.
pub struct TeraRenderer {
    session: SessionConfig,
}

impl TeraRenderer {
    /// Create a renderer bound to a provisioned session configuration
    /// file.
    pub fn new(config_file: &Path) -> Result<Self> {
        Ok(Self {
            session: SessionConfig::load(config_file)?,
        })
    }

    /// Resolve the tree to render: the working tree for `HEAD` (the
    /// default), a cached export for any other reference.
    fn source_at(&self, src: &Path, vcs_ref: Option<&str>) -> Result<SourceTree> {
        let reference = vcs_ref.unwrap_or(DEFAULT_VCS_REF);
        let repo = GitRepo::discover(src);

        if reference == DEFAULT_VCS_REF {
            return Ok(SourceTree {
                root: src.to_path_buf(),
                commit: repo.and_then(|r| r.rev_parse(DEFAULT_VCS_REF).ok()),
            });
        }

        let repo = repo.ok_or_else(|| CopieError::GitRepoInvalid {
            path: src.display().to_string(),
        })?;
        let exported = repo.export(reference, &self.session.cache_dir)?;
        Ok(SourceTree {
            root: exported.path,
            commit: Some(exported.commit),
        })
    }

    fn content_root(&self, source: &SourceTree, config: &TemplateConfig) -> Result<PathBuf> {
        let subdirectory = config.subdirectory().unwrap_or_default().to_string();
        let root = source.root.join(&subdirectory);
        if root.is_dir() {
            Ok(root)
        } else {
            Err(CopieError::SubdirectoryMissing {
                template_dir: source.root.display().to_string(),
                subdirectory,
            })
        }
    }

    fn render_tree(
        &self,
        content_root: &Path,
        dst: &Path,
        context: &Context,
        excludes: &[Pattern],
        overwrite: bool,
    ) -> Result<()> {
        let mut tera = Tera::default();
        let walker = WalkDir::new(content_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let rel = entry
                    .path()
                    .strip_prefix(content_root)
                    .unwrap_or_else(|_| entry.path());
                let rel = rel.to_string_lossy();
                !excludes.iter().any(|pattern| pattern.matches(&rel))
            });

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            let rel = entry
                .path()
                .strip_prefix(content_root)
                .expect("walked entry lives under the content root");
            let rel_str = rel.to_string_lossy().into_owned();

            let rendered_rel = tera
                .render_str(&rel_str, context)
                .map_err(|source| CopieError::Template {
                    path: rel_str.clone(),
                    source,
                })?;

            if entry.file_type().is_dir() {
                if has_empty_segment(&rendered_rel) {
                    tracing::debug!(path = %rel_str, "skipping directory with empty rendered name");
                    continue;
                }
                fs::create_dir_all(dst.join(&rendered_rel))?;
            } else if entry.file_type().is_file() {
                let (target_rel, is_template) = match rendered_rel.strip_suffix(TEMPLATE_SUFFIX) {
                    Some(stripped) => (stripped.to_string(), true),
                    None => (rendered_rel.clone(), false),
                };
                // A segment rendering to nothing means "omit this entry"
                // (conditional files).
                if has_empty_segment(&target_rel) {
                    tracing::debug!(path = %rel_str, "skipping file with empty rendered name");
                    continue;
                }
                if is_template {
                    let raw = fs::read_to_string(entry.path())?;
                    let rendered =
                        tera.render_str(&raw, context)
                            .map_err(|source| CopieError::Template {
                                path: rel_str.clone(),
                                source,
                            })?;
                    write_file(dst, &target_rel, rendered.as_bytes(), overwrite)?;
                } else {
                    let bytes = fs::read(entry.path())?;
                    write_file(dst, &target_rel, &bytes, overwrite)?;
                }
            }
            // Symlinks and special files are not materialized.
        }
        Ok(())
    }

    fn load_external_data(
        &self,
        config: &TemplateConfig,
        dst: &Path,
    ) -> Result<BTreeMap<String, Value>> {
        let mut loaded = BTreeMap::new();
        for (name, relative) in config.external_data() {
            let path = dst.join(&relative);
            if !path.is_file() {
                return Err(CopieError::ExternalDataMissing { name, path });
            }
            let value: Value = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
            loaded.insert(name, value);
        }
        Ok(loaded)
    }

    fn run_tasks(&self, config: &TemplateConfig, dst: &Path, unsafe_ok: bool) -> Result<()> {
        let tasks = config.tasks();
        if tasks.is_empty() {
            return Ok(());
        }
        if !unsafe_ok {
            return Err(CopieError::UnsafeNotAllowed);
        }
        for command in &tasks {
            tracing::debug!(command = %command, "running template task");
            let status = shell_command(command).current_dir(dst).status()?;
            if !status.success() {
                return Err(CopieError::RendererExit {
                    code: status.code().unwrap_or(-1),
                    reason: format!("task `{command}` failed"),
                });
            }
        }
        Ok(())
    }

    fn record_answers(&self, answers_file: &str, dst: &Path, recorded: &AnswerMap) -> Result<()> {
        let body = serde_yaml::to_string(recorded)?;
        let contents =
            format!("# Recorded by copie; changes here are overwritten on update.\n{body}");
        fs::write(dst.join(answers_file), &contents)?;

        // Replay snapshots are best-effort bookkeeping.
        if let Some(project) = dst.file_name().and_then(|name| name.to_str()) {
            let snapshot = self.session.replay_dir.join(format!("{project}.yml"));
            if fs::write(&snapshot, &contents).is_err() {
                tracing::warn!(path = %snapshot.display(), "could not write replay snapshot");
            }
        }
        Ok(())
    }

    /// Locate and parse the recorded-answers file of an existing
    /// project: the default name first, then any `*-answers.yml`
    /// carrying the source-path bookkeeping entry.
    fn load_recorded_answers(&self, dst: &Path) -> Result<AnswerMap> {
        let mut names = vec![crate::constants::DEFAULT_ANSWERS_FILE.to_string()];
        for entry in fs::read_dir(dst)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if (name.ends_with("-answers.yml") || name.ends_with("-answers.yaml"))
                && !names.contains(&name)
            {
                names.push(name);
            }
        }

        for name in names {
            let path = dst.join(&name);
            if !path.is_file() {
                continue;
            }
            let value: Value = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
            if let Value::Mapping(mapping) = value {
                let answers = mapping_to_answers(&mapping);
                if answers.contains_key(SRC_PATH_ANSWER) {
                    return Ok(answers);
                }
            }
        }
        Err(CopieError::AnswersFileMissing {
            project_dir: dst.display().to_string(),
        })
    }
}

impl Renderer for TeraRenderer {
    fn render_fresh(&self, request: &CopyRequest) -> Result<Worker> {
        let source = self.source_at(&request.src_path, request.vcs_ref.as_deref())?;
        let config = TemplateConfig::load(&source.root)?;
        config.validate()?;
        let content_root = self.content_root(&source, &config)?;

        let baseline = if request.use_defaults {
            config.declared_defaults()
        } else {
            AnswerMap::new()
        };
        let answers = merge_answers(&baseline, &request.answers);

        let external = self.load_external_data(&config, &request.dst_path)?;
        let (context, resolved) = resolve_answers(&answers, &external)?;
        let excludes = compile_excludes(&config)?;

        self.render_tree(&content_root, &request.dst_path, &context, &excludes, true)?;
        self.run_tasks(&config, &request.dst_path, request.unsafe_ok)?;

        let recorded = finalize_recorded(resolved, &request.src_path, source.commit.as_deref());
        self.record_answers(config.answers_file(), &request.dst_path, &recorded)?;
        tracing::debug!(dst = %request.dst_path.display(), "fresh render complete");
        Ok(Worker::new(request.dst_path.clone(), recorded))
    }

    fn render_update(&self, request: &UpdateRequest) -> Result<Worker> {
        let previous = self.load_recorded_answers(&request.dst_path)?;
        let src_path = previous
            .get(SRC_PATH_ANSWER)
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .ok_or_else(|| CopieError::ConfigError {
                message: format!(
                    "recorded answers in {} lack `{SRC_PATH_ANSWER}`",
                    request.dst_path.display()
                ),
            })?;

        let source = self.source_at(&src_path, request.vcs_ref.as_deref())?;
        let config = TemplateConfig::load(&source.root)?;
        config.validate()?;
        let content_root = self.content_root(&source, &config)?;

        // Baseline: declared defaults, then the previously recorded
        // answers, then the caller's overrides.
        let mut baseline = if request.use_defaults {
            config.declared_defaults()
        } else {
            AnswerMap::new()
        };
        baseline = merge_answers(&baseline, &public_answers(&previous));
        let answers = merge_answers(&baseline, &request.answers);

        let external = self.load_external_data(&config, &request.dst_path)?;
        let (context, resolved) = resolve_answers(&answers, &external)?;
        let excludes = compile_excludes(&config)?;

        self.render_tree(
            &content_root,
            &request.dst_path,
            &context,
            &excludes,
            request.overwrite,
        )?;
        self.run_tasks(&config, &request.dst_path, request.unsafe_ok)?;

        let recorded = finalize_recorded(resolved, &src_path, source.commit.as_deref());
        self.record_answers(config.answers_file(), &request.dst_path, &recorded)?;
        tracing::debug!(dst = %request.dst_path.display(), "update render complete");
        Ok(Worker::new(request.dst_path.clone(), recorded))
    }
}

fn write_file(dst: &Path, relative: &str, bytes: &[u8], overwrite: bool) -> Result<()> {
    let target = dst.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    if !overwrite && target.exists() {
        let existing = fs::read(&target)?;
        if existing != bytes {
            return Err(CopieError::WouldOverwrite {
                path: target.display().to_string(),
            });
        }
    }
    fs::write(&target, bytes)?;
    Ok(())
}

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut shell = Command::new("cmd");
        shell.args(["/C", command]);
        shell
    }
    #[cfg(not(windows))]
    {
        let mut shell = Command::new("sh");
        shell.args(["-c", command]);
        shell
    }
}

fn compile_excludes(config: &TemplateConfig) -> Result<Vec<Pattern>> {
    config
        .exclude_patterns()
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|error| CopieError::ConfigError {
                message: format!("invalid `_exclude` pattern `{pattern}`: {error}"),
            })
        })
        .collect()
}

/// Build the render context and the resolved answer map.
///
/// Non-templated values go in first; string values containing template
/// syntax are then rendered against that partial context (plus external
/// data), so they may reference plain answers but not each other.
fn resolve_answers(
    answers: &AnswerMap,
    external: &BTreeMap<String, Value>,
) -> Result<(Context, AnswerMap)> {
    let mut context = Context::new();
    if !external.is_empty() {
        let data = external
            .iter()
            .map(|(name, value)| Ok((name.clone(), to_json(value)?)))
            .collect::<Result<serde_json::Map<String, serde_json::Value>>>()?;
        context.insert("_external_data", &data);
    }

    let mut resolved = AnswerMap::new();
    let mut templated = Vec::new();
    for (name, value) in answers {
        match value {
            Value::String(text) if is_templated(text) => templated.push((name, text)),
            _ => {
                context.insert(name.as_str(), &to_json(value)?);
                resolved.insert(name.clone(), value.clone());
            }
        }
    }

    let mut tera = Tera::default();
    for (name, raw) in templated {
        let rendered = tera
            .render_str(raw, &context)
            .map_err(|source| CopieError::Template {
                path: format!("answer `{name}`"),
                source,
            })?;
        context.insert(name.as_str(), &rendered);
        resolved.insert(name.clone(), Value::from(rendered));
    }
    Ok((context, resolved))
}

fn finalize_recorded(mut resolved: AnswerMap, src_path: &Path, commit: Option<&str>) -> AnswerMap {
    resolved.insert(
        SRC_PATH_ANSWER.to_string(),
        Value::from(src_path.display().to_string()),
    );
    if let Some(commit) = commit {
        resolved.insert(COMMIT_ANSWER.to_string(), Value::from(commit));
    }
    resolved
}

fn is_templated(text: &str) -> bool {
    text.contains("{{") || text.contains("{%")
}

fn has_empty_segment(path: &str) -> bool {
    path.split(['/', '\\'])
        .any(|segment| segment.trim().is_empty())
}

fn to_json(value: &Value) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|error| CopieError::ConfigError {
        message: format!("answer value not representable in the render context: {error}"),
    })
}

fn mapping_to_answers(mapping: &Mapping) -> AnswerMap {
    mapping
        .iter()
        .filter_map(|(key, value)| key.as_str().map(|name| (name.to_string(), value.clone())))
        .collect()
}
