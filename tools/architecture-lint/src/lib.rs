//! Repo-local lint for the hexagonal boundaries of the match request client.
//!
//! `client/src` is split into the `domain` (types, lifecycle controller,
//! ports), `outbound` adapters, and the `config` loader. This crate parses
//! each layer with `syn` and reports:
//!
//! - `domain` code reaching into `outbound` or `config`, or into HTTP,
//!   configuration, or CLI crates
//! - `outbound` adapters reaching into `config` or into configuration and
//!   CLI crates
//! - `config` pulling in the CLI crate
//!
//! `lib.rs` and `bin/` are composition roots and are not checked.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Name the client library is imported under from outside the crate.
const CLIENT_CRATE: &str = "mentorship_client";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io(io::Error),
    /// A source path or its contents could not be used.
    Parse { file: Utf8PathBuf, message: String },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting client layers: {err}"),
            Self::Parse { file, message } => {
                write!(f, "Failed to parse client source {file}: {message}")
            }
            Self::Violations(violations) => {
                writeln!(f, "Client layer boundary violations:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Lint the client crate sources on disk.
///
/// `client_dir` must be the `client/` directory at the repository root.
pub fn lint_client_sources(client_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src_dir = Dir::open_ambient_dir(client_dir.join("src"), ambient_authority())?;
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "file does not belong to a checked layer".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    pub contents: String,
}

/// The architectural layer inferred from a path under `client/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Outbound,
    Config,
}

impl ModuleLayer {
    const ALL: [Self; 3] = [Self::Domain, Self::Outbound, Self::Config];

    fn infer_from_path(relative_path: &Utf8Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_str();
        Self::ALL
            .into_iter()
            .find(|layer| layer.source_root() == first)
    }

    /// Directory or file under `client/src` holding the layer.
    const fn source_root(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound => "outbound",
            Self::Config => "config.rs",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound => "outbound",
            Self::Config => "config",
        }
    }

    fn forbidden_module_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from(["config", "outbound"]),
            Self::Outbound => BTreeSet::from(["config"]),
            Self::Config => BTreeSet::new(),
        }
    }

    fn forbidden_crate_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from([
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
                "url",
                "wiremock",
            ]),
            Self::Outbound => BTreeSet::from(["clap", "color_eyre", "ortho_config"]),
            Self::Config => BTreeSet::from(["clap", "color_eyre"]),
        }
    }
}

fn lint_parsed_source(file: &Utf8Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_modules = layer.forbidden_module_roots();
    let forbidden_crates = layer.forbidden_crate_roots();
    let layer_name = layer.name();

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        // Single identifiers are locals or items in scope, never imports.
        if segments.len() < 2 {
            continue;
        }
        if let Some(root) = internal_module_root(segments)
            .and_then(|root| forbidden_modules.get(root).copied())
        {
            messages.insert(format!(
                "{layer_name} module must not depend on crate::{root}"
            ));
        }
        if let Some(root) =
            external_crate_root(segments).and_then(|root| forbidden_crates.get(root).copied())
        {
            messages.insert(format!(
                "{layer_name} module must not depend on external crate `{root}`"
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn internal_module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if ModuleLayer::ALL
        .into_iter()
        .any(|layer| layer.name() == first)
    {
        return Some(first);
    }
    let start_index = match first {
        "crate" | "self" | "super" => segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment.as_str()))?,
        CLIENT_CRATE => 1,
        _ => return None,
    };
    segments.get(start_index).map(String::as_str)
}

fn external_crate_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == CLIENT_CRATE {
        return None;
    }
    Some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_lint_sources(src_dir: &Dir) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer in ModuleLayer::ALL {
        let root = Utf8PathBuf::from(layer.source_root());
        if src_dir.is_dir(&root) {
            let dir = src_dir.open_dir(&root)?;
            collect_sources_under(&dir, &root, &mut sources)?;
        } else if src_dir.is_file(&root) {
            let contents = src_dir.read_to_string(&root)?;
            sources.push(LintSource {
                file: root,
                contents,
            });
        }
    }
    Ok(sources)
}

fn collect_sources_under(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| ArchitectureLintError::Parse {
                file: relative.to_path_buf(),
                message: format!("non UTF-8 file name {}", raw.to_string_lossy()),
            })?;
        let path = relative.join(&name);
        if entry.file_type()?.is_dir() {
            collect_sources_under(&entry.open_dir()?, &path, sources)?;
            continue;
        }
        if path.extension() != Some("rs") {
            continue;
        }
        let contents = dir.read_to_string(&name)?;
        sources.push(LintSource {
            file: path,
            contents,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
