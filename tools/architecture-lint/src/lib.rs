//! Layering check for the `portal` crate.
//!
//! `portal/src` is split into `domain` (types, ports, services), `inbound`
//! (the command line) and `outbound` (HTTP clients). This crate parses each
//! file under those directories and reports imports that cross a boundary:
//!
//! - `domain` may not reach adapters, settings, or transport and terminal
//!   crates;
//! - `inbound` may not reach `outbound` or talk HTTP itself;
//! - `outbound` may not reach `inbound` or settings, nor pull in CLI or
//!   server crates.
//!
//! Run with `cargo run -p architecture-lint [path/to/portal]`.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Name the portal crate uses for itself in integration-style paths.
const OWN_CRATE: &str = "portal";

/// Top-level directories that are checked.
const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

/// A layer of the portal crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// `src/domain`.
    Domain,
    /// `src/inbound`.
    Inbound,
    /// `src/outbound`.
    Outbound,
}

impl Layer {
    /// Layer owning `relative_path` (relative to `src`).
    pub fn of(relative_path: &Utf8Path) -> Option<Self> {
        match relative_path.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    /// Sibling modules this layer must not import.
    const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound", "config"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound", "config"],
        }
    }

    /// External crates this layer must not import.
    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "actix_web",
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
            ],
            Self::Inbound => &["reqwest", "actix_web"],
            Self::Outbound => &["actix_web", "cap_std", "clap", "color_eyre", "ortho_config"],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a violating import reached for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dependency {
    /// A module of the portal crate, e.g. `outbound`.
    Module(String),
    /// An external crate, e.g. `reqwest`.
    Crate(String),
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(name) => write!(f, "crate::{name}"),
            Self::Crate(name) => write!(f, "external crate `{name}`"),
        }
    }
}

/// One forbidden import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `portal/src`.
    pub file: Utf8PathBuf,
    /// Layer the file belongs to.
    pub layer: Layer,
    /// What it imported.
    pub dependency: Dependency,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} code must not depend on {}",
            self.file, self.layer, self.dependency
        )
    }
}

/// Why a lint run failed.
#[derive(Debug)]
pub enum LintError {
    /// A directory or file could not be read.
    Io {
        /// File or directory being read.
        path: Utf8PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// A file is not valid Rust or has a non-UTF-8 name.
    Parse {
        /// Offending file.
        file: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// A source was given that belongs to no known layer.
    UnknownLayer {
        /// File outside every known layer.
        file: Utf8PathBuf,
    },
    /// Boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::Parse { file, message } => write!(f, "cannot parse {file}: {message}"),
            Self::UnknownLayer { file } => {
                write!(f, "{file} is not under domain/, inbound/ or outbound/")
            }
            Self::Violations(violations) => {
                writeln!(f, "{} layering violation(s):", violations.len())?;
                for violation in violations {
                    writeln!(f, "  {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A Rust source to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `portal/src`.
    pub file: Utf8PathBuf,
    /// Source text.
    pub contents: String,
}

impl LintSource {
    /// Pair a relative path with its text.
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// Check every layer file under `portal_dir/src`.
pub fn lint_portal(portal_dir: &Utf8Path) -> Result<(), LintError> {
    let src = portal_dir.join("src");
    let root = Dir::open_ambient_dir(&src, ambient_authority()).map_err(|source| LintError::Io {
        path: src.clone(),
        source,
    })?;
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        let layer_path = Utf8Path::new(layer);
        match root.open_dir(layer) {
            Ok(dir) => collect(&dir, layer_path, &mut sources)?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(LintError::Io {
                    path: src.join(layer_path),
                    source,
                });
            }
        }
    }
    lint_sources(&sources)
}

fn collect(dir: &Dir, prefix: &Utf8Path, out: &mut Vec<LintSource>) -> Result<(), LintError> {
    let io_error = |source| LintError::Io {
        path: prefix.to_owned(),
        source,
    };
    let mut entries = Vec::new();
    for entry in dir.entries().map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| LintError::Parse {
                file: prefix.to_owned(),
                message: format!("non UTF-8 file name {raw:?}"),
            })?;
        let is_dir = entry.file_type().map_err(io_error)?.is_dir();
        entries.push((name, is_dir));
    }
    entries.sort();

    for (name, is_dir) in entries {
        let path = prefix.join(&name);
        if is_dir {
            let child = dir.open_dir(&name).map_err(|source| LintError::Io {
                path: path.clone(),
                source,
            })?;
            collect(&child, &path, out)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&name).map_err(|source| LintError::Io {
                path: path.clone(),
                source,
            })?;
            out.push(LintSource::new(path, contents));
        }
    }
    Ok(())
}

/// Check in-memory sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), LintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| LintError::UnknownLayer {
            file: source.file.clone(),
        })?;
        let parsed = syn::parse_file(&source.contents).map_err(|error| LintError::Parse {
            file: source.file.clone(),
            message: error.to_string(),
        })?;
        violations.extend(
            forbidden_dependencies(layer, &parsed)
                .into_iter()
                .map(|dependency| Violation {
                    file: source.file.clone(),
                    layer,
                    dependency,
                }),
        );
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(LintError::Violations(violations))
    }
}

fn forbidden_dependencies(layer: Layer, parsed: &syn::File) -> BTreeSet<Dependency> {
    let mut paths = PathCollector::default();
    paths.visit_file(parsed);
    paths
        .paths
        .iter()
        .filter_map(|segments| classify(segments))
        .filter(|dependency| match dependency {
            Dependency::Module(name) => layer.forbidden_modules().contains(&name.as_str()),
            Dependency::Crate(name) => layer.forbidden_crates().contains(&name.as_str()),
        })
        .collect()
}

/// Decide what a path's root refers to.
///
/// `crate::x`, `super::x`, `portal::x` and bare layer names refer to
/// modules; anything else rooted at an identifier is treated as a crate.
fn classify(segments: &[String]) -> Option<Dependency> {
    let relative = |segment: &&String| matches!(segment.as_str(), "crate" | "self" | "super");
    let first = segments.first()?;
    if relative(&first) {
        let module = segments.iter().find(|segment| !relative(segment))?;
        return Some(Dependency::Module(module.clone()));
    }
    let first = first.as_str();
    if first == OWN_CRATE {
        return segments.get(1).cloned().map(Dependency::Module);
    }
    if LAYER_DIRS.contains(&first) || first == "config" {
        return Some(Dependency::Module(first.to_owned()));
    }
    Some(Dependency::Crate(first.to_owned()))
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn walk_use(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.walk_use(&path.tree, prefix);
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
                    self.walk_use(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        // Single-segment paths are locals, types in scope or macros.
        if node.segments.len() > 1 {
            self.paths.insert(
                node.segments
                    .iter()
                    .map(|segment| segment.ident.to_string())
                    .collect(),
            );
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.walk_use(&node.tree, Vec::new());
    }
}

#[cfg(test)]
mod tests;
