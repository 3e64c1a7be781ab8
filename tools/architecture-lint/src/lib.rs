//! Layer-boundary lint for the `land_registry` client crate.
//!
//! The client is split into `domain` (entities, ports, stores, workflows),
//! `inbound` (the command-line adapter) and `outbound` (Supabase and
//! Cloudinary adapters). Wiring happens in the binary-private `app` module,
//! which is not linted. The rules are:
//!
//! - `domain` must not reach into either adapter layer, nor pull in HTTP,
//!   signing, filesystem or CLI crates;
//! - `inbound` must not reach into `outbound` or talk HTTP itself;
//! - `outbound` must not reach into `inbound` or depend on CLI parsing.
//!
//! Run it with `cargo run -p architecture-lint` from the workspace root.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Name the client crate is imported under from integration code.
const CLIENT_CRATE: &str = "land_registry";

/// A single boundary violation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// The broken rule, e.g. `inbound code must not depend on crate::outbound`.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Walking or reading the source tree failed.
    Io(io::Error),
    /// A file could not be parsed, or sits outside every known layer.
    Parse {
        /// File path relative to `client/src`.
        file: Utf8PathBuf,
        /// Parser or layout complaint.
        message: String,
    },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read client sources: {err}"),
            Self::Parse { file, message } => write!(f, "could not lint {file}: {message}"),
            Self::Violations(violations) => {
                writeln!(f, "{} layer boundary violation(s):", violations.len())?;
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

/// Lint the client crate on disk.
///
/// `client_dir` is the crate directory holding `Cargo.toml` and `src/`.
pub fn lint_client_sources(client_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = Dir::open_ambient_dir(client_dir.join("src"), ambient_authority())?;
    let sources = collect_lint_sources(&src)?;
    lint_sources(&sources)
}

/// Lint in-memory sources whose paths are relative to `client/src`.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = BTreeSet::new();

    for source in sources {
        let layer =
            Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "file is not under domain/, inbound/ or outbound/".to_owned(),
            })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(
            violations.into_iter().collect(),
        ))
    }
}

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Rust source text.
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

struct LayerRules {
    modules: &'static [&'static str],
    crates: &'static [&'static str],
}

const DOMAIN_RULES: LayerRules = LayerRules {
    modules: &["inbound", "outbound", "app"],
    crates: &[
        "actix_rt",
        "actix_web",
        "cap_std",
        "clap",
        "hex",
        "ortho_config",
        "reqwest",
        "sha1",
        "tracing_subscriber",
    ],
};

const INBOUND_RULES: LayerRules = LayerRules {
    modules: &["outbound", "app"],
    crates: &["actix_web", "hex", "reqwest", "sha1"],
};

const OUTBOUND_RULES: LayerRules = LayerRules {
    modules: &["inbound", "app"],
    crates: &["actix_web", "clap"],
};

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    fn of(relative_path: &Utf8Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_str();
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    const fn rules(self) -> &'static LayerRules {
        match self {
            Self::Domain => &DOMAIN_RULES,
            Self::Inbound => &INBOUND_RULES,
            Self::Outbound => &OUTBOUND_RULES,
        }
    }
}

fn check_file(file: &Utf8Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let rules = layer.rules();
    let name = layer.dir();

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        let module = internal_root(segments).filter(|root| rules.modules.iter().any(|m| m == root));
        if let Some(module) = module {
            messages.insert(format!("{name} code must not depend on crate::{module}"));
        }
        let krate = external_root(segments).filter(|root| rules.crates.iter().any(|c| c == root));
        if let Some(krate) = krate {
            messages.insert(format!("{name} code must not use external crate `{krate}`"));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_owned(),
            message,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First crate-local module a path names, if any.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if first == CLIENT_CRATE {
        return segments.get(1).map(String::as_str);
    }
    if is_relative(first) {
        return segments
            .iter()
            .map(String::as_str)
            .find(|segment| !is_relative(segment));
    }
    Layer::ALL
        .iter()
        .map(|layer| layer.dir())
        .chain(["app"])
        .find(|dir| *dir == first)
}

fn external_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    (!is_relative(root) && root != CLIENT_CRATE).then_some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
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
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_lint_sources(src: &Dir) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let Ok(dir) = src.open_dir(layer.dir()) else {
            continue;
        };
        collect_under(&dir, Utf8PathBuf::from(layer.dir()), &mut sources)?;
    }
    sources.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(sources)
}

fn collect_under(
    dir: &Dir,
    relative: Utf8PathBuf,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name().into_string().map_err(|raw| {
            ArchitectureLintError::Parse {
                file: relative.clone(),
                message: format!("non UTF-8 file name {raw:?}"),
            }
        })?;
        let path = relative.join(&name);
        if entry.file_type()?.is_dir() {
            collect_under(&entry.open_dir()?, path, sources)?;
            continue;
        }
        if path.extension() != Some("rs") {
            continue;
        }
        let mut contents = String::new();
        entry.open()?.read_to_string(&mut contents)?;
        sources.push(LintSource {
            file: path,
            contents,
        });
    }
    Ok(())
}
