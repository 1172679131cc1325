//! Repo-local architectural lint for the stockroom hexagon.
//!
//! The backend keeps its business rules in `domain` and its infrastructure in
//! `outbound` adapters. This crate parses every source file under those
//! directories and reports:
//!
//! - `domain` code depending on `outbound` or on persistence crates
//! - one outbound adapter importing another
//! - tenant-bearing Diesel tables referenced outside the scoped-transaction
//!   module, which is the only place allowed to build tenant predicates
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name the backend library is imported under by binaries and tests.
const CRATE_NAME: &str = "stockroom";

/// Diesel tables whose rows carry a `tenant_id`.
const TENANT_TABLES: [&str; 7] = [
    "categories",
    "locations",
    "departments",
    "assets",
    "consumables",
    "stock_transactions",
    "alerts",
];

/// Persistence files allowed to name tenant tables.
const TENANT_TABLE_OWNERS: [&str; 3] = [
    "outbound/persistence/diesel_tenant_transaction.rs",
    "outbound/persistence/schema.rs",
    "outbound/persistence/models.rs",
];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io(io::Error),
    /// Rust source parsing failed.
    Parse {
        /// File that failed to parse.
        file: PathBuf,
        /// Parser message.
        message: String,
    },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting architecture: {err}"),
            Self::Parse { file, message } => write!(
                f,
                "Failed to parse Rust source while linting architecture ({}): {message}",
                file.display()
            ),
            Self::Violations(violations) => {
                writeln!(f, "Architecture boundary violations:")?;
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

/// Lint the backend crate sources on disk.
///
/// `backend_dir` must be the `backend/` directory at the repository root.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = backend_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer module layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, &layer, &parsed));
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
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

/// The layer a file under `backend/src` belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    /// An outbound adapter, named by its directory under `outbound/`.
    Outbound(Option<String>),
}

impl ModuleLayer {
    fn infer_from_path(relative_path: &Path) -> Option<Self> {
        let mut components = relative_path
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned());
        match components.next()?.as_str() {
            "domain" => Some(Self::Domain),
            "outbound" => {
                let adapter = components
                    .next()
                    .map(|name| name.trim_end_matches(".rs").to_owned())
                    .filter(|name| name != "mod");
                Some(Self::Outbound(adapter))
            }
            _ => None,
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound(_) => "outbound",
        }
    }

    fn forbidden_crate_roots(&self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from([
                "bb8",
                "diesel",
                "diesel_async",
                "diesel_migrations",
                "pg_embedded_setup_unpriv",
                "postgres",
                "tracing_subscriber",
            ]),
            Self::Outbound(_) => BTreeSet::new(),
        }
    }
}

fn lint_parsed_source(file: &Path, layer: &ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_crates = layer.forbidden_crate_roots();
    let layer_name = layer.name();
    let owns_tenant_tables = TENANT_TABLE_OWNERS
        .iter()
        .any(|owner| Path::new(owner) == file);

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        let internal = internal_module_path(segments);

        match (layer, internal.first().map(String::as_str)) {
            (ModuleLayer::Domain, Some("outbound")) => {
                messages.insert(format!("{layer_name} module must not depend on crate::outbound"));
            }
            (ModuleLayer::Outbound(Some(own)), Some("outbound")) => {
                if let Some(other) = internal.get(1).filter(|other| *other != own) {
                    messages.insert(format!(
                        "outbound adapter `{own}` must not depend on adapter `{other}`"
                    ));
                }
            }
            _ => {}
        }

        if let Some(root) = forbidden_external_crate_root(segments, &forbidden_crates) {
            messages.insert(format!(
                "{layer_name} module must not depend on external crate `{root}`"
            ));
        }

        if let Some(table) = tenant_table_reference(segments).filter(|_| !owns_tenant_tables) {
            messages.insert(format!(
                "tenant table `{table}` may only be queried through the scoped transaction"
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

/// The path with any `crate`/`self`/`super`/crate-name prefix removed, when
/// it names a backend module.
fn internal_module_path(segments: &[String]) -> &[String] {
    let Some(first) = segments.first().map(String::as_str) else {
        return &[];
    };
    let start = if first == CRATE_NAME {
        1
    } else if is_relative_module_segment(first) {
        segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment))
            .unwrap_or(segments.len())
    } else if matches!(first, "domain" | "outbound") {
        0
    } else {
        return &[];
    };
    segments.get(start..).unwrap_or(&[])
}

fn forbidden_external_crate_root(
    segments: &[String],
    forbidden_roots: &BTreeSet<&'static str>,
) -> Option<&'static str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == CRATE_NAME {
        return None;
    }
    forbidden_roots.get(root).copied()
}

fn tenant_table_reference(segments: &[String]) -> Option<&'static str> {
    let schema = segments.iter().position(|segment| segment == "schema")?;
    let table = segments.get(schema + 1)?;
    TENANT_TABLES
        .iter()
        .find(|candidate| **candidate == table.as_str())
        .copied()
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
        if segments.is_empty() {
            return;
        }
        self.paths.insert(segments);
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                let mut next = prefix;
                next.push(path.ident.to_string());
                self.record_use_tree(&path.tree, next);
            }
            syn::UseTree::Name(name) => {
                let mut segments = prefix;
                segments.push(name.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Rename(rename) => {
                let mut segments = prefix;
                segments.push(rename.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Glob(_) => {
                let mut segments = prefix;
                segments.push("*".to_owned());
                self.paths.insert(segments);
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

fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer_dir in ["domain", "outbound"] {
        let dir = src_dir.join(layer_dir);
        if !dir.exists() {
            continue;
        }
        collect_sources_under(src_dir, &dir, &mut sources)?;
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}

fn collect_sources_under(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources_under(src_root, &path, sources)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }

        let relative = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource {
            file: relative,
            contents,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
