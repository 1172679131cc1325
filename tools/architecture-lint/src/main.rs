//! CLI entry point for the stockroom architecture lint.
//!
//! Usage: `architecture-lint [BACKEND_DIR]`. Without an argument the
//! `backend/` directory of the enclosing Cargo workspace is linted.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const WORKSPACE_NOT_FOUND: &str =
    "unable to locate workspace root (directory containing a workspace Cargo.toml)";

fn main() -> ExitCode {
    let mut stderr = io::stderr().lock();
    let Some(backend_dir) = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| workspace_root().map(|root| root.join("backend")))
    else {
        let _ = writeln!(stderr, "{WORKSPACE_NOT_FOUND}");
        return ExitCode::FAILURE;
    };

    match architecture_lint::lint_backend_sources(&backend_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(stderr, "{err}");
            ExitCode::FAILURE
        }
    }
}

fn workspace_root() -> Option<PathBuf> {
    let candidates = [
        std::env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        std::env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|start| find_workspace_root(&start))
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn declares_workspace(manifest: &Path) -> bool {
    fs::read_to_string(manifest).is_ok_and(|contents| contents.contains("[workspace]"))
}
