//! CLI entry point for the client layer lint.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};

fn main() -> ExitCode {
    let outcome = client_dir().map_err(|err| err.to_string()).and_then(|dir| {
        architecture_lint::lint_client_sources(&dir).map_err(|err| err.to_string())
    });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(io::stderr().lock(), "{message}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClientDirError;

impl fmt::Display for ClientDirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to locate client/ under a UTF-8 workspace root (directory with a workspace Cargo.toml)"
        )
    }
}

impl std::error::Error for ClientDirError {}

/// `client/` under the first workspace root found from the environment,
/// the working directory, or this crate's manifest directory.
fn client_dir() -> Result<Utf8PathBuf, ClientDirError> {
    let candidates = [
        std::env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from),
        std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok()),
        Some(Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|start| workspace_root(start))
        .map(|root| root.join("client"))
        .filter(|dir| dir.is_dir())
        .ok_or(ClientDirError)
}

fn workspace_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map(Utf8Path::to_path_buf)
}

fn declares_workspace(manifest: &Utf8Path) -> bool {
    fs::read_to_string(manifest).is_ok_and(|contents| contents.contains("[workspace]"))
}
