//! Executable lookup on `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::SpawnError;

/// Resolve `binary` to an absolute executable path.
///
/// Names containing a path separator are checked as given; bare names are
/// searched for in every `PATH` entry, first match wins.
///
/// # Errors
///
/// Returns `SpawnError::NotFound` if no executable matches.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, SpawnError> {
    let path_var = std::env::var_os("PATH");
    resolve_in(binary, path_var.as_deref())
}

/// Resolve `binary` against an explicit `PATH` value.
///
/// # Errors
///
/// Returns `SpawnError::NotFound` if no executable matches.
pub fn resolve_in(binary: &str, path_var: Option<&OsStr>) -> Result<PathBuf, SpawnError> {
    let not_found = || SpawnError::NotFound {
        binary: binary.to_string(),
    };

    if binary.is_empty() {
        return Err(not_found());
    }

    let candidate = Path::new(binary);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(std::path::absolute(candidate)?)
        } else {
            Err(not_found())
        };
    }

    let path_var = path_var.ok_or_else(not_found)?;
    for dir in std::env::split_paths(path_var) {
        for name in candidate_names(binary) {
            let full = dir.join(&name);
            if is_executable(&full) {
                tracing::debug!(binary, path = %full.display(), "Resolved shell binary");
                return Ok(std::path::absolute(full)?);
            }
        }
    }

    Err(not_found())
}

#[cfg(unix)]
fn candidate_names(binary: &str) -> Vec<String> {
    vec![binary.to_string()]
}

#[cfg(not(unix))]
fn candidate_names(binary: &str) -> Vec<String> {
    vec![binary.to_string(), format!("{binary}.exe")]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
