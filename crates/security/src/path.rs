//! Path confinement — keep caller-supplied paths inside allow-listed roots.
//!
//! Candidates are resolved to an absolute canonical form (symlinks and
//! `..` segments included) before comparison. Paths that do not exist yet
//! are resolved through their deepest existing ancestor; the remaining
//! components are then applied one at a time, and every prefix that exists
//! on disk is canonicalized again so a symlink anywhere in the tail is
//! followed. Containment is checked per path component, so a root of
//! `/home/user` never admits `/home/user2`.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Sub-directory of the working directory that is always allow-listed.
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Error returned when path validation fails.
#[derive(Debug, thiserror::Error)]
pub enum PathValidationError {
    #[error("Path '{path}' is outside allowed roots")]
    OutsideAllowedRoots { path: String },

    #[error("Failed to resolve path '{path}': {reason}")]
    ResolveFailed { path: String, reason: String },
}

/// Resolve `path` to an absolute form with symlinks and dot segments removed.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty path"));
    }
    if path.to_string_lossy().contains('\0') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path contains a NUL byte",
        ));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let (mut resolved, existing) = absolute
        .ancestors()
        .find_map(|ancestor| ancestor.canonicalize().ok().map(|c| (c, ancestor)))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no resolvable ancestor"))?;

    let tail = absolute
        .strip_prefix(existing)
        .map_err(|e| io::Error::other(e.to_string()))?;
    for component in tail.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => {
                resolved.push(part);
                match resolved.canonicalize() {
                    Ok(real) => resolved = real,
                    // A link we cannot follow has no trustworthy target.
                    Err(_) if is_symlink(&resolved) => {
                        return Err(io::Error::new(
                            io::ErrorKind::NotFound,
                            "dangling symbolic link",
                        ));
                    }
                    Err(_) => {}
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Ok(resolved)
}

fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|m| m.file_type().is_symlink())
}

/// Read-only allow-list of base directories.
///
/// Built once at startup and shared by reference; never mutated.
#[derive(Debug, Clone)]
pub struct PathGuard {
    roots: Vec<PathBuf>,
}

impl PathGuard {
    /// Build a guard from explicit roots. Roots that cannot be resolved
    /// are dropped with a warning.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut resolved = Vec::new();
        for root in roots {
            let root = root.as_ref();
            match resolve_path(root) {
                Ok(r) => {
                    if !resolved.contains(&r) {
                        resolved.push(r);
                    }
                }
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "Dropping unresolvable allow-list root");
                }
            }
        }
        Self { roots: resolved }
    }

    /// The process-wide allow-list: working directory, its `artifacts`
    /// sub-directory, and the user's home directory.
    pub fn from_process_env() -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut roots = vec![cwd.clone(), cwd.join(ARTIFACTS_DIR)];
        if let Some(home) = dirs::home_dir() {
            roots.push(home);
        }
        let guard = Self::new(roots);
        tracing::debug!(roots = ?guard.roots, "Path guard initialised");
        Ok(guard)
    }

    /// Resolved allow-list roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Validate `path` and return its resolved form.
    pub fn check(&self, path: &str) -> Result<PathBuf, PathValidationError> {
        let resolved =
            resolve_path(Path::new(path)).map_err(|e| PathValidationError::ResolveFailed {
                path: path.into(),
                reason: e.to_string(),
            })?;

        if self.roots.iter().any(|root| resolved.starts_with(root)) {
            Ok(resolved)
        } else {
            Err(PathValidationError::OutsideAllowedRoots { path: path.into() })
        }
    }

    /// Predicate form of [`PathGuard::check`]; never panics or errors.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.check(path).is_ok()
    }
}
