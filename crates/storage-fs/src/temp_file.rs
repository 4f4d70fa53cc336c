use log::warn;
use std::path::{Path, PathBuf};

/// Removes an in-flight temp file when dropped, unless [`TempFileGuard::disarm`]
/// was called after the file was renamed into place.
///
/// Dropping happens on every exit path: early `?` returns, panics, and the
/// save future being dropped mid-copy.
pub(crate) struct TempFileGuard {
    path: Option<PathBuf>,
}

impl TempFileGuard {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub(crate) fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    pub(crate) fn disarm(mut self) {
        self.path = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove temp file {}: {}", path.display(), e),
        }
    }
}
