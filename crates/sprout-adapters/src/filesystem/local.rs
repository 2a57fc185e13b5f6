//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use sprout_core::{application::ports::Filesystem, error::SproutResult};

/// Production filesystem implementation using `std::fs`.
///
/// Writes are atomic: content goes to a temporary file in the destination
/// directory which is then renamed over the target, so a failed write never
/// leaves a truncated artifact behind.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SproutResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> SproutResult<()> {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());

        // Temp file must live on the same filesystem as the target for the
        // rename to be atomic.
        let mut temp = match parent {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new(),
        }
        .map_err(|e| map_io_error(path, e, "create temporary file"))?;

        io::Write::write_all(&mut temp, content.as_bytes())
            .map_err(|e| map_io_error(path, e, "write file"))?;

        temp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> sprout_core::error::SproutError {
    use sprout_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
