//! Scoped temporary files.
//!
//! A [`TempFiles`] registry hands out uniquely named files and removes every
//! one still registered when it is dropped. Each binary owns a single
//! registry for the lifetime of its `run()` function, so cleanup happens on
//! normal return, on `?`-propagated errors and while unwinding from a panic,
//! always before the process exit code is decided.

use std::path::{Path, PathBuf};

use log::debug;
use tempfile::{Builder, TempPath};

use crate::error::Result;

#[derive(Debug, Default)]
pub struct TempFiles {
    files: Vec<TempPath>,
}

impl TempFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty file in the system temp directory.
    pub fn acquire(&mut self) -> Result<PathBuf> {
        let file = Builder::new().prefix("devflow-").tempfile()?;
        Ok(self.register(file.into_temp_path()))
    }

    /// Create a new empty file inside `dir`.
    ///
    /// Use this when the file will later be renamed over another file in the
    /// same directory, since a rename cannot cross filesystems.
    pub fn acquire_in(&mut self, dir: &Path) -> Result<PathBuf> {
        let file = Builder::new().prefix(".devflow-").tempfile_in(dir)?;
        Ok(self.register(file.into_temp_path()))
    }

    /// Atomically move a registered file to `dest` and stop tracking it.
    pub fn persist(&mut self, path: &Path, dest: &Path) -> Result<()> {
        match self.files.iter().position(|p| &**p == path) {
            Some(index) => {
                let temp = self.files.remove(index);
                temp.persist(dest).map_err(|e| e.error)?;
            }
            None => std::fs::rename(path, dest)?,
        }
        Ok(())
    }

    /// Number of files still scheduled for removal.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Remove every registered file now.
    pub fn cleanup(&mut self) {
        for path in self.files.drain(..) {
            let shown = path.to_path_buf();
            match path.close() {
                Ok(()) => debug!("Removed temp file {}", shown.display()),
                Err(e) => debug!("Temp file {} already gone: {}", shown.display(), e),
            }
        }
    }

    fn register(&mut self, path: TempPath) -> PathBuf {
        let owned = path.to_path_buf();
        debug!("Created temp file {}", owned.display());
        self.files.push(path);
        owned
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_acquire_creates_unique_files() {
        let mut temps = TempFiles::new();
        let a = temps.acquire().unwrap();
        let b = temps.acquire().unwrap();

        assert_ne!(a, b);
        assert!(a.exists());
        assert!(b.exists());
        assert_eq!(temps.len(), 2);
    }

    #[test]
    fn test_drop_removes_files() {
        let path = {
            let mut temps = TempFiles::new();
            let path = temps.acquire().unwrap();
            fs::write(&path, "secret").unwrap();
            path
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_files_removed_on_error_return() {
        fn failing(captured: &mut Option<PathBuf>) -> Result<()> {
            let mut temps = TempFiles::new();
            *captured = Some(temps.acquire()?);
            Err(crate::error::Error::Aws {
                message: "boom".to_string(),
            })
        }

        let mut captured = None;
        assert!(failing(&mut captured).is_err());
        assert!(!captured.unwrap().exists());
    }

    #[test]
    fn test_files_removed_on_panic() {
        let mut captured = None;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut temps = TempFiles::new();
            captured = Some(temps.acquire().unwrap());
            panic!("forced");
        }));
        assert!(result.is_err());
        assert!(!captured.unwrap().exists());
    }

    #[test]
    fn test_cleanup_tolerates_already_removed_file() {
        let mut temps = TempFiles::new();
        let path = temps.acquire().unwrap();
        fs::remove_file(&path).unwrap();

        temps.cleanup();
        assert!(temps.is_empty());
    }

    #[test]
    fn test_persist_moves_and_unregisters() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("credentials");
        let mut temps = TempFiles::new();

        let path = temps.acquire_in(dir.path()).unwrap();
        fs::write(&path, "new contents").unwrap();
        temps.persist(&path, &dest).unwrap();
        drop(temps);

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new contents");
    }
}
