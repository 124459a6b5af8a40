use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

/// A throwaway directory that is removed when dropped.
///
/// Tests use it as the storage path of a database or as the home of a
/// configuration file.
pub struct TestStorage {
    dir: TempDir,
}

impl TestStorage {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("branma-test-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a not yet existing child, useful to check that code creates it.
    pub fn child(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_file(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.child(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}
