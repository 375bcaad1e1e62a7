use anyhow::{Context, Result};
use clipvault_core::{Config, Vault};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Manages an isolated data directory with tempfile
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { dir })
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Initialize a vault and overwrite its default config
    pub fn init_vault(&self, config: &Config) -> Result<Vault> {
        Vault::init(self.path()).context("Failed to initialize vault")?;
        config.save(self.path())?;
        self.open_vault()
    }

    /// Open the existing vault
    pub fn open_vault(&self) -> Result<Vault> {
        Ok(Vault::open(self.path())?)
    }

    /// Write file to workspace
    pub fn write_file(&self, path: &str, content: &[u8]) -> Result<()> {
        let full_path = self.path().join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directories for {}", path))?;
        }

        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write file: {}", path))?;

        Ok(())
    }

    /// Append to a file in the workspace
    pub fn append_file(&self, path: &str, content: &[u8]) -> Result<()> {
        let mut existing = if self.file_exists(path) {
            self.read_file(path)?
        } else {
            Vec::new()
        };
        existing.extend_from_slice(content);
        self.write_file(path, &existing)
    }

    /// Read file from workspace
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.path().join(path);
        fs::read(&full_path).with_context(|| format!("Failed to read file: {}", path))
    }

    /// Check if file exists
    pub fn file_exists(&self, path: &str) -> bool {
        self.path().join(path).exists()
    }

    /// All `.tmp` files anywhere under the workspace
    pub fn temp_files(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        collect_tmp(self.path(), &mut found)?;
        Ok(found)
    }
}

fn collect_tmp(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_tmp(&path, found)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("tmp") {
            found.push(path);
        }
    }
    Ok(())
}
