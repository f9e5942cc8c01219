//! The shared catalog: a `database.xml` kept in a git working copy.
//!
//! Every git call blocks until git exits. A failing call aborts the run; a
//! diverged or conflicted repository has to be fixed by hand.

use crate::constants::{CATALOG_FILE_NAME, DEFAULT_BRANCH, DEFAULT_REMOTE};
use crate::error::{Error, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A catalog shared with other machines.
pub trait SharedCatalog {
    /// Local file holding the shared catalog.
    fn catalog_path(&self) -> PathBuf;

    /// Bring the local copy up to date with the other machines.
    fn pull(&self) -> Result<()>;

    /// Publish the local copy. Returns false when there was nothing to publish.
    fn publish(&self, message: &str) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct GitRepository {
    pub dir: PathBuf,
    pub remote: String,
    pub branch: String,
    pub file_name: String,
}

impl GitRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            file_name: CATALOG_FILE_NAME.to_string(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        debug!("Running `{}` in {}", command, self.dir.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| Error::VersionControl {
                command: command.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::VersionControl {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SharedCatalog for GitRepository {
    fn catalog_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn pull(&self) -> Result<()> {
        info!("Pulling shared catalog in {}", self.dir.display());
        self.git(&["pull", self.remote.as_str(), self.branch.as_str()])?;
        Ok(())
    }

    fn publish(&self, message: &str) -> Result<bool> {
        self.git(&["add", self.file_name.as_str()])?;
        let changes = self.git(&["status", "--porcelain", "--", self.file_name.as_str()])?;
        if changes.trim().is_empty() {
            info!("Shared catalog unchanged, nothing to push");
            return Ok(false);
        }

        self.git(&["commit", "-m", message, "--", self.file_name.as_str()])?;
        self.git(&["push", self.remote.as_str(), self.branch.as_str()])?;
        info!("Pushed shared catalog to {}/{}", self.remote, self.branch);
        Ok(true)
    }
}

/// Commit message naming the machine the update came from.
pub fn commit_message() -> String {
    format!(
        "Updated {} from {} at {}",
        CATALOG_FILE_NAME,
        host_name(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

fn host_name() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .or_else(|| {
            Command::new("hostname")
                .output()
                .ok()
                .filter(|out| out.status.success())
                .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| "unknown host".to_string())
}

/// Checks that `dir` looks like a git working copy before any work starts.
pub fn ensure_working_copy(dir: &Path) -> Result<()> {
    if dir.join(".git").exists() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} is not a git working copy",
            dir.display()
        )))
    }
}
