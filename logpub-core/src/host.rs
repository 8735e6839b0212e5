//! Host-environment lookups used by the path redaction rules.
//!
//! The install and home directories are passed into the pipeline as explicit
//! values rather than read from ambient global state, so the transforms stay
//! pure and testable.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// The host-supplied directories redacted from the log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostEnvironment {
    /// Absolute installation directory of the application whose log this is.
    pub install_dir: PathBuf,
    /// The current user's home directory.
    pub home_dir: PathBuf,
}

impl HostEnvironment {
    pub fn new(install_dir: PathBuf, home_dir: PathBuf) -> Self {
        Self {
            install_dir,
            home_dir,
        }
    }

    /// Resolves the environment from the application data directory: the
    /// install directory is one level above it, the home directory comes
    /// from the platform.
    pub fn detect(data_dir: &Path) -> Result<Self> {
        let install_dir = data_dir
            .parent()
            .ok_or_else(|| {
                anyhow!(
                    "Data directory {} has no parent to use as the install directory",
                    data_dir.display()
                )
            })?
            .to_path_buf();
        Ok(Self::new(install_dir, resolve_home_dir()?))
    }

    /// Builds the environment from an explicit install directory, resolving
    /// the home directory from the platform.
    pub fn with_install_dir(install_dir: PathBuf) -> Result<Self> {
        Ok(Self::new(install_dir, resolve_home_dir()?))
    }
}

fn resolve_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine the user's home directory"))
}
