//! Unpacking a downloaded update over the installation directory.

use crate::error::InstallError;
use std::path::Path;
use std::process::{Command, Stdio};

pub trait Installer: Send {
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<(), InstallError>;
}

/// Runs the external `unzip` utility. Files already present in `dest` are
/// overwritten; nothing is backed up first.
#[derive(Debug, Clone)]
pub struct UnzipInstaller {
    program: String,
}

impl Default for UnzipInstaller {
    fn default() -> Self {
        Self { program: "unzip".to_string() }
    }
}

impl UnzipInstaller {
    #[cfg(test)]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Installer for UnzipInstaller {
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<(), InstallError> {
        log::info!("unpacking {} into {}", archive.display(), dest.display());
        let output = Command::new(&self.program)
            .arg("-o")
            .arg(archive)
            .arg("-d")
            .arg(dest)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| InstallError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("{} failed: {}", self.program, stderr.trim());
            return Err(InstallError::Status {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }
        Ok(())
    }
}
