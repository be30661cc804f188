// SPDX-License-Identifier: GPL-3.0-only

//! Capture through an external program
//!
//! Delegates the photo to a capture tool such as
//! `fswebcam --no-banner {output}`. The `{output}` placeholder is replaced by
//! the destination path; without a placeholder the destination is appended
//! as the last argument. The command line is split on whitespace, no shell is
//! involved.

use super::{CameraFacility, wrote_something};
use crate::constants::capture::OUTPUT_PLACEHOLDER;
use crate::errors::CameraError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info, warn};

/// Camera facility backed by an external capture command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace separated command line
    pub fn from_command_line(command_line: &str) -> Result<Self, CameraError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| CameraError::CommandFailed("empty capture command".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for a capture into `destination`
    pub fn arguments_for(&self, destination: &Path) -> Vec<String> {
        let output = destination.display().to_string();

        if self.args.iter().any(|arg| arg.contains(OUTPUT_PLACEHOLDER)) {
            self.args
                .iter()
                .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
                .collect()
        } else {
            let mut args = self.args.clone();
            args.push(output);
            args
        }
    }

    /// Run the command and check that it produced a file
    pub async fn run(&self, destination: &Path) -> Result<(), CameraError> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let args = self.arguments_for(destination);
        debug!(program = %self.program, ?args, "Running capture command");

        let status = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| CameraError::CommandFailed(format!("{}: {}", self.program, e)))?;

        if !status.success() {
            return Err(CameraError::CommandFailed(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        if !wrote_something(destination).await {
            return Err(CameraError::NothingWritten(destination.display().to_string()));
        }

        Ok(())
    }
}

impl CameraFacility for CommandCamera {
    fn request_capture(&self, destination: PathBuf) -> BoxFuture<'static, bool> {
        let camera = self.clone();

        async move {
            match camera.run(&destination).await {
                Ok(()) => {
                    info!(
                        program = %camera.program,
                        destination = %destination.display(),
                        "Photo captured"
                    );
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Capture command failed");
                    false
                }
            }
        }
        .boxed()
    }

    fn name(&self) -> &str {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_substituted() {
        let camera = CommandCamera::from_command_line("fswebcam --no-banner {output}").unwrap();
        assert_eq!(camera.program(), "fswebcam");
        assert_eq!(
            camera.arguments_for(Path::new("/tmp/photo_1.jpg")),
            vec!["--no-banner", "/tmp/photo_1.jpg"]
        );
    }

    #[test]
    fn test_destination_appended_without_placeholder() {
        let camera = CommandCamera::from_command_line("libcamera-still -o").unwrap();
        assert_eq!(
            camera.arguments_for(Path::new("/tmp/p.jpg")),
            vec!["-o", "/tmp/p.jpg"]
        );
    }

    #[test]
    fn test_empty_command_line_is_rejected() {
        assert!(CommandCamera::from_command_line("   ").is_err());
    }

    #[tokio::test]
    async fn test_missing_program_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CommandCamera::new("photo-express-no-such-program", Vec::new());
        assert!(!camera.request_capture(dir.path().join("p.jpg")).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_that_writes_nothing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CommandCamera::new("true", Vec::new());
        assert!(!camera.request_capture(dir.path().join("p.jpg")).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_that_writes_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.jpg");
        std::fs::write(&source, b"pixels").unwrap();

        let camera = CommandCamera::new("cp", vec![source.display().to_string()]);
        let destination = dir.path().join("out").join("p.jpg");
        assert!(camera.request_capture(destination.clone()).await);
        assert_eq!(std::fs::read(destination).unwrap(), b"pixels");
    }
}
