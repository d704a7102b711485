//! Command execution behind a trait, so host commands can be swapped for a
//! recording mock in tests.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("`{command}` exited with status {status_code}: {stderr}")]
    Failed {
        command: String,
        status_code: i32,
        stderr: String,
    },
    #[error("command not found: {command}")]
    NotFound { command: String },
    #[error("IO error running {command}: {message}")]
    Io { command: String, message: String },
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

/// Runs commands on the host
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCommandExecutor;

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::NotFound {
                        command: program.to_string(),
                    }
                } else {
                    CommandError::Io {
                        command: program.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
