//! Build-command invocation for the `Compile` request.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::extract::{LogMessage, parse_compile_log};

/// Runs the configured build command with stdout and stderr redirected
/// into the log file, then parses and deletes the log.
pub struct BuildRunner {
    command: String,
    working_dir: PathBuf,
    log_path: PathBuf,
}

pub struct BuildReport {
    /// Whether the build command was actually launched.
    pub started: bool,
    pub messages: BuildMessages,
}

pub enum BuildMessages {
    /// Diagnostics parsed out of the build log.
    Diagnostics(Vec<LogMessage>),
    /// A single explanation when the build could not run or its log
    /// could not be read.
    Plain(String),
}

impl BuildRunner {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            command: config.build_command.clone(),
            working_dir: config.root.clone(),
            log_path: config.root.join(&config.log_file),
        }
    }

    pub async fn run(&self) -> BuildReport {
        let mut parts = self.command.split_whitespace();
        let Some(program) = parts.next() else {
            return Self::not_started("build command is empty".to_owned());
        };

        let stdout_log = match std::fs::File::create(&self.log_path) {
            Ok(file) => file,
            Err(error) => {
                return Self::not_started(format!(
                    "could not create {}: {error}",
                    self.log_path.display()
                ));
            }
        };
        let stderr_log = match stdout_log.try_clone() {
            Ok(file) => file,
            Err(error) => {
                return Self::not_started(format!(
                    "could not redirect build output: {error}"
                ));
            }
        };

        info!(command = %self.command, "running build");
        let mut child = match Command::new(program)
            .args(parts)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_log))
            .stderr(Stdio::from(stderr_log))
            .spawn()
        {
            Ok(child) => child,
            Err(error) => {
                return Self::not_started(format!(
                    "could not start {:?}: {error}",
                    self.command
                ));
            }
        };

        match child.wait().await {
            Ok(status) => info!(%status, "build finished"),
            Err(error) => warn!(%error, "could not wait for the build"),
        }

        let log_text = match std::fs::read(&self.log_path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(error) => {
                return BuildReport {
                    started: true,
                    messages: BuildMessages::Plain(format!(
                        "could not read {}: {error}",
                        self.log_path.display()
                    )),
                };
            }
        };
        if let Err(error) = std::fs::remove_file(&self.log_path) {
            warn!(path = %self.log_path.display(), %error, "could not delete build log");
        }

        BuildReport {
            started: true,
            messages: BuildMessages::Diagnostics(parse_compile_log(&log_text, &self.command)),
        }
    }

    fn not_started(reason: String) -> BuildReport {
        warn!(reason = %reason, "build did not start");
        BuildReport {
            started: false,
            messages: BuildMessages::Plain(reason),
        }
    }
}
