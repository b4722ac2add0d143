//! Server configuration.
//!
//! Defaults come from the binary; a `cdecl-indexer.toml` at the project
//! root overrides individual fields. A malformed file is reported and
//! ignored rather than refusing to start.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "cdecl-indexer.toml";

/// Effective settings for one server run.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port the server listens on.
    pub port: u16,
    /// Root of the source tree to index.
    pub root: PathBuf,
    /// Command line that runs a build, split on whitespace.
    pub build_command: String,
    /// File the build command writes its output to, relative to `root`.
    pub log_file: String,
    /// File-name suffixes that are indexed during a tree scan.
    pub extensions: Vec<String>,
}

/// Optional overrides read from the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    port: Option<u16>,
    build_command: Option<String>,
    log_file: Option<String>,
    extensions: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let build_command = if cfg!(windows) {
            "build.bat".to_owned()
        } else {
            "./build.sh".to_owned()
        };
        Self {
            port: 12345,
            root: PathBuf::from("."),
            build_command,
            log_file: "compilation.log".to_owned(),
            extensions: vec![".h".to_owned(), ".cpp".to_owned()],
        }
    }
}

impl ServerConfig {
    /// Overlay `cdecl-indexer.toml` from `root` (if present) onto `self`.
    pub fn load_overrides(&mut self, root: &Path) {
        let path = root.join(CONFIG_FILE_NAME);
        let Ok(contents) = std::fs::read_to_string(&path) else {
            debug!(path = %path.display(), "no config file, using defaults");
            return;
        };
        let patch: ConfigPatch = match toml::from_str(&contents) {
            Ok(patch) => patch,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring malformed config file");
                return;
            }
        };
        if let Some(port) = patch.port {
            self.port = port;
        }
        if let Some(build_command) = patch.build_command {
            self.build_command = build_command;
        }
        if let Some(log_file) = patch.log_file {
            self.log_file = log_file;
        }
        if let Some(extensions) = patch.extensions {
            self.extensions = extensions;
        }
        self.normalize();
    }

    /// Extensions always match as suffixes with their leading dot.
    pub fn normalize(&mut self) {
        for ext in &mut self.extensions {
            if !ext.starts_with('.') {
                ext.insert(0, '.');
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/src/config_tests.rs"]
mod tests;
