//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transport::{FrameSettings, DEFAULT_PROMPT};

/// Where the shell's stderr goes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// stderr shares the stdout pipe, so errors appear in responses.
    #[default]
    Merged,
    /// stderr is inherited from the supervisor.
    Separate,
}

/// Configuration for launching and talking to the gnokii shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShellConfig {
    /// Binary name (looked up on `PATH`) or path.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Arguments that put the binary in interactive shell mode.
    #[serde(default = "default_shell_args")]
    pub shell_args: Vec<String>,
    /// gnokii configuration file, passed as `--config`.
    #[serde(default)]
    pub gnokii_config: Option<PathBuf>,
    /// Phone section to use, passed as `--phone` (`foo` reads `[phone_foo]`).
    #[serde(default)]
    pub phone: Option<String>,
    /// Prompt marker that ends every response.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Longest silence tolerated while awaiting a response.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Wait between polls when no output is available.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long `stop` waits for the process to exit before killing it.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
    #[serde(default)]
    pub output: OutputMode,
    /// Consume the greeting up to the first prompt after launch.
    #[serde(default = "default_drain_greeting")]
    pub drain_greeting: bool,
}

fn default_binary() -> String {
    "gnokii".to_string()
}

fn default_shell_args() -> Vec<String> {
    vec!["--shell".to_string()]
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_read_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_stop_timeout_ms() -> u64 {
    3000
}

fn default_drain_greeting() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            shell_args: default_shell_args(),
            gnokii_config: None,
            phone: None,
            prompt: default_prompt(),
            read_timeout_ms: default_read_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            stop_timeout_ms: default_stop_timeout_ms(),
            output: OutputMode::default(),
            drain_greeting: default_drain_greeting(),
        }
    }
}

impl ShellConfig {
    /// Full argument list for the launch: phone selection, then shell mode.
    #[must_use]
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(path) = &self.gnokii_config {
            args.push("--config".to_string());
            args.push(path.display().to_string());
        }

        if let Some(phone) = &self.phone {
            args.push("--phone".to_string());
            args.push(phone.clone());
        }

        args.extend(self.shell_args.iter().cloned());
        args
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    /// Framing parameters for the transport.
    #[must_use]
    pub fn frame_settings(&self) -> FrameSettings {
        FrameSettings {
            prompt: self.prompt.clone(),
            read_timeout: self.read_timeout(),
            poll_interval: self.poll_interval(),
        }
    }
}
