//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Fluent wrapper around `assert_cmd::Command` for the `vnote` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct VnoteCommand {
    args: Vec<String>,
}

impl VnoteCommand {
    /// Creates a new command for the `vnote` binary.
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Sets the `--data-dir` option to specify the data directory.
    pub fn data_dir(mut self, path: &Path) -> Self {
        self.args.push("--data-dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("vnote").expect("Failed to find vnote binary");
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `new` command with a title.
    pub fn new_note(self, title: &str) -> Self {
        self.args(["new", title])
    }

    /// Configures for the `ls` command.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    /// Configures for the `show` command with an ID.
    pub fn show(self, id: &str) -> Self {
        self.args(["show", id])
    }

    /// Configures for the `append` command.
    pub fn append(self, id: &str, text: &str) -> Self {
        self.args(["append", id, text])
    }

    /// Configures for the `add-voice` command.
    pub fn add_voice(self, id: &str, path: &Path) -> Self {
        self.args(["add-voice", id, &path.to_string_lossy()])
    }

    /// Configures for the `rm-block` command.
    pub fn rm_block(self, id: &str, position: usize) -> Self {
        self.args(["rm-block", id, &position.to_string()])
    }

    /// Configures for the `rm` command.
    pub fn rm(self, id: &str) -> Self {
        self.args(["rm", id])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for VnoteCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        // Just verify the binary can be found and runs (with --help)
        VnoteCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_data_dir() {
        let temp = TempDir::new().unwrap();
        let cmd = VnoteCommand::new().data_dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--data-dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_output_success() {
        let output = VnoteCommand::new().args(["--help"]).output_success();
        assert!(output.contains("vnote") || output.contains("notes"));
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = VnoteCommand::new().ls().format_json();
        let args = cmd.get_args();
        assert!(args.contains(&"ls".to_string()));
        assert!(args.contains(&"--format".to_string()));
        assert!(args.contains(&"json".to_string()));
    }
}
