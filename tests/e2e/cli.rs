//! CLI test runner with fluent assertions.
//!
//! Runs the `lrig` binary against an isolated base directory and checks
//! exit status, stdout/stderr text and robot-mode JSON.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;

/// Variables inherited from the developer's shell that change CLI behavior.
const SCRUBBED_ENV: [&str; 4] = ["LRIG_HOME", "LRIG_FORMAT", "NO_COLOR", "RUST_LOG"];

/// Main test runner for the `lrig` CLI binary.
///
/// # Example
///
/// ```ignore
/// let home = TestHome::new();
/// let cli = CliRunner::new().with_home(home.path());
/// cli.run(&["assets", "--robot"])
///    .assert_success()
///    .assert_json_field_exists("/assets");
/// ```
pub struct CliRunner {
    binary_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRunner {
    /// Create a new CLI runner pointing to the compiled `lrig` binary.
    ///
    /// Logging is off unless a test sets `RUST_LOG` itself, so stderr only
    /// carries command output.
    #[must_use]
    pub fn new() -> Self {
        // Use CARGO_BIN_EXE_lrig which is set by cargo test for binary crates
        let binary = env!("CARGO_BIN_EXE_lrig");
        Self {
            binary_path: PathBuf::from(binary),
            env_vars: HashMap::new(),
        }
        .with_env("RUST_LOG", "off")
    }

    /// Point the CLI at an isolated base directory.
    #[must_use]
    pub fn with_home(self, home: &Path) -> Self {
        let home = home.to_str().expect("home path is not UTF-8");
        self.with_env("LRIG_HOME", home)
    }

    /// Add an environment variable for command execution.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Execute the command with the given arguments.
    ///
    /// # Panics
    ///
    /// Panics if the command fails to execute.
    #[must_use]
    pub fn run(&self, args: &[&str]) -> CliResult {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.envs(&self.env_vars);

        let output = cmd.output().expect("Failed to execute command");

        CliResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Execute with `--robot` flag for JSON output.
    #[must_use]
    pub fn run_robot(&self, args: &[&str]) -> CliResult {
        let mut full_args = vec!["--robot"];
        full_args.extend(args);
        self.run(&full_args)
    }
}

/// Captured output from CLI execution with fluent assertions.
#[derive(Debug, Clone)]
pub struct CliResult {
    /// Standard output captured from the command.
    pub stdout: String,
    /// Standard error captured from the command.
    pub stderr: String,
    /// Exit code from the command.
    pub exit_code: i32,
    /// Arguments passed to the command.
    pub args: Vec<String>,
}

impl CliResult {
    /// Check if the command succeeded (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    // === Fluent Assertions (all return &Self for chaining) ===

    /// Assert the command succeeded.
    ///
    /// # Panics
    ///
    /// Panics if the command did not exit with code 0.
    #[must_use]
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "Command {:?} failed with exit code {}: {}",
            self.args,
            self.exit_code,
            self.stderr
        );
        self
    }

    /// Assert the command failed.
    ///
    /// # Panics
    ///
    /// Panics if the command exited with code 0.
    #[must_use]
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success(),
            "Command {:?} unexpectedly succeeded",
            self.args
        );
        self
    }

    // === Stdout Assertions ===

    /// Assert stdout matches a regex pattern.
    ///
    /// # Panics
    ///
    /// Panics if stdout doesn't match the pattern.
    #[must_use]
    pub fn assert_stdout_matches(&self, pattern: &str) -> &Self {
        let re = regex::Regex::new(pattern).expect("Invalid regex pattern");
        assert!(
            re.is_match(&self.stdout),
            "stdout does not match pattern \"{pattern}\"\nActual stdout:\n{}",
            self.stdout
        );
        self
    }

    /// Assert stdout is empty.
    ///
    /// # Panics
    ///
    /// Panics if stdout is not empty.
    #[must_use]
    pub fn assert_stdout_is_empty(&self) -> &Self {
        assert!(
            self.stdout.is_empty(),
            "Expected empty stdout, got: {}",
            self.stdout
        );
        self
    }

    // === Stderr Assertions ===

    /// Assert stderr contains the given text.
    ///
    /// # Panics
    ///
    /// Panics if stderr doesn't contain the text.
    #[must_use]
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "stderr does not contain \"{text}\"\nActual stderr:\n{}",
            self.stderr
        );
        self
    }

    // === JSON Assertions (for robot mode) ===

    /// Parse stdout as JSON.
    ///
    /// # Panics
    ///
    /// Panics if stdout is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|_| panic!("Failed to parse JSON from stdout:\n{}", self.stdout))
    }

    /// Assert a JSON field matches an expected value using JSON pointer syntax.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist or doesn't match.
    #[must_use]
    pub fn assert_json_field(&self, json_pointer: &str, expected: &Value) -> &Self {
        let json = self.json();
        let actual = json.pointer(json_pointer).unwrap_or_else(|| {
            panic!(
                "JSON path {json_pointer} not found in:\n{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            )
        });
        assert_eq!(actual, expected, "JSON field {json_pointer} mismatch");
        self
    }

    /// Assert a JSON field exists at the given pointer path.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist.
    #[must_use]
    pub fn assert_json_field_exists(&self, json_pointer: &str) -> &Self {
        let json = self.json();
        assert!(
            json.pointer(json_pointer).is_some(),
            "JSON path {json_pointer} not found"
        );
        self
    }

    /// Assert a JSON array has the expected length.
    ///
    /// # Panics
    ///
    /// Panics if the field is not an array or has wrong length.
    #[must_use]
    pub fn assert_json_array_len(&self, json_pointer: &str, expected_len: usize) -> &Self {
        let json = self.json();
        let arr = json
            .pointer(json_pointer)
            .unwrap_or_else(|| panic!("JSON path {json_pointer} not found"))
            .as_array()
            .unwrap_or_else(|| panic!("JSON path {json_pointer} is not an array"));
        assert_eq!(
            arr.len(),
            expected_len,
            "Array at {json_pointer} has {} elements, expected {expected_len}",
            arr.len()
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_runner_version() {
        let cli = CliRunner::new();
        cli.run(&["version"]).assert_success();
    }

    #[test]
    fn test_cli_runner_robot_mode() {
        let cli = CliRunner::new();
        let result = cli.run_robot(&[]);

        result
            .assert_success()
            .assert_json_field_exists("/tool")
            .assert_json_field("/tool", &Value::String("lrig".to_string()));
    }

    #[test]
    fn test_cli_runner_invalid_command() {
        let cli = CliRunner::new();
        cli.run(&["nonexistent-command"]).assert_failure();
    }
}
