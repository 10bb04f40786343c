//! Raw chain client output

use serde::Serialize;

/// Maximum characters kept when summarizing output for logs
const SUMMARY_LEN: usize = 200;

/// Captured result of one chain client invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    /// Process exit code (`None` when killed by a signal)
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Successful invocation with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed invocation with the given exit code and stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Process exited with status zero
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Top-level `code:` of a broadcast tx response.
    ///
    /// With `--broadcast-mode=block` the CLI exits zero even when the
    /// transaction fails during delivery; the failure only shows up here.
    pub fn tx_code(&self) -> Option<u32> {
        self.top_level_field("code")?.parse().ok()
    }

    /// Top-level `txhash:` of a broadcast tx response
    pub fn txhash(&self) -> Option<&str> {
        self.top_level_field("txhash").filter(|h| !h.is_empty())
    }

    /// Last meaningful line of output, truncated for logging
    pub fn summary(&self) -> String {
        let line = self
            .stdout
            .lines()
            .chain(self.stderr.lines())
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("<no output>");
        line.chars().take(SUMMARY_LEN).collect()
    }

    fn top_level_field(&self, name: &str) -> Option<&str> {
        self.stdout.lines().find_map(|line| {
            // Indented lines belong to nested objects (events, logs)
            let (key, value) = line.split_once(':')?;
            if key != name {
                return None;
            }
            Some(value.trim().trim_matches('"'))
        })
    }
}
