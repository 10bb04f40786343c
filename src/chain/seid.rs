//! Process-backed chain client driving the `seid` CLI
//!
//! Commands are passed as an argv vector, never through a shell, so account
//! names and contract addresses cannot inject extra commands. The keychain
//! password is written to the child's stdin followed by a newline.

use super::{ChainClient, CommandOutput};
use crate::account::FundTransfer;
use crate::error::BotError;
use crate::order::OrderRequest;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default `seid` location, `$HOME/go/bin/seid`
pub fn default_binary_path() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    home.join("go").join("bin").join("seid")
}

/// Chain client backed by the `seid` binary
pub struct SeidClient {
    binary: PathBuf,
    password: String,
}

impl std::fmt::Debug for SeidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeidClient")
            .field("binary", &self.binary)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SeidClient {
    /// Create a client, failing if the binary does not exist
    pub fn new(binary: impl Into<PathBuf>, password: impl Into<String>) -> Result<Self, BotError> {
        let binary = binary.into();
        if !binary.is_file() {
            return Err(BotError::ChainClientUnavailable(format!(
                "binary not found at {}",
                binary.display()
            )));
        }

        Ok(Self {
            binary,
            password: password.into(),
        })
    }

    /// Path of the wrapped binary
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run the binary with the given arguments and capture its output.
    ///
    /// The child is killed if the returned future is dropped, which is how
    /// callers enforce deadlines.
    pub async fn run(&self, args: &[String]) -> Result<CommandOutput, BotError> {
        tracing::debug!(binary = %self.binary.display(), ?args, "Invoking chain client");

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                BotError::ChainClientUnavailable(format!(
                    "failed to spawn {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let line = format!("{}\n", self.password);
            if let Err(e) = stdin.write_all(line.as_bytes()).await {
                // Commands that never prompt may exit before reading stdin
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[async_trait]
impl ChainClient for SeidClient {
    async fn execute_oracle_query(&self) -> Result<CommandOutput, BotError> {
        let args = ["query", "oracle", "exchange-rates"].map(String::from);
        self.run(&args).await
    }

    async fn execute_order_submission(
        &self,
        order: &OrderRequest,
    ) -> Result<CommandOutput, BotError> {
        self.run(&order.to_args()?).await
    }

    async fn execute_fund_transfer(
        &self,
        transfer: &FundTransfer,
    ) -> Result<CommandOutput, BotError> {
        self.run(&transfer.to_args()).await
    }
}
