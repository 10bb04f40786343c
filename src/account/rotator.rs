//! Account rotation

use super::Account;
use crate::error::BotError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the rotator behaves once every account has been used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// Start over from the first account, forever
    #[default]
    Cycle,
    /// Use each account exactly once, then stop
    Drain,
}

/// Cycles through the configured accounts, one per scheduler tick
#[derive(Debug, Clone)]
pub struct AccountRotator {
    accounts: Vec<Account>,
    position: usize,
    mode: RotationMode,
}

impl AccountRotator {
    /// Create a rotator; an empty list is a startup error
    pub fn new(accounts: Vec<Account>, mode: RotationMode) -> Result<Self, BotError> {
        if accounts.is_empty() {
            return Err(BotError::NoAccountsConfigured);
        }
        Ok(Self {
            accounts,
            position: 0,
            mode,
        })
    }

    /// Load accounts from a file with one key name per line
    pub fn from_file(path: impl AsRef<Path>, mode: RotationMode) -> Result<Self, BotError> {
        let content = std::fs::read_to_string(path)?;
        Self::new(parse_accounts(&content)?, mode)
    }

    /// Next account, or `None` once a drained list is exhausted
    pub fn next_account(&mut self) -> Option<Account> {
        if self.position >= self.accounts.len() {
            match self.mode {
                RotationMode::Cycle => self.position = 0,
                RotationMode::Drain => return None,
            }
        }
        let account = self.accounts[self.position].clone();
        self.position += 1;
        Some(account)
    }

    /// True when a drained list has no accounts left
    pub fn is_exhausted(&self) -> bool {
        self.mode == RotationMode::Drain && self.position >= self.accounts.len()
    }

    /// Restart from the first account
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}

impl Iterator for AccountRotator {
    type Item = Account;

    fn next(&mut self) -> Option<Account> {
        self.next_account()
    }
}

/// Parse an accounts list; blank lines and `#` comments are skipped
pub fn parse_accounts(content: &str) -> Result<Vec<Account>, BotError> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Account::new)
        .collect()
}
