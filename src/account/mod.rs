//! Account module
//!
//! Account identifiers, rotation across configured keys, and optional
//! funding of each key before it trades

mod funding;
mod rotator;

pub use funding::{FundTransfer, Funder, FundingConfig};
pub use rotator::{parse_accounts, AccountRotator, RotationMode};

use crate::error::BotError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A keychain key name used as the `--from` of transactions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account(String);

impl Account {
    /// Validate and wrap a key name.
    ///
    /// Names reach the chain client as separate argv entries, so the only
    /// hazards left are flag lookalikes and whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, BotError> {
        let name = name.into();
        if name.is_empty()
            || name.starts_with('-')
            || name.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(BotError::InvalidAccount(name));
        }
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Account {
    type Error = BotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Account::new(value)
    }
}

impl From<Account> for String {
    fn from(account: Account) -> Self {
        account.0
    }
}

impl std::str::FromStr for Account {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Account::new(s)
    }
}
