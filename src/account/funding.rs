//! Funding of trading keys from an admin key

use super::Account;
use crate::chain::{ChainClient, CommandOutput};
use crate::error::BotError;
use crate::order::BroadcastMode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Funding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingConfig {
    /// Send funds to each account before its first order
    #[serde(default)]
    pub enabled: bool,

    /// Key that pays for the transfers
    #[serde(default = "default_funder")]
    pub funder: String,

    /// Amount sent per account, in base units of `denom`
    #[serde(default = "default_funding_amount")]
    pub amount: u64,

    #[serde(default = "default_funding_denom")]
    pub denom: String,
}

fn default_funder() -> String {
    "admin".to_string()
}
fn default_funding_amount() -> u64 {
    1_000_000_000_000
}
fn default_funding_denom() -> String {
    "factory/sei1466nf3zuxpya8q9emxukd7vftaf6h4psr0a07srl5zw74zh84yjqpeheyc/uust2".to_string()
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            funder: default_funder(),
            amount: default_funding_amount(),
            denom: default_funding_denom(),
        }
    }
}

/// A bank send from the funder to a trading account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundTransfer {
    pub from: Account,
    pub to: Account,
    pub amount: u64,
    pub denom: String,
    pub chain_id: String,
}

impl FundTransfer {
    /// Argv for `tx bank send`; blocks until inclusion so trading sees the funds
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "tx".to_string(),
            "bank".to_string(),
            "send".to_string(),
            "-y".to_string(),
            self.from.to_string(),
            self.to.to_string(),
            format!("{}{}", self.amount, self.denom),
            format!("--chain-id={}", self.chain_id),
            format!("--broadcast-mode={}", BroadcastMode::Block.as_str()),
        ]
    }
}

/// Sends funding transfers through the chain client
pub struct Funder {
    client: Arc<dyn ChainClient>,
    funder: Account,
    amount: u64,
    denom: String,
    chain_id: String,
    deadline: Duration,
}

impl Funder {
    /// Create a funder; the funder key name is validated like any account
    pub fn new(
        client: Arc<dyn ChainClient>,
        config: &FundingConfig,
        chain_id: impl Into<String>,
        deadline: Duration,
    ) -> Result<Self, BotError> {
        if config.amount == 0 {
            return Err(BotError::InvalidConfig("funding amount is zero".to_string()));
        }
        if config.denom.is_empty() || config.denom.chars().any(char::is_whitespace) {
            return Err(BotError::InvalidConfig(format!(
                "funding denom {:?}",
                config.denom
            )));
        }

        Ok(Self {
            client,
            funder: Account::new(config.funder.clone())?,
            amount: config.amount,
            denom: config.denom.clone(),
            chain_id: chain_id.into(),
            deadline,
        })
    }

    /// Transfer for the given account
    pub fn transfer_for(&self, account: &Account) -> FundTransfer {
        FundTransfer {
            from: self.funder.clone(),
            to: account.clone(),
            amount: self.amount,
            denom: self.denom.clone(),
            chain_id: self.chain_id.clone(),
        }
    }

    /// Fund one account
    pub async fn fund(&self, account: &Account) -> Result<CommandOutput, BotError> {
        let transfer = self.transfer_for(account);

        let output = tokio::time::timeout(self.deadline, self.client.execute_fund_transfer(&transfer))
            .await
            .map_err(|_| BotError::SubmissionTimeout(self.deadline))??;

        if !output.is_success() || output.tx_code().is_some_and(|c| c != 0) {
            return Err(BotError::SubmissionRejected {
                code: output.code,
                output,
            });
        }

        tracing::info!(
            account = %account,
            funder = %self.funder,
            amount = %self.amount,
            denom = %self.denom,
            "Account funded"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingClient {
        reply: CommandOutput,
        transfers: Mutex<Vec<FundTransfer>>,
    }

    #[async_trait]
    impl ChainClient for RecordingClient {
        async fn execute_oracle_query(&self) -> Result<CommandOutput, BotError> {
            unreachable!()
        }

        async fn execute_order_submission(
            &self,
            _order: &OrderRequest,
        ) -> Result<CommandOutput, BotError> {
            unreachable!()
        }

        async fn execute_fund_transfer(
            &self,
            transfer: &FundTransfer,
        ) -> Result<CommandOutput, BotError> {
            self.transfers.lock().unwrap().push(transfer.clone());
            Ok(self.reply.clone())
        }
    }

    fn client(reply: CommandOutput) -> Arc<RecordingClient> {
        Arc::new(RecordingClient {
            reply,
            transfers: Mutex::new(vec![]),
        })
    }

    #[test]
    fn test_transfer_args() {
        let transfer = FundTransfer {
            from: Account::new("admin").unwrap(),
            to: Account::new("mm1").unwrap(),
            amount: 1_000,
            denom: "uusdc".to_string(),
            chain_id: "sei-chain".to_string(),
        };
        assert_eq!(
            transfer.to_args(),
            vec![
                "tx",
                "bank",
                "send",
                "-y",
                "admin",
                "mm1",
                "1000uusdc",
                "--chain-id=sei-chain",
                "--broadcast-mode=block",
            ]
        );
    }

    #[tokio::test]
    async fn test_fund_success() {
        let client = client(CommandOutput::success("code: 0\ntxhash: AA\n"));
        let funder = Funder::new(
            client.clone(),
            &FundingConfig::default(),
            "sei-chain",
            Duration::from_secs(5),
        )
        .unwrap();

        funder.fund(&Account::new("mm1").unwrap()).await.unwrap();

        let transfers = client.transfers.lock().unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].to.name(), "mm1");
        assert_eq!(transfers[0].from.name(), "admin");
        assert_eq!(transfers[0].amount, 1_000_000_000_000);
    }

    #[tokio::test]
    async fn test_fund_rejected() {
        let funder = Funder::new(
            client(CommandOutput::failure(1, "insufficient funds")),
            &FundingConfig::default(),
            "sei-chain",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = funder.fund(&Account::new("mm1").unwrap()).await.unwrap_err();
        assert!(matches!(err, BotError::SubmissionRejected { .. }));
    }

    #[test]
    fn test_funder_config_validation() {
        let config = FundingConfig {
            amount: 0,
            ..FundingConfig::default()
        };
        let result = Funder::new(
            client(CommandOutput::default()),
            &config,
            "sei-chain",
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(BotError::InvalidConfig(_))));
    }
}
