//! Order-string command implementation

use crate::account::Account;
use crate::config::Config;
use crate::order::Side;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct OrderStringArgs {
    /// LONG or SHORT
    pub side: Side,

    /// Limit price
    pub price: Decimal,

    /// Quantity
    pub quantity: Decimal,

    /// Account placed in --from (defaults to accounts.key)
    #[arg(long)]
    pub account: Option<String>,
}

impl OrderStringArgs {
    /// Print the order string and the full chain client arguments
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let name = self
            .account
            .clone()
            .or_else(|| config.accounts.key.clone())
            .unwrap_or_else(|| "dry-run".to_string());
        let account = Account::new(name)?;

        let order = config
            .order_template()
            .build(&account, self.side, self.price, self.quantity)?;

        println!("{}", order.order_string()?);
        println!("{:?}", order.to_args()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_execute_rejects_bad_price() {
        let args = OrderStringArgs {
            side: Side::Short,
            price: dec!(0),
            quantity: dec!(1),
            account: None,
        };
        assert!(args.execute(&Config::default()).is_err());
    }

    #[test]
    fn test_execute_ok() {
        let args = OrderStringArgs {
            side: Side::Long,
            price: dec!(9.5),
            quantity: dec!(3.0),
            account: Some("mm".to_string()),
        };
        assert!(args.execute(&Config::default()).is_ok());
    }
}
