//! Extraction of exchange rates from `query oracle exchange-rates` output
//!
//! The CLI prints one block per denomination:
//!
//! ```text
//! - denom: uatom
//!   oracle_exchange_rate:
//!     exchange_rate: "10.250000000000000000"
//! ```
//!
//! The rate is taken from the denom line or one of the two lines after it.

use crate::error::BotError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Lines searched after the one naming the denom
const LOOKAHEAD_LINES: usize = 2;

const RATE_FIELD: &str = "exchange_rate:";

/// Parse the exchange rate for `denom` out of oracle query output
pub fn parse_exchange_rate(output: &str, denom: &str) -> Result<Decimal, BotError> {
    let malformed = |reason: String| BotError::OraclePriceMalformed {
        denom: denom.to_string(),
        reason,
    };

    let lines: Vec<&str> = output.lines().collect();
    let start = lines
        .iter()
        .position(|line| names_denom(line, denom))
        .ok_or_else(|| malformed("denom not found in oracle output".to_string()))?;

    let raw = lines[start..]
        .iter()
        .take(LOOKAHEAD_LINES + 1)
        .find_map(|line| rate_value(line))
        .ok_or_else(|| malformed("no exchange_rate field near denom".to_string()))?;

    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| malformed(format!("{:?} is not a number", raw)))?
        .normalize();

    if price <= Decimal::ZERO {
        return Err(malformed(format!("non-positive rate {}", price)));
    }

    Ok(price)
}

/// Line mentions `denom` as a whole token
fn names_denom(line: &str, denom: &str) -> bool {
    line.split(|c: char| c.is_whitespace() || matches!(c, ':' | '"' | ',' | '{' | '}'))
        .any(|token| token == denom)
}

/// Quoted or bare value following `exchange_rate:`
fn rate_value(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(RATE_FIELD)?;
    let value = rest.trim().trim_matches('"').trim();
    (!value.is_empty()).then_some(value)
}
