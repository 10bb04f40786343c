//! Scheduler loop

use super::SidePlan;
use crate::account::{Account, AccountRotator, Funder};
use crate::chain::ChainClient;
use crate::config::Config;
use crate::error::BotError;
use crate::oracle::OracleClient;
use crate::order::{OrderSubmitter, OrderTemplate, Side, SubmissionResult};
use crate::pricing::{OrderPricer, PricedOrder};
use crate::telemetry::{record_funding, record_order};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::field::display;

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    Idle,
    SelectAccount,
    SelectSide,
    Price,
    Submit,
    Sleep,
    /// Account list drained, tick limit reached, or shutdown requested
    Done,
}

/// One order attempt within a tick
#[derive(Debug)]
pub struct OrderOutcome {
    pub side: Side,
    /// Reference price used, when the oracle answered
    pub reference: Option<Decimal>,
    /// Price and quantity, when pricing succeeded
    pub priced: Option<PricedOrder>,
    pub result: Result<SubmissionResult, BotError>,
}

impl OrderOutcome {
    fn failed(side: Side, reference: Option<Decimal>, error: BotError) -> Self {
        Self {
            side,
            reference,
            priced: None,
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// What happened during one tick
#[derive(Debug)]
pub struct TickReport {
    pub account: Account,
    /// Uniform draw behind the side plan
    pub draw: f64,
    pub plan: SidePlan,
    pub outcomes: Vec<OrderOutcome>,
}

/// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub submitted: u64,
    pub failed: u64,
    pub funded: u64,
}

/// Drives account rotation, pricing, and submission
pub struct Scheduler {
    rotator: AccountRotator,
    oracle: OracleClient,
    oracle_denom: String,
    pricer: OrderPricer,
    template: OrderTemplate,
    submitter: OrderSubmitter,
    funder: Option<Funder>,
    funded: HashSet<Account>,
    interval: Duration,
    max_ticks: Option<u64>,
    rng: StdRng,
    state: SchedulerState,
    summary: RunSummary,
}

impl Scheduler {
    /// Wire a scheduler from configuration
    pub fn from_config(
        client: Arc<dyn ChainClient>,
        rotator: AccountRotator,
        config: &Config,
    ) -> Result<Self, BotError> {
        let deadline = config.chain.command_timeout();
        let template = config.order_template();
        template.validate()?;

        let funder = if config.funding.enabled {
            Some(Funder::new(
                client.clone(),
                &config.funding,
                config.chain.chain_id.clone(),
                deadline,
            )?)
        } else {
            None
        };

        let rng = match config.scheduler.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            rotator,
            oracle: OracleClient::new(client.clone(), deadline),
            oracle_denom: config.market.oracle_denom.clone(),
            pricer: OrderPricer::new(&config.pricing)?,
            template,
            submitter: OrderSubmitter::new(client, deadline),
            funder,
            funded: HashSet::new(),
            interval: config.scheduler.interval(),
            max_ticks: config.scheduler.max_ticks,
            rng,
            state: SchedulerState::Idle,
            summary: RunSummary::default(),
        })
    }

    /// Override the sleep between ticks
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    fn transition(&mut self, next: SchedulerState) {
        tracing::trace!(from = ?self.state, to = ?next, "Scheduler transition");
        self.state = next;
    }

    /// Run ticks until the accounts drain, the tick limit is hit, or
    /// `shutdown` flips to true. Shutdown is only observed between ticks, so
    /// an in-flight broadcast is never cut short.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> RunSummary {
        tracing::info!(
            accounts = self.rotator.accounts().len(),
            mode = ?self.rotator.mode(),
            interval_secs = self.interval.as_secs_f64(),
            max_ticks = ?self.max_ticks,
            funding = self.funder.is_some(),
            "Scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                tracing::info!("Shutdown requested");
                break;
            }

            if self.tick().await.is_none() {
                break;
            }

            if self.max_ticks.is_some_and(|max| self.summary.ticks >= max) {
                tracing::info!(ticks = self.summary.ticks, "Tick limit reached");
                break;
            }
            if self.rotator.is_exhausted() {
                tracing::info!("Account list drained");
                break;
            }

            self.transition(SchedulerState::Sleep);
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                Ok(()) = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Shutdown requested");
                        break;
                    }
                }
            }
        }

        self.transition(SchedulerState::Done);
        tracing::info!(
            ticks = self.summary.ticks,
            submitted = self.summary.submitted,
            failed = self.summary.failed,
            funded = self.summary.funded,
            "Scheduler finished"
        );
        self.summary.clone()
    }

    /// Run one tick. Returns `None` once a drained account list is empty.
    pub async fn tick(&mut self) -> Option<TickReport> {
        self.transition(SchedulerState::SelectAccount);
        let Some(account) = self.rotator.next_account() else {
            self.transition(SchedulerState::Done);
            return None;
        };
        self.summary.ticks += 1;

        self.fund_once(&account).await;

        self.transition(SchedulerState::SelectSide);
        let draw: f64 = self.rng.gen();
        let plan = SidePlan::from_draw(draw);
        tracing::debug!(account = %account, draw, ?plan, "Sides selected");

        let mut outcomes = Vec::with_capacity(2);
        for side in plan.sides() {
            outcomes.push(self.place(&account, side).await);
        }

        Some(TickReport {
            account,
            draw,
            plan,
            outcomes,
        })
    }

    /// Fund an account the first time it is used, before it trades
    async fn fund_once(&mut self, account: &Account) {
        let Some(funder) = &self.funder else {
            return;
        };
        if self.funded.contains(account) {
            return;
        }

        match funder.fund(account).await {
            Ok(_) => {
                self.funded.insert(account.clone());
                self.summary.funded += 1;
                record_funding("success");
            }
            Err(e) => {
                // Trade anyway; funding is retried next time the account comes up
                tracing::warn!(account = %account, error = %e, "Funding failed");
                record_funding(e.kind());
            }
        }
    }

    /// Price and submit one order, logging the outcome
    async fn place(&mut self, account: &Account, side: Side) -> OrderOutcome {
        self.transition(SchedulerState::Price);

        let quote = match self.oracle.get_price(&self.oracle_denom).await {
            Ok(quote) => quote,
            Err(e) => return self.finish(account, OrderOutcome::failed(side, None, e)),
        };

        let priced = match self.pricer.price(side, &quote, &mut self.rng) {
            Ok(priced) => priced,
            Err(e) => {
                return self.finish(account, OrderOutcome::failed(side, Some(quote.price), e))
            }
        };

        self.transition(SchedulerState::Submit);
        let result = match self
            .template
            .build(account, side, priced.price, priced.quantity)
        {
            Ok(order) => self.submitter.submit(&order).await,
            Err(e) => Err(e),
        };

        let outcome = OrderOutcome {
            side,
            reference: Some(quote.price),
            priced: Some(priced),
            result,
        };
        self.finish(account, outcome)
    }

    fn finish(&mut self, account: &Account, outcome: OrderOutcome) -> OrderOutcome {
        self.log_outcome(account, &outcome);
        outcome
    }

    fn log_outcome(&mut self, account: &Account, outcome: &OrderOutcome) {
        // Absent fields are left out of the event
        let reference = outcome.reference.map(display);
        let price = outcome.priced.map(|p| display(p.price));
        let quantity = outcome.priced.map(|p| display(p.quantity));

        match &outcome.result {
            Ok(result) => {
                self.summary.submitted += 1;
                record_order(outcome.side, "success");
                tracing::info!(
                    account = %account,
                    side = %outcome.side,
                    reference,
                    price,
                    quantity,
                    order_id = %result.order_id,
                    txhash = result.txhash().unwrap_or("-"),
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Order submitted"
                );
            }
            Err(e) => {
                self.summary.failed += 1;
                record_order(outcome.side, e.kind());
                tracing::warn!(
                    account = %account,
                    side = %outcome.side,
                    reference,
                    price,
                    quantity,
                    error = %e,
                    "Order failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::RotationMode;
    use crate::chain::{ChainCall, CommandOutput, RecordingClient};
    use rust_decimal_macros::dec;

    fn config() -> Config {
        let mut config = Config::default();
        config.chain.contract = "sei1contract".to_string();
        config.scheduler.seed = Some(5);
        config
    }

    fn rotator(names: &[&str], mode: RotationMode) -> AccountRotator {
        let accounts = names.iter().map(|n| Account::new(*n).unwrap()).collect();
        AccountRotator::new(accounts, mode).unwrap()
    }

    fn scheduler(client: Arc<RecordingClient>, rotator: AccountRotator, config: &Config) -> Scheduler {
        Scheduler::from_config(client, rotator, config)
            .unwrap()
            .with_interval(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_tick_places_planned_sides() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(10)));
        let mut scheduler = scheduler(client.clone(), rotator(&["A"], RotationMode::Cycle), &config());

        let report = scheduler.tick().await.unwrap();
        assert_eq!(report.account.name(), "A");
        assert_eq!(report.plan, SidePlan::from_draw(report.draw));

        let sides: Vec<Side> = report.outcomes.iter().map(|o| o.side).collect();
        assert_eq!(sides, report.plan.sides().collect::<Vec<_>>());
        assert!(report.outcomes.iter().all(OrderOutcome::is_success));

        // One oracle query per order
        let queries = client
            .calls()
            .iter()
            .filter(|c| matches!(c, ChainCall::OracleQuery))
            .count();
        assert_eq!(queries, report.outcomes.len());
        assert_eq!(client.orders().len(), report.outcomes.len());
    }

    #[tokio::test]
    async fn test_orders_respect_reference() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(20)));
        let mut scheduler = scheduler(client.clone(), rotator(&["A", "B"], RotationMode::Cycle), &config());

        for _ in 0..50 {
            scheduler.tick().await.unwrap();
        }
        for order in client.orders() {
            match order.side {
                Side::Long => assert!(order.price <= dec!(20)),
                Side::Short => assert!(order.price >= dec!(20)),
            }
            assert!(order.quantity > dec!(0) && order.quantity <= dec!(10));
        }
    }

    #[tokio::test]
    async fn test_rejections_do_not_stop_loop() {
        let client = Arc::new(
            RecordingClient::with_oracle_price("uatom", dec!(10))
                .with_order_reply(CommandOutput::failure(1, "Error: out of gas")),
        );
        let mut config = config();
        config.scheduler.max_ticks = Some(6);
        let mut scheduler = scheduler(client.clone(), rotator(&["A", "B", "C"], RotationMode::Cycle), &config);

        let (_tx, rx) = watch::channel(false);
        let summary = scheduler.run(rx).await;

        assert_eq!(summary.ticks, 6);
        assert_eq!(summary.submitted, 0);
        assert_eq!(summary.failed as usize, client.orders().len());
        assert!(summary.failed > 0);
        assert_eq!(scheduler.state(), SchedulerState::Done);
    }

    #[tokio::test]
    async fn test_oracle_failure_logged_per_order() {
        let client = Arc::new(
            RecordingClient::with_oracle_price("uatom", dec!(10))
                .with_oracle_reply(CommandOutput::failure(1, "node down")),
        );
        let mut scheduler = scheduler(client.clone(), rotator(&["A"], RotationMode::Cycle), &config());

        let report = scheduler.tick().await.unwrap();
        for outcome in &report.outcomes {
            assert!(matches!(outcome.result, Err(BotError::OracleUnavailable(_))));
            assert!(outcome.priced.is_none());
        }
        assert!(client.orders().is_empty());
    }

    #[tokio::test]
    async fn test_drain_mode_terminates() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(10)));
        let mut scheduler = scheduler(client, rotator(&["A", "B", "C"], RotationMode::Drain), &config());

        let (_tx, rx) = watch::channel(false);
        let summary = scheduler.run(rx).await;

        assert_eq!(summary.ticks, 3);
        assert_eq!(scheduler.state(), SchedulerState::Done);
        assert!(scheduler.tick().await.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_before_first_tick() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(10)));
        let mut scheduler = scheduler(client.clone(), rotator(&["A"], RotationMode::Cycle), &config());

        let (_tx, rx) = watch::channel(true);
        let summary = scheduler.run(rx).await;

        assert_eq!(summary.ticks, 0);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_during_sleep() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(10)));
        let mut scheduler = Scheduler::from_config(client, rotator(&["A"], RotationMode::Cycle), &config())
            .unwrap()
            .with_interval(Duration::from_secs(3600));

        let (tx, rx) = watch::channel(false);
        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send(true).unwrap();
        });

        let summary = scheduler.run(rx).await;
        stopper.await.unwrap();
        assert_eq!(summary.ticks, 1);
    }

    #[tokio::test]
    async fn test_funding_precedes_first_order_only() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(10)));
        let mut config = config();
        config.funding.enabled = true;
        let mut scheduler = scheduler(client.clone(), rotator(&["A", "B"], RotationMode::Cycle), &config);

        for _ in 0..4 {
            scheduler.tick().await.unwrap();
        }

        let calls = client.calls();
        let transfers: Vec<&str> = calls
            .iter()
            .filter_map(|c| match c {
                ChainCall::FundTransfer(t) => Some(t.to.name()),
                _ => None,
            })
            .collect();
        assert_eq!(transfers, vec!["A", "B"]);
        assert!(matches!(calls[0], ChainCall::FundTransfer(_)));
        assert_eq!(scheduler.summary().funded, 2);
    }

    #[tokio::test]
    async fn test_failed_funding_retried_and_account_still_trades() {
        let client = Arc::new(
            RecordingClient::with_oracle_price("uatom", dec!(10))
                .with_fund_reply(CommandOutput::failure(1, "insufficient funds")),
        );
        let mut config = config();
        config.funding.enabled = true;
        let mut scheduler = scheduler(client.clone(), rotator(&["A"], RotationMode::Cycle), &config);

        scheduler.tick().await.unwrap();
        scheduler.tick().await.unwrap();

        let transfers = client
            .calls()
            .iter()
            .filter(|c| matches!(c, ChainCall::FundTransfer(_)))
            .count();
        assert_eq!(transfers, 2);
        assert_eq!(scheduler.summary().funded, 0);
    }

    #[test]
    fn test_invalid_template_rejected() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(10)));
        let config = Config::default();
        let result = Scheduler::from_config(client, rotator(&["A"], RotationMode::Cycle), &config);
        assert!(matches!(result, Err(BotError::InvalidConfig(_))));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_outcome_log_fields_are_plain_values() {
        let client = Arc::new(RecordingClient::with_oracle_price("uatom", dec!(10)));
        let mut scheduler = scheduler(client, rotator(&["A"], RotationMode::Cycle), &config());
        let account = Account::new("A").unwrap();

        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let priced = OrderOutcome {
                side: Side::Long,
                reference: Some(dec!(10)),
                priced: Some(PricedOrder {
                    price: dec!(7.5),
                    quantity: dec!(3.0),
                    offset: dec!(2.5),
                }),
                result: Err(BotError::SubmissionTimeout(Duration::from_secs(1))),
            };
            scheduler.log_outcome(&account, &priced);

            let unpriced = OrderOutcome::failed(
                Side::Short,
                None,
                BotError::OracleUnavailable("down".to_string()),
            );
            scheduler.log_outcome(&account, &unpriced);
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("reference=10 price=7.5 quantity=3.0"));
        assert!(!logs.contains("Some("));
        assert!(!lines[1].contains("price="));
        assert!(!lines[1].contains("None"));
    }
}
