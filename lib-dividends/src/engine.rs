//! Dividend engine
//!
//! Two operations: `calculate_weights` folds snapshot history into capped
//! per-user pool weights, `distribute_cash_dividend` turns those weights
//! into wallet credits funded by the platform cash pool. The cash pool is
//! debited before any credit goes out, so an underfunded pool fails the
//! whole distribution with nothing mutated.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use lib_events::{EconomyEvent, EventPublisher};
use lib_ledger::{Ledger, Transaction, TxCategory, TxFilter};
use lib_params::ParameterSource;
use lib_scoring::SnapshotStore;
use lib_types::{format_amount, Amount, Currency, PeriodId, TxId, UserId, PPM_SCALE};
use lib_wallet::{RetryPolicy, WalletSink};

use crate::errors::{DividendError, DividendResult};
use crate::record::{CashDividendRecord, DividendOutcome, DividendStatus, DividendWeightRecord};
use crate::store::WeightStore;
use crate::weights::{historical_score, normalize_weights};

pub struct DividendEngine {
    ledger: Arc<Ledger>,
    snapshots: Arc<dyn SnapshotStore>,
    store: Arc<dyn WeightStore>,
    wallet: Arc<dyn WalletSink>,
    params: Arc<dyn ParameterSource>,
    events: EventPublisher,
    /// One distribution at a time per engine; payout marks backstop
    /// concurrent processes
    distribute_lock: Mutex<()>,
}

impl DividendEngine {
    pub fn new(
        ledger: Arc<Ledger>,
        snapshots: Arc<dyn SnapshotStore>,
        store: Arc<dyn WeightStore>,
        wallet: Arc<dyn WalletSink>,
        params: Arc<dyn ParameterSource>,
        events: EventPublisher,
    ) -> Self {
        Self {
            ledger,
            snapshots,
            store,
            wallet,
            params,
            events,
            distribute_lock: Mutex::new(()),
        }
    }

    /// Compute and persist capped dividend weights for every user active in
    /// the trailing window before `period`.
    ///
    /// Recalculating the same period replaces the prior records.
    pub fn calculate_weights(&self, period: PeriodId) -> DividendResult<Vec<DividendWeightRecord>> {
        let params = self.params.snapshot()?;
        let window = params.dividend_history_periods;
        let users = self.snapshots.users_in_window(period, window)?;

        let mut scores = Vec::with_capacity(users.len());
        for user in users {
            let history = self.snapshots.history(user, period, window as usize)?;
            let score = historical_score(&history, period, params.dividend_decay, window);
            scores.push((user, score));
        }

        let weights = normalize_weights(&scores, params.dividend_cap_bps);
        let now = now_secs();
        let mut records = Vec::with_capacity(weights.len());
        for ((user, weight_ppm), (_, score)) in weights.iter().zip(&scores) {
            let record = DividendWeightRecord {
                user: *user,
                period,
                historical_score: *score,
                weight_ppm: *weight_ppm,
                calculated_at: now,
            };
            self.store.put_weight(&record)?;
            records.push(record);
        }
        tracing::info!("Dividend weights for {}: {} users", period, records.len());
        Ok(records)
    }

    /// Split `pool` across the period's weight records and credit each
    /// recipient's cash balance.
    ///
    /// The planned total is debited from the platform cash pool up front;
    /// an underfunded pool fails before any wallet is touched. Individual
    /// credit failures never abort the batch, and already-applied payouts
    /// are skipped on a rerun.
    pub async fn distribute_cash_dividend(
        &self,
        period: PeriodId,
        pool: Amount,
    ) -> DividendResult<DividendOutcome> {
        let _guard = self.distribute_lock.lock().await;
        let params = self.params.snapshot()?;

        // Deduplicate records per user, most recent calculation wins
        let mut latest: BTreeMap<UserId, DividendWeightRecord> = BTreeMap::new();
        for record in self.store.weights_for(period)? {
            match latest.get(&record.user) {
                Some(existing) if existing.calculated_at >= record.calculated_at => {}
                _ => {
                    latest.insert(record.user, record);
                }
            }
        }

        // ===== Plan the payouts =====
        let mut planned: Vec<(DividendWeightRecord, Amount)> = Vec::new();
        for (_, record) in latest {
            if record.weight_ppm == 0 {
                continue;
            }
            let amount = pool
                .checked_mul(record.weight_ppm as u128)
                .ok_or(DividendError::Overflow)?
                / PPM_SCALE as u128;
            if amount < params.min_payout {
                continue;
            }
            planned.push((record, amount));
        }

        if planned.is_empty() {
            tracing::info!("Dividend {}: no eligible recipients", period);
            return Ok(DividendOutcome::from_records(
                period,
                pool,
                Vec::new(),
                "no eligible recipients",
            ));
        }

        // ===== Debit the cash pool before any wallet credit =====
        // Deterministic ids keep a resumed run from double-debiting
        let total: Amount = planned.iter().map(|(_, amount)| *amount).sum();
        let now = now_secs();
        let correlation = TxId::derived("dividend", &period.to_key_bytes());
        let existing = self
            .ledger
            .query(&TxFilter::new().with_correlation(correlation).with_limit(1))?;
        if existing.is_empty() {
            self.ledger.append(
                Transaction::debit(TxCategory::Dividend, Currency::Cash, total, now)
                    .with_id(TxId::derived("dividend-payout", &period.to_key_bytes()))
                    .with_correlation(correlation),
            )?;
        }

        // ===== Credit recipients with per-user failure isolation =====
        let retry = RetryPolicy::with_attempts(params.wallet_retry_attempts);
        let memo = format!("Cash dividend for {}", period);
        let mut records = Vec::with_capacity(planned.len());
        for (weight, amount) in &planned {
            // Skip payouts applied by an interrupted earlier run
            if self.store.payout(period, weight.user)?.is_some() {
                records.push(CashDividendRecord {
                    user: weight.user,
                    period,
                    weight_ppm: weight.weight_ppm,
                    amount: *amount,
                    status: DividendStatus::Paid,
                    reason: None,
                });
                continue;
            }

            let outcome = retry
                .run("dividend credit", || {
                    self.wallet.credit(weight.user, Currency::Cash, *amount, &memo)
                })
                .await;
            match outcome {
                Ok(()) => {
                    self.store.mark_payout(period, weight.user, *amount)?;
                    records.push(CashDividendRecord {
                        user: weight.user,
                        period,
                        weight_ppm: weight.weight_ppm,
                        amount: *amount,
                        status: DividendStatus::Paid,
                        reason: None,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        "Dividend {}: credit of {} to {:?} failed: {}",
                        period,
                        format_amount(*amount),
                        weight.user,
                        err
                    );
                    records.push(CashDividendRecord {
                        user: weight.user,
                        period,
                        weight_ppm: weight.weight_ppm,
                        amount: *amount,
                        status: DividendStatus::Failed,
                        reason: Some(err.to_string()),
                    });
                }
            }
        }

        // ===== Report and notify =====
        let paid = records
            .iter()
            .filter(|r| r.status == DividendStatus::Paid)
            .count() as u32;
        let distributed: Amount = records
            .iter()
            .filter(|r| r.status == DividendStatus::Paid)
            .map(|r| r.amount)
            .sum();
        let failures = records.len() as u32 - paid;

        if paid > 0 {
            self.events
                .publish(EconomyEvent::DividendDistributed {
                    period,
                    total_amount: distributed,
                    recipients: paid,
                })
                .await;
        }
        tracing::info!(
            "Dividend {}: {} distributed to {} of {} recipients",
            period,
            format_amount(distributed),
            paid,
            records.len()
        );

        let message = if paid == 0 {
            "every wallet credit failed".to_string()
        } else if failures > 0 {
            format!(
                "distributed {} to {} recipients ({} failed)",
                format_amount(distributed),
                paid,
                failures
            )
        } else {
            format!("distributed {} to {} recipients", format_amount(distributed), paid)
        };
        Ok(DividendOutcome::from_records(period, pool, records, message))
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
