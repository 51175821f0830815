//! Daily settlement engine
//!
//! Converts one period's platform net income into A-Coin rewards. The whole
//! operation is serialized per engine and backstopped by insert-if-absent
//! records, so a period can never settle twice. Interrupted batches resume:
//! snapshots, bookkeeping entries, and per-user payouts are all guarded by
//! deterministic keys.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use lib_events::{EconomyEvent, EventPublisher};
use lib_ledger::{Ledger, Transaction, TxCategory, TxFilter};
use lib_params::ParameterSource;
use lib_scoring::{score_users, ContributionSnapshot, SnapshotStore, UserMetrics};
use lib_types::{format_amount, Currency, PeriodId, TxId};
use lib_wallet::{RetryPolicy, WalletSink};

use crate::allocation::{allocate_shares, distribution_pool};
use crate::errors::{SettlementError, SettlementResult};
use crate::record::{
    CreditStatus, DistributionRecord, RecipientResult, SettlementOutcome, SettlementStatus,
};
use crate::store::SettlementStore;

pub struct SettlementEngine {
    ledger: Arc<Ledger>,
    snapshots: Arc<dyn SnapshotStore>,
    store: Arc<dyn SettlementStore>,
    wallet: Arc<dyn WalletSink>,
    params: Arc<dyn ParameterSource>,
    events: EventPublisher,
    /// One settlement at a time per engine; the store's insert-if-absent
    /// records backstop concurrent processes
    settle_lock: Mutex<()>,
}

impl SettlementEngine {
    pub fn new(
        ledger: Arc<Ledger>,
        snapshots: Arc<dyn SnapshotStore>,
        store: Arc<dyn SettlementStore>,
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
            settle_lock: Mutex::new(()),
        }
    }

    /// Settle one period: score the given users, fund the pool from net
    /// income, and credit each recipient's wallet.
    ///
    /// At most one settlement per period. A period that was already settled
    /// returns `AlreadySettled` with the existing record. Individual credit
    /// failures never abort the batch.
    pub async fn settle(
        &self,
        period: PeriodId,
        net_income: i128,
        metrics: &[UserMetrics],
    ) -> SettlementResult<SettlementOutcome> {
        let _guard = self.settle_lock.lock().await;

        // ===== Check 1: the period must not be settled yet =====
        if let Some(existing) = self.store.get_record(period)? {
            return Err(SettlementError::AlreadySettled(Box::new(existing)));
        }

        let params = self.params.snapshot()?;
        let now = now_secs();

        // ===== Check 2: income must be positive =====
        if net_income <= 0 {
            let record = DistributionRecord {
                period,
                income_base: net_income,
                pool: 0,
                recipients: Vec::new(),
                status: SettlementStatus::InsufficientIncome,
                reason: Some("net income is not positive".to_string()),
                settled_at: now,
            };
            self.commit_record(&record)?;
            tracing::info!("Settlement {}: insufficient income ({})", period, net_income);
            return Ok(SettlementOutcome::from_record(
                record,
                "insufficient income, nothing distributed",
            ));
        }

        // ===== Score and allocate =====
        let scored = score_users(metrics, &params);
        let pool = distribution_pool(net_income, params.distribution_ratio_bps)?;
        let allocations = allocate_shares(pool, &scored, params.min_payout)?;

        // ===== Persist this period's contribution snapshots =====
        // Insert-if-absent: a rerun after an interruption keeps the originals
        for (entry, s) in metrics.iter().zip(&scored) {
            let snapshot = ContributionSnapshot::new(
                entry.user,
                period,
                entry.activity,
                s.score,
                entry.performance,
                now,
            );
            self.snapshots.put(&snapshot)?;
        }

        // ===== Bookkeeping: mint and transfer as one correlated pair =====
        // A-Coin is minted and immediately handed to users, so the pool's
        // A-Coin balance nets to zero. Deterministic ids keep a resumed run
        // from double-booking.
        let total: u128 = allocations.iter().map(|a| a.amount).sum();
        let correlation = TxId::derived("settlement", &period.to_key_bytes());
        if total > 0 {
            let existing = self
                .ledger
                .query(&TxFilter::new().with_correlation(correlation).with_limit(1))?;
            if existing.is_empty() {
                self.ledger.append(
                    Transaction::credit(TxCategory::Reward, Currency::CoinA, total, now)
                        .with_id(TxId::derived("settlement-mint", &period.to_key_bytes()))
                        .with_correlation(correlation),
                )?;
                self.ledger.append(
                    Transaction::debit(TxCategory::Reward, Currency::CoinA, total, now)
                        .with_id(TxId::derived("settlement-transfer", &period.to_key_bytes()))
                        .with_correlation(correlation),
                )?;
            }
        }

        // ===== Credit recipients with per-user failure isolation =====
        let retry = RetryPolicy::with_attempts(params.wallet_retry_attempts);
        let memo = format!("Contribution reward for {}", period);
        let mut recipients = Vec::with_capacity(allocations.len());
        for allocation in &allocations {
            // Skip payouts applied by an interrupted earlier run
            if self.store.payout(period, allocation.user)?.is_some() {
                recipients.push(RecipientResult {
                    user: allocation.user,
                    score: allocation.score,
                    share_ppm: allocation.share_ppm,
                    amount: allocation.amount,
                    status: CreditStatus::Credited,
                    reason: None,
                });
                continue;
            }

            let outcome = retry
                .run("settlement credit", || {
                    self.wallet
                        .credit(allocation.user, Currency::CoinA, allocation.amount, &memo)
                })
                .await;
            match outcome {
                Ok(()) => {
                    self.store.mark_payout(period, allocation.user, allocation.amount)?;
                    recipients.push(RecipientResult {
                        user: allocation.user,
                        score: allocation.score,
                        share_ppm: allocation.share_ppm,
                        amount: allocation.amount,
                        status: CreditStatus::Credited,
                        reason: None,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        "Settlement {}: credit of {} to {:?} failed: {}",
                        period,
                        format_amount(allocation.amount),
                        allocation.user,
                        err
                    );
                    recipients.push(RecipientResult {
                        user: allocation.user,
                        score: allocation.score,
                        share_ppm: allocation.share_ppm,
                        amount: allocation.amount,
                        status: CreditStatus::Failed,
                        reason: Some(err.to_string()),
                    });
                }
            }
        }

        // ===== Record the period and notify =====
        let credited: u32 = recipients
            .iter()
            .filter(|r| r.status == CreditStatus::Credited)
            .count() as u32;
        let failures = recipients.len() as u32 - credited;
        let status = if !recipients.is_empty() && credited == 0 {
            SettlementStatus::Failed
        } else {
            SettlementStatus::Completed
        };
        let record = DistributionRecord {
            period,
            income_base: net_income,
            pool,
            recipients,
            status,
            reason: match status {
                SettlementStatus::Failed => Some("every wallet credit failed".to_string()),
                _ => None,
            },
            settled_at: now,
        };
        self.commit_record(&record)?;

        let distributed = record.distributed();
        if status == SettlementStatus::Completed {
            self.events
                .publish(EconomyEvent::SettlementCompleted {
                    period,
                    total_distributed: distributed,
                    recipients: credited,
                })
                .await;
        }
        tracing::info!(
            "Settlement {}: {} distributed to {} of {} recipients",
            period,
            format_amount(distributed),
            credited,
            record.recipients.len()
        );

        let message = match status {
            SettlementStatus::Completed if record.recipients.is_empty() => {
                "no eligible recipients".to_string()
            }
            SettlementStatus::Completed if failures > 0 => format!(
                "distributed {} to {} recipients ({} failed)",
                format_amount(distributed),
                credited,
                failures
            ),
            SettlementStatus::Completed => format!(
                "distributed {} to {} recipients",
                format_amount(distributed),
                credited
            ),
            SettlementStatus::Failed => "every wallet credit failed".to_string(),
            SettlementStatus::InsufficientIncome => unreachable!("handled above"),
        };
        Ok(SettlementOutcome::from_record(record, message))
    }

    /// The period's record, if it was ever settled
    pub fn record_for(&self, period: PeriodId) -> SettlementResult<Option<DistributionRecord>> {
        self.store.get_record(period)
    }

    fn commit_record(&self, record: &DistributionRecord) -> SettlementResult<()> {
        if self.store.insert_record(record)? {
            return Ok(());
        }
        // Another process persisted a record between our check and commit
        let existing = self
            .store
            .get_record(record.period)?
            .ok_or_else(|| SettlementError::Storage("record vanished during insert".to_string()))?;
        Err(SettlementError::AlreadySettled(Box::new(existing)))
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
