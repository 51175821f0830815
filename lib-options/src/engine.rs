//! Option grant and vesting engine
//!
//! Grants lock O-Coin in the pool; the vesting clock moves slices of it to
//! the user's spendable balance; exercising converts vested tokens into
//! cash at the spread between market and strike price. Grant mutations are
//! serialized per engine and every store write is a compare-and-swap, so a
//! slice can never be credited twice by racing processes going unnoticed.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use lib_events::{EconomyEvent, EventPublisher};
use lib_ledger::{Ledger, Transaction, TxCategory};
use lib_params::ParameterSource;
use lib_types::{format_amount, Amount, Currency, GrantId, PeriodId, UserId, AMOUNT_SCALE};
use lib_wallet::{RetryPolicy, WalletSink};

use crate::errors::{VestingError, VestingResult};
use crate::grant::OptionGrant;
use crate::store::GrantStore;
use crate::vesting::vested_target;

pub struct VestingEngine {
    ledger: Arc<Ledger>,
    store: Arc<dyn GrantStore>,
    wallet: Arc<dyn WalletSink>,
    params: Arc<dyn ParameterSource>,
    events: EventPublisher,
    /// Grant mutations run one at a time per engine; the store's
    /// compare-and-swap updates backstop concurrent processes
    grant_lock: Mutex<()>,
}

impl VestingEngine {
    pub fn new(
        ledger: Arc<Ledger>,
        store: Arc<dyn GrantStore>,
        wallet: Arc<dyn WalletSink>,
        params: Arc<dyn ParameterSource>,
        events: EventPublisher,
    ) -> Self {
        Self {
            ledger,
            store,
            wallet,
            params,
            events,
            grant_lock: Mutex::new(()),
        }
    }

    /// Create a grant and lock its tokens in the pool.
    ///
    /// Nothing reaches the user's spendable balance until the vesting clock
    /// moves it there.
    pub fn grant(
        &self,
        user: UserId,
        amount: Amount,
        vesting_days: u32,
        granted_at: PeriodId,
    ) -> VestingResult<OptionGrant> {
        // ===== Check 1: amount must be positive =====
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        // ===== Check 2: the schedule needs at least one day =====
        if vesting_days == 0 {
            return Err(VestingError::InvalidVestingPeriod(vesting_days));
        }

        let grant = OptionGrant::new(GrantId::random(), user, amount, vesting_days, granted_at);

        // Lock the tokens in the pool, then persist the grant
        self.ledger.append(
            Transaction::credit(TxCategory::Vesting, Currency::CoinO, amount, now_secs())
                .with_actor(user),
        )?;
        if !self.store.insert(&grant)? {
            return Err(VestingError::Storage(format!(
                "grant id collision: {}",
                grant.id
            )));
        }

        tracing::info!(
            "Granted {} O-Coin to {:?}, vesting over {} days from {}",
            format_amount(amount),
            user,
            vesting_days,
            granted_at
        );
        Ok(grant)
    }

    /// Advance one grant's vesting clock to `as_of` and deliver the newly
    /// unlocked slice to the user's spendable balance.
    ///
    /// Returns the delivered delta, zero when the clock has nothing new.
    /// `vested` never decreases and never exceeds the granted amount,
    /// whatever dates this is called with.
    pub async fn process_vesting(
        &self,
        grant_id: GrantId,
        as_of: PeriodId,
    ) -> VestingResult<Amount> {
        let _guard = self.grant_lock.lock().await;

        let grant = self
            .store
            .get(grant_id)?
            .ok_or(VestingError::GrantNotFound(grant_id))?;

        // ===== Compute the newly unlocked slice =====
        let days_elapsed = as_of.days_since(grant.granted_at).max(0) as u64;
        let target = vested_target(grant.granted, days_elapsed, grant.vesting_days);
        let delta = target.saturating_sub(grant.vested);
        if delta == 0 {
            return Ok(0);
        }

        let params = self.params.snapshot()?;
        let retry = RetryPolicy::with_attempts(params.wallet_retry_attempts);

        // ===== Move the slice from pool-locked to spendable =====
        let memo = format!("Vesting unlock for grant {}", grant_id);
        retry
            .run("vesting credit", || {
                self.wallet.credit(grant.user, Currency::CoinO, delta, &memo)
            })
            .await?;
        self.ledger.append(
            Transaction::debit(TxCategory::Vesting, Currency::CoinO, delta, now_secs())
                .with_actor(grant.user),
        )?;

        // ===== Record the advance =====
        let mut updated = grant;
        updated.vested = target;
        updated.fully_vested = target == updated.granted;
        if !self.store.update(&grant, &updated)? {
            tracing::error!(
                "Grant {} changed during vesting; a concurrent process may have credited the same slice",
                grant_id
            );
            return Err(VestingError::ConcurrentUpdate(grant_id));
        }

        self.events
            .publish(EconomyEvent::OptionsVested {
                user: grant.user,
                grant: grant_id,
                amount: delta,
            })
            .await;
        tracing::info!(
            "Vested {} O-Coin of grant {} for {:?} ({} of {})",
            format_amount(delta),
            grant_id,
            grant.user,
            format_amount(target),
            format_amount(grant.granted)
        );
        Ok(delta)
    }

    /// Convert vested tokens into cash at the spread between market and
    /// strike price, returning the profit paid out.
    ///
    /// The tokens leave the user's spendable balance and return to the
    /// pool; the profit is paid from the platform cash pool. Consumption is
    /// recorded against the user's grants oldest first.
    pub async fn exercise(
        &self,
        user: UserId,
        amount: Amount,
        market_price: Amount,
        strike_price: Amount,
    ) -> VestingResult<Amount> {
        let _guard = self.grant_lock.lock().await;

        // ===== Check 1: amount must be positive =====
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }

        // ===== Check 2: the spread must yield a payable profit =====
        if market_price <= strike_price {
            return Err(VestingError::NoProfit {
                market: market_price,
                strike: strike_price,
            });
        }
        let profit = (market_price - strike_price)
            .checked_mul(amount)
            .ok_or(VestingError::Overflow)?
            / AMOUNT_SCALE;
        if profit == 0 {
            return Err(VestingError::NoProfit {
                market: market_price,
                strike: strike_price,
            });
        }

        // ===== Check 3: enough vested, unexercised tokens =====
        let grants = self.store.list_for_user(user)?;
        let available: Amount = grants.iter().map(|g| g.vested_unexercised()).sum();
        if available < amount {
            return Err(VestingError::InsufficientVested {
                available,
                requested: amount,
            });
        }

        // ===== Check 4: the cash pool must cover the profit =====
        let have = self.ledger.balance(Currency::Cash);
        if have < profit {
            return Err(VestingError::InsufficientPoolCash { have, need: profit });
        }

        let params = self.params.snapshot()?;
        let retry = RetryPolicy::with_attempts(params.wallet_retry_attempts);

        // ===== Swap tokens for cash in the user's wallet =====
        let memo = format!("Exercise of {} O-Coin", format_amount(amount));
        retry
            .run("exercise debit", || {
                self.wallet.debit(user, Currency::CoinO, amount, &memo)
            })
            .await?;
        if let Err(err) = retry
            .run("exercise credit", || {
                self.wallet.credit(user, Currency::Cash, profit, &memo)
            })
            .await
        {
            // Hand the tokens back; the exercise never happened
            if let Err(refund) = retry
                .run("exercise refund", || {
                    self.wallet.credit(user, Currency::CoinO, amount, &memo)
                })
                .await
            {
                tracing::error!(
                    "Exercise refund of {} O-Coin to {:?} failed: {}",
                    format_amount(amount),
                    user,
                    refund
                );
            }
            return Err(err.into());
        }

        // ===== Book the conversion =====
        let now = now_secs();
        self.ledger.append(
            Transaction::credit(TxCategory::Exercise, Currency::CoinO, amount, now)
                .with_actor(user),
        )?;
        self.ledger.append(
            Transaction::debit(TxCategory::Exercise, Currency::Cash, profit, now).with_actor(user),
        )?;

        // ===== Consume vested balance oldest first =====
        let mut remaining = amount;
        for grant in &grants {
            if remaining == 0 {
                break;
            }
            let take = grant.vested_unexercised().min(remaining);
            if take == 0 {
                continue;
            }
            let mut updated = *grant;
            updated.exercised = grant.exercised + take;
            if !self.store.update(grant, &updated)? {
                return Err(VestingError::ConcurrentUpdate(grant.id));
            }
            remaining -= take;
        }

        tracing::info!(
            "Exercised {} O-Coin for {:?} at spread {}: profit {}",
            format_amount(amount),
            user,
            format_amount(market_price - strike_price),
            format_amount(profit)
        );
        Ok(profit)
    }

    /// The grant, if it exists
    pub fn get_grant(&self, id: GrantId) -> VestingResult<Option<OptionGrant>> {
        self.store.get(id)
    }

    /// Every grant for `user`, oldest first
    pub fn grants_for(&self, user: UserId) -> VestingResult<Vec<OptionGrant>> {
        self.store.list_for_user(user)
    }

    /// Vested, unexercised tokens across all of `user`'s grants
    pub fn exercisable(&self, user: UserId) -> VestingResult<Amount> {
        Ok(self
            .store
            .list_for_user(user)?
            .iter()
            .map(|g| g.vested_unexercised())
            .sum())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
