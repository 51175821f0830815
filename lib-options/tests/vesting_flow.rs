//! End-to-end grant, vesting, and exercise behavior over in-memory backends

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use lib_events::{EconomyEvent, EventPublisher, TestEventListener};
use lib_ledger::{Ledger, Transaction, TxCategory};
use lib_options::{GrantStatus, MemoryGrantStore, VestingEngine, VestingError};
use lib_params::{EconomicParams, MemoryParams};
use lib_types::{Amount, Currency, GrantId, PeriodId, UserId};
use lib_wallet::{MemoryWallet, WalletError, WalletResult, WalletSink};

fn user(tag: u8) -> UserId {
    UserId::new([tag; 32])
}

fn day(year: i32, month: u32, d: u32) -> PeriodId {
    PeriodId::from_ymd(year, month, d).unwrap()
}

/// Platform revenue backing exercise payouts
fn fund_pool(ledger: &Ledger, amount: Amount) {
    ledger
        .append(Transaction::credit(
            TxCategory::Commission,
            Currency::Cash,
            amount,
            1,
        ))
        .unwrap();
}

/// Wallet double that refuses cash credits for a configured set of users
/// while still accepting their token movements
struct CashDenyWallet {
    inner: MemoryWallet,
    deny_cash: HashSet<UserId>,
}

#[async_trait]
impl WalletSink for CashDenyWallet {
    async fn credit(
        &self,
        user: UserId,
        currency: Currency,
        amount: Amount,
        memo: &str,
    ) -> WalletResult<()> {
        if currency == Currency::Cash && self.deny_cash.contains(&user) {
            return Err(WalletError::Unavailable("wallet endpoint offline".to_string()));
        }
        self.inner.credit(user, currency, amount, memo).await
    }

    async fn debit(
        &self,
        user: UserId,
        currency: Currency,
        amount: Amount,
        memo: &str,
    ) -> WalletResult<()> {
        self.inner.debit(user, currency, amount, memo).await
    }

    async fn balances(
        &self,
        user: UserId,
    ) -> WalletResult<std::collections::HashMap<Currency, Amount>> {
        self.inner.balances(user).await
    }
}

struct Harness {
    engine: VestingEngine,
    ledger: Arc<Ledger>,
    store: Arc<MemoryGrantStore>,
    listener: TestEventListener,
}

async fn harness(params: EconomicParams, wallet: Arc<dyn WalletSink>) -> Harness {
    let ledger = Arc::new(Ledger::in_memory());
    let store = Arc::new(MemoryGrantStore::new());
    let events = EventPublisher::new();
    let listener = TestEventListener::new();
    events.subscribe(Box::new(listener.clone())).await;

    let engine = VestingEngine::new(
        ledger.clone(),
        store.clone(),
        wallet,
        Arc::new(MemoryParams::new(params).unwrap()),
        events,
    );
    Harness {
        engine,
        ledger,
        store,
        listener,
    }
}

#[tokio::test]
async fn grant_locks_tokens_in_the_pool() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();

    assert_eq!(g.user, user(1));
    assert_eq!(g.granted, 365_000);
    assert_eq!(g.vested, 0);
    assert_eq!(g.status(), GrantStatus::Granted);
    assert_eq!(h.engine.get_grant(g.id).unwrap(), Some(g));

    // Locked in the pool, nothing spendable yet
    assert_eq!(h.ledger.balance(Currency::CoinO), 365_000);
    assert_eq!(h.ledger.len().unwrap(), 1);
    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 0);
}

#[tokio::test]
async fn grant_rejects_zero_amount_and_zero_schedule() {
    let h = harness(EconomicParams::default(), Arc::new(MemoryWallet::new())).await;

    assert!(matches!(
        h.engine.grant(user(1), 0, 365, day(2026, 1, 1)),
        Err(VestingError::ZeroAmount)
    ));
    assert!(matches!(
        h.engine.grant(user(1), 365_000, 0, day(2026, 1, 1)),
        Err(VestingError::InvalidVestingPeriod(0))
    ));
    assert_eq!(h.ledger.len().unwrap(), 0);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn vesting_unlocks_the_daily_rate() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    // 3650.00 over a year unlocks 10.00 a day
    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    let delta = h
        .engine
        .process_vesting(g.id, day(2026, 4, 11))
        .await
        .unwrap();

    assert_eq!(delta, 100_000);
    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 100_000);

    let stored = h.engine.get_grant(g.id).unwrap().unwrap();
    assert_eq!(stored.vested, 100_000);
    assert!(!stored.fully_vested);
    assert_eq!(stored.status(), GrantStatus::PartiallyVested);

    // The unlocked slice left the pool
    assert_eq!(h.ledger.balance(Currency::CoinO), 265_000);

    assert_eq!(
        h.listener.get_events().await,
        vec![EconomyEvent::OptionsVested {
            user: user(1),
            grant: g.id,
            amount: 100_000,
        }]
    );
}

#[tokio::test]
async fn repeat_and_backdated_processing_moves_nothing() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    h.engine
        .process_vesting(g.id, day(2026, 4, 11))
        .await
        .unwrap();

    // The same day again, then an out-of-order earlier day
    assert_eq!(
        h.engine
            .process_vesting(g.id, day(2026, 4, 11))
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        h.engine
            .process_vesting(g.id, day(2026, 2, 1))
            .await
            .unwrap(),
        0
    );
    // A date before the clock even started
    assert_eq!(
        h.engine
            .process_vesting(g.id, day(2025, 6, 1))
            .await
            .unwrap(),
        0
    );

    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 100_000);
    assert_eq!(h.engine.get_grant(g.id).unwrap().unwrap().vested, 100_000);
    assert_eq!(h.listener.get_events().await.len(), 1);
}

#[tokio::test]
async fn the_clock_completes_at_the_end_of_the_schedule() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    let delta = h
        .engine
        .process_vesting(g.id, day(2027, 1, 1))
        .await
        .unwrap();
    assert_eq!(delta, 365_000);

    let stored = h.engine.get_grant(g.id).unwrap().unwrap();
    assert_eq!(stored.vested, 365_000);
    assert!(stored.fully_vested);
    assert_eq!(stored.status(), GrantStatus::FullyVested);
    assert_eq!(h.ledger.balance(Currency::CoinO), 0);

    // Long past the end, nothing more unlocks
    assert_eq!(
        h.engine
            .process_vesting(g.id, day(2027, 3, 1))
            .await
            .unwrap(),
        0
    );
    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 365_000);
    assert_eq!(h.listener.get_events().await.len(), 1);
}

#[tokio::test]
async fn processing_an_unknown_grant_is_rejected() {
    let h = harness(EconomicParams::default(), Arc::new(MemoryWallet::new())).await;
    let missing = GrantId::random();

    let err = h
        .engine
        .process_vesting(missing, day(2026, 4, 11))
        .await
        .unwrap_err();
    assert!(matches!(err, VestingError::GrantNotFound(id) if id == missing));
}

#[tokio::test]
async fn exercise_converts_vested_tokens_to_cash() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    h.engine
        .process_vesting(g.id, day(2026, 4, 11))
        .await
        .unwrap();
    fund_pool(&h.ledger, 10_000);

    // 10.00 tokens at a 2.00 spread pay 20.00
    let profit = h.engine.exercise(user(1), 1_000, 500, 300).await.unwrap();
    assert_eq!(profit, 2_000);

    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 99_000);
    assert_eq!(wallet.balance(&user(1), Currency::Cash), 2_000);

    // Tokens returned to the pool, profit paid out of it
    assert_eq!(h.ledger.balance(Currency::CoinO), 266_000);
    assert_eq!(h.ledger.balance(Currency::Cash), 8_000);

    let stored = h.engine.get_grant(g.id).unwrap().unwrap();
    assert_eq!(stored.exercised, 1_000);
    assert_eq!(h.engine.exercisable(user(1)).unwrap(), 99_000);
}

#[tokio::test]
async fn exercise_rejects_more_than_the_vested_balance() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    h.engine
        .process_vesting(g.id, day(2026, 4, 11))
        .await
        .unwrap();
    fund_pool(&h.ledger, 1_000_000);

    let err = h
        .engine
        .exercise(user(1), 200_000, 500, 300)
        .await
        .unwrap_err();
    match err {
        VestingError::InsufficientVested {
            available,
            requested,
        } => {
            assert_eq!(available, 100_000);
            assert_eq!(requested, 200_000);
        }
        other => panic!("expected InsufficientVested, got {:?}", other),
    }
    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 100_000);
    assert_eq!(wallet.balance(&user(1), Currency::Cash), 0);
}

#[tokio::test]
async fn exercise_requires_a_profitable_spread() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    h.engine
        .process_vesting(g.id, day(2026, 4, 11))
        .await
        .unwrap();
    fund_pool(&h.ledger, 10_000);

    // Market at and below the strike are both worthless
    for market in [300, 200] {
        let err = h
            .engine
            .exercise(user(1), 1_000, market, 300)
            .await
            .unwrap_err();
        match err {
            VestingError::NoProfit { market: m, strike } => {
                assert_eq!(m, market);
                assert_eq!(strike, 300);
            }
            other => panic!("expected NoProfit, got {:?}", other),
        }
    }
    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 100_000);
}

#[tokio::test]
async fn exercise_consumes_the_oldest_grants_first() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let older = h
        .engine
        .grant(user(1), 50_000, 5, day(2026, 1, 1))
        .unwrap();
    let newer = h
        .engine
        .grant(user(1), 50_000, 5, day(2026, 2, 1))
        .unwrap();
    h.engine
        .process_vesting(older.id, day(2026, 3, 1))
        .await
        .unwrap();
    h.engine
        .process_vesting(newer.id, day(2026, 3, 1))
        .await
        .unwrap();
    fund_pool(&h.ledger, 100_000);

    let profit = h.engine.exercise(user(1), 60_000, 200, 100).await.unwrap();
    assert_eq!(profit, 60_000);

    let grants = h.engine.grants_for(user(1)).unwrap();
    assert_eq!(grants[0].id, older.id);
    assert_eq!(grants[0].exercised, 50_000);
    assert_eq!(grants[1].id, newer.id);
    assert_eq!(grants[1].exercised, 10_000);
    assert_eq!(h.engine.exercisable(user(1)).unwrap(), 40_000);
}

#[tokio::test]
async fn an_underfunded_cash_pool_blocks_the_exercise() {
    let wallet = Arc::new(MemoryWallet::new());
    let h = harness(EconomicParams::default(), wallet.clone()).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    h.engine
        .process_vesting(g.id, day(2026, 4, 11))
        .await
        .unwrap();

    let err = h.engine.exercise(user(1), 1_000, 500, 300).await.unwrap_err();
    match err {
        VestingError::InsufficientPoolCash { have, need } => {
            assert_eq!(have, 0);
            assert_eq!(need, 2_000);
        }
        other => panic!("expected InsufficientPoolCash, got {:?}", other),
    }
    // Nothing moved
    assert_eq!(wallet.balance(&user(1), Currency::CoinO), 100_000);
    assert_eq!(h.engine.get_grant(g.id).unwrap().unwrap().exercised, 0);
}

#[tokio::test]
async fn a_failed_cash_credit_refunds_the_tokens() {
    let inner = MemoryWallet::new();
    let wallet = Arc::new(CashDenyWallet {
        inner: inner.clone(),
        deny_cash: HashSet::from([user(1)]),
    });
    let params = EconomicParams {
        wallet_retry_attempts: 1,
        ..Default::default()
    };
    let h = harness(params, wallet).await;

    let g = h
        .engine
        .grant(user(1), 365_000, 365, day(2026, 1, 1))
        .unwrap();
    h.engine
        .process_vesting(g.id, day(2026, 4, 11))
        .await
        .unwrap();
    fund_pool(&h.ledger, 10_000);
    let booked = h.ledger.len().unwrap();

    let err = h.engine.exercise(user(1), 1_000, 500, 300).await.unwrap_err();
    assert!(matches!(err, VestingError::Wallet(_)));

    // The token debit was rolled back and nothing was booked or recorded
    assert_eq!(inner.balance(&user(1), Currency::CoinO), 100_000);
    assert_eq!(inner.balance(&user(1), Currency::Cash), 0);
    assert_eq!(h.ledger.len().unwrap(), booked);
    assert_eq!(h.engine.get_grant(g.id).unwrap().unwrap().exercised, 0);
}
