//! Economy Event Emission Infrastructure
//!
//! This module provides the notification seam for economy state changes.
//! The embedding application subscribes listeners and receives events when
//! a settlement completes, a dividend is distributed, or options vest.
//!
//! Listener failures are logged and swallowed: notifications never affect
//! the money movement that triggered them.

use anyhow::Result;
use async_trait::async_trait;
use lib_types::{Amount, GrantId, PeriodId, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

// ============================================================================
// EVENT TYPES
// ============================================================================

/// Economy-level events that clients can subscribe to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EconomyEvent {
    /// A settlement period was processed to completion
    SettlementCompleted {
        period: PeriodId,
        total_distributed: Amount,
        recipients: u32,
    },

    /// A cash dividend batch was paid out
    DividendDistributed {
        period: PeriodId,
        total_amount: Amount,
        recipients: u32,
    },

    /// Vested option tokens moved into a user's wallet
    OptionsVested {
        user: UserId,
        grant: GrantId,
        amount: Amount,
    },
}

impl std::fmt::Display for EconomyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EconomyEvent::SettlementCompleted {
                period,
                total_distributed,
                recipients,
            } => write!(
                f,
                "SettlementCompleted(period={}, total={}, recipients={})",
                period, total_distributed, recipients
            ),
            EconomyEvent::DividendDistributed {
                period,
                total_amount,
                recipients,
            } => write!(
                f,
                "DividendDistributed(period={}, total={}, recipients={})",
                period, total_amount, recipients
            ),
            EconomyEvent::OptionsVested { user, amount, .. } => {
                write!(f, "OptionsVested(user={:?}, amount={})", user, amount)
            }
        }
    }
}

// ============================================================================
// EVENT LISTENER TRAIT
// ============================================================================

/// Trait for entities that listen to economy events
#[async_trait]
pub trait EventListener: Send {
    /// Called when an economy event occurs
    ///
    /// This method is async to allow listeners to perform async operations
    /// without blocking other listeners or the publishing engine.
    async fn on_event(&mut self, event: EconomyEvent) -> Result<()>;
}

// ============================================================================
// EVENT PUBLISHER
// ============================================================================

/// Thread-safe event publisher for economy events
#[derive(Clone, Default)]
pub struct EventPublisher {
    /// Listeners subscribed to events
    listeners: Arc<Mutex<Vec<Box<dyn EventListener>>>>,
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher").finish()
    }
}

impl EventPublisher {
    /// Create a new event publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to economy events
    pub async fn subscribe(&self, listener: Box<dyn EventListener>) {
        let mut listeners = self.listeners.lock().await;
        listeners.push(listener);
    }

    /// Publish an event to all subscribers
    ///
    /// A failing listener is logged and skipped; the rest are still notified.
    pub async fn publish(&self, event: EconomyEvent) {
        let mut listeners = self.listeners.lock().await;
        for listener in listeners.iter_mut() {
            if let Err(e) = listener.on_event(event.clone()).await {
                tracing::warn!("Event listener error on {}: {}", event, e);
            }
        }
    }

    /// Get number of subscribed listeners
    pub async fn listener_count(&self) -> usize {
        self.listeners.lock().await.len()
    }

    /// Clear all listeners (for testing)
    pub async fn clear_listeners(&self) {
        self.listeners.lock().await.clear();
    }
}

// ============================================================================
// SIMPLE TEST LISTENER
// ============================================================================

/// Simple listener that captures events for testing
#[derive(Debug, Clone, Default)]
pub struct TestEventListener {
    /// Events captured
    pub events: Arc<Mutex<Vec<EconomyEvent>>>,
}

impl TestEventListener {
    /// Create a new test listener
    pub fn new() -> Self {
        Self::default()
    }

    /// Get captured events
    pub async fn get_events(&self) -> Vec<EconomyEvent> {
        self.events.lock().await.clone()
    }

    /// Clear captured events
    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

#[async_trait]
impl EventListener for TestEventListener {
    async fn on_event(&mut self, event: EconomyEvent) -> Result<()> {
        let mut events = self.events.lock().await;
        events.push(event);
        Ok(())
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
