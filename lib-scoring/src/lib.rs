//! Contribution scoring for the Arcadia platform economy
//!
//! Turns raw per-user activity into dimensionless contribution scores and
//! keeps the immutable per-period snapshot history the dividend calculator
//! folds over.

pub mod errors;
pub mod metrics;
pub mod scorer;
pub mod snapshot;
pub mod store;

pub use errors::{ScoringError, ScoringResult};
pub use metrics::{ActivityMetrics, PerformanceScores, UserMetrics};
pub use scorer::{score_users, ScoredUser, SCORE_SCALE};
pub use snapshot::ContributionSnapshot;
pub use store::{MemorySnapshotStore, SledSnapshotStore, SnapshotStore};
