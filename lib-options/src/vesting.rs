//! Linear vesting math

use lib_types::Amount;

/// Target vested amount after `days_elapsed` of a linear schedule.
///
/// `granted * days_elapsed / vesting_days`, capped at `granted`. Monotonic
/// in elapsed days, so replaying an earlier date never lowers the target.
pub fn vested_target(granted: Amount, days_elapsed: u64, vesting_days: u32) -> Amount {
    if vesting_days == 0 || days_elapsed >= vesting_days as u64 {
        return granted;
    }
    let days = days_elapsed as u128;
    let period = vesting_days as u128;
    // Split multiply so granted * days cannot overflow
    (granted / period) * days + (granted % period) * days / period
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // The target never exceeds the grant and never decreases as days pass.
        #[test]
        fn prop_target_bounded_and_monotonic(
            granted in 1u128..=u128::MAX / 2,
            vesting_days in 1u32..=10_000,
            day in 0u64..=20_000,
        ) {
            let today = vested_target(granted, day, vesting_days);
            let tomorrow = vested_target(granted, day + 1, vesting_days);
            prop_assert!(today <= granted);
            prop_assert!(tomorrow <= granted);
            prop_assert!(tomorrow >= today);
        }
    }
}
