//! Property-based tests for core invariants.
//!
//! These tests use proptest to verify the stock classifier and the
//! non-negativity guard across a wide range of inputs.

use proptest::prelude::*;

use valorsales_api::auth::{has_permission, Action, Resource};
use valorsales_api::services::stock_status::{classify, StockStatus};

fn threshold_strategy() -> impl Strategy<Value = (i32, i32, Option<i32>, i32)> {
    (
        -100i32..10_000,
        0i32..500,
        proptest::option::of(1i32..20_000),
        0i32..500,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn classifier_is_total((qty, min, max, reorder) in threshold_strategy()) {
        // Every input maps to exactly one status, no panics
        let status = classify(qty, min, max, reorder);
        let again = classify(qty, min, max, reorder);
        prop_assert_eq!(status, again);
    }

    #[test]
    fn non_positive_quantity_is_always_out_of_stock(
        qty in i32::MIN..=0,
        min in 0i32..500,
        max in proptest::option::of(1i32..20_000),
        reorder in 0i32..500,
    ) {
        prop_assert_eq!(classify(qty, min, max, reorder), StockStatus::OutOfStock);
    }

    #[test]
    fn overstocked_requires_a_maximum((qty, min, max, reorder) in threshold_strategy()) {
        if classify(qty, min, max, reorder) == StockStatus::Overstocked {
            let ceiling = max.expect("Overstocked without a maximum");
            prop_assert!(qty > ceiling);
        }
    }

    #[test]
    fn low_stock_is_at_or_below_the_reorder_point((qty, min, max, reorder) in threshold_strategy()) {
        if classify(qty, min, max, reorder) == StockStatus::LowStock {
            prop_assert!(qty <= reorder);
            prop_assert!(qty > 0);
        }
    }

    #[test]
    fn reorder_point_takes_priority_over_maximum(
        min in 1i32..500,
        reorder in 1i32..500,
    ) {
        // A maximum below the reorder point never wins
        let status = classify(reorder, min, Some(reorder - 1), reorder);
        prop_assert_eq!(status, StockStatus::LowStock);
    }
}

// Model of the adjustment guard: a removal is accepted only if the
// resulting quantity stays non-negative.
fn apply_guarded(quantity: i32, delta: i32) -> Option<i32> {
    let next = quantity.checked_add(delta)?;
    if next < 0 {
        None
    } else {
        Some(next)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn guarded_adjustments_never_go_negative(
        initial in 0i32..100_000,
        deltas in proptest::collection::vec(-50_000i32..50_000, 0..50),
    ) {
        let mut quantity = initial;
        for delta in deltas {
            if let Some(next) = apply_guarded(quantity, delta) {
                quantity = next;
            }
        }
        prop_assert!(quantity >= 0);
    }

    #[test]
    fn rejected_adjustments_leave_quantity_unchanged(
        initial in 0i32..1000,
        delta in i32::MIN..0,
    ) {
        if apply_guarded(initial, delta).is_none() {
            // The guard fires exactly when the removal exceeds the stock
            prop_assert!(delta.checked_add(initial).map_or(true, |next| next < 0));
        }
    }

    #[test]
    fn permission_lookup_never_panics(role in "\\PC{0,24}") {
        for resource in Resource::ALL {
            let _ = has_permission(&role, resource, Action::Read);
            let _ = has_permission(&role, resource, Action::Manage);
        }
    }
}
