//! Property-based tests for token mapping
//!
//! These tests check the mapper's resolution rules against arbitrary inputs:
//! - A spacing hit is never further than the tolerance from its token
//! - Every lookup is counted exactly once
//! - Box shorthands expand back to the original four sides
//! - Angles snap to the nearest principal direction

use canopy_core::tokens::DesignTokens;
use canopy_style::mapper::{
    collapse_box, principal_direction, BoxShorthand, TokenMapper, TokenValue, DIRECTIONS, LENGTH_TOLERANCE,
};
use std::sync::Arc;
use proptest::prelude::*;

fn expand(shorthand: BoxShorthand) -> [f64; 4] {
    match shorthand {
        BoxShorthand::One(v) => [v; 4],
        BoxShorthand::Pair { vertical, horizontal } => [vertical, horizontal, vertical, horizontal],
        BoxShorthand::Four(all) => all,
    }
}

/// Padding sides drawn from a small set so that equal sides are common
fn side_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(4.0), Just(8.0), Just(16.0)]
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_spacing_hit_within_tolerance(value in 0.0f64..500.0) {
            let tokens = Arc::new(DesignTokens::default());
            let mut mapper = TokenMapper::new(Arc::clone(&tokens));
            match mapper.map_spacing(value) {
                TokenValue::Token { path, .. } => {
                    let token = tokens.spacing[path.key()];
                    prop_assert!((token - value).abs() <= LENGTH_TOLERANCE);
                }
                TokenValue::Raw(css) => {
                    prop_assert!(css.ends_with("px"));
                    prop_assert!(tokens.spacing.values().all(|t| (t - value).abs() > LENGTH_TOLERANCE));
                }
            }
        }

        #[test]
        fn test_every_lookup_is_counted(values in prop::collection::vec(0.0f64..100.0, 0..20)) {
            let mut mapper = TokenMapper::new(Arc::new(DesignTokens::default()));
            for v in &values {
                mapper.map_radius(*v);
            }
            let stats = mapper.stats();
            prop_assert_eq!(stats.token_hits + stats.fallbacks, values.len());
        }

        #[test]
        fn test_collapse_box_expands_back(
            top in side_strategy(),
            right in side_strategy(),
            bottom in side_strategy(),
            left in side_strategy(),
        ) {
            let sides = [top, right, bottom, left];
            prop_assert_eq!(expand(collapse_box(sides)), sides);
        }

        #[test]
        fn test_direction_is_nearest(angle in 0.0f64..360.0) {
            let direction = principal_direction(angle).unwrap();
            let index = DIRECTIONS.iter().position(|d| *d == direction).unwrap();
            let delta = (angle - index as f64 * 45.0).rem_euclid(360.0);
            prop_assert!(delta.min(360.0 - delta) <= 22.5 + 1e-9);
        }
    }
}
