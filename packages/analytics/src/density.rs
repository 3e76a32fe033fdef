//! Maps an incident count to a density tier for the choropleth.

use gppg_analytics_models::DensityTier;

/// Classifies a municipality's incident total.
///
/// Tier boundaries are closed intervals: `0`, `1-2`, `3-5`, `6-10`, `11+`.
/// They are printed verbatim in the map legend, so they must not drift.
#[must_use]
pub const fn classify(total: u64) -> DensityTier {
    match total {
        0 => DensityTier::None,
        1..=2 => DensityTier::Low,
        3..=5 => DensityTier::Medium,
        6..=10 => DensityTier::High,
        _ => DensityTier::VeryHigh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(classify(0), DensityTier::None);
        assert_eq!(classify(1), DensityTier::Low);
        assert_eq!(classify(2), DensityTier::Low);
        assert_eq!(classify(3), DensityTier::Medium);
        assert_eq!(classify(5), DensityTier::Medium);
        assert_eq!(classify(6), DensityTier::High);
        assert_eq!(classify(10), DensityTier::High);
        assert_eq!(classify(11), DensityTier::VeryHigh);
        assert_eq!(classify(u64::MAX), DensityTier::VeryHigh);
    }

    #[test]
    fn classification_is_monotonic() {
        for total in 0..50 {
            assert!(
                classify(total) <= classify(total + 1),
                "tier decreased between {total} and {}",
                total + 1
            );
        }
    }
}
