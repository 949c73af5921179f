use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{units_to_points, TOTAL_POINTS, TOTAL_REDEMPTION_WEIGHT};
use crate::error::{Result, ScorecardError};
use crate::tier::TierWeight;

/// Normalized scorecard: tier id to redemption weight units.
///
/// Built by [`weights_to_percents`]. Unless every input weight was zero, the
/// units sum to exactly `TOTAL_REDEMPTION_WEIGHT`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scorecard {
    units: BTreeMap<u32, u64>,
}

impl Scorecard {
    /// Units held by a tier, 0 when the tier is not part of the scorecard.
    pub fn units(&self, id: u32) -> u64 {
        self.units.get(&id).copied().unwrap_or(0)
    }

    /// Display points held by a tier.
    pub fn points(&self, id: u32) -> f64 {
        units_to_points(self.units(id))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.units.contains_key(&id)
    }

    /// Sum of all units. Wider than `u64` since a loaded scorecard is not
    /// bounded by `TOTAL_REDEMPTION_WEIGHT`.
    pub fn total_units(&self) -> u128 {
        self.units.values().map(|&u| u as u128).sum()
    }

    pub fn total_points(&self) -> f64 {
        self.units.values().map(|&u| units_to_points(u)).sum()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// True when the scorecard carries no weight at all.
    pub fn is_zero(&self) -> bool {
        self.units.values().all(|&u| u == 0)
    }

    /// Iterate (tier id, units) in ascending tier id.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.units.iter().map(|(&id, &u)| (id, u))
    }

    /// Entries ordered by descending units, ties by ascending tier id.
    pub fn ranked(&self) -> Vec<TierWeight> {
        let mut ranked = self.to_tier_weights();
        ranked.sort_by(|a, b| {
            b.redemption_weight
                .cmp(&a.redemption_weight)
                .then(a.id.cmp(&b.id))
        });
        ranked
    }

    /// Submission payload: one weight per tier in ascending tier id.
    pub fn to_tier_weights(&self) -> Vec<TierWeight> {
        self.iter().map(|(id, u)| TierWeight::new(id, u)).collect()
    }

    /// Points per tier id, the shape the display layer consumes.
    pub fn to_points(&self) -> BTreeMap<u32, f64> {
        self.iter().map(|(id, u)| (id, units_to_points(u))).collect()
    }
}

/// Convert raw redemption weights into a normalized scorecard.
///
/// Every tier receives `floor(w * T / S)` units where `T` is
/// `TOTAL_REDEMPTION_WEIGHT` and `S` the sum of all weights. The units lost
/// to flooring are handed out one each to the largest remainders (ties by
/// ascending tier id) so the result sums to exactly `T`. A zero sum yields a
/// zero for every tier.
///
/// When a tier id appears more than once the last weight wins.
pub fn weights_to_percents(weights: &[TierWeight]) -> Scorecard {
    let raw = collapse(weights);
    let total: u128 = raw.values().map(|&w| w as u128).sum();

    if total == 0 {
        if !raw.is_empty() {
            tracing::debug!(tiers = raw.len(), "scorecard has zero total weight");
        }
        return Scorecard {
            units: raw.into_keys().map(|id| (id, 0)).collect(),
        };
    }

    let scale = TOTAL_REDEMPTION_WEIGHT as u128;
    let mut units = BTreeMap::new();
    let mut remainders = Vec::with_capacity(raw.len());
    let mut assigned: u128 = 0;

    for (&id, &weight) in &raw {
        let scaled = weight as u128 * scale;
        let share = scaled / total;
        assigned += share;
        // share <= scale, always fits
        units.insert(id, share as u64);
        remainders.push((scaled % total, id));
    }

    let leftover = (scale - assigned) as usize;
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, id) in remainders.iter().take(leftover) {
        if let Some(u) = units.get_mut(&id) {
            *u += 1;
        }
    }

    Scorecard { units }
}

/// Recover the smallest integer weights that normalize back to `scorecard`.
///
/// Used to pre-load an editable form from an existing scorecard; feeding the
/// result back into [`weights_to_percents`] reproduces `scorecard` exactly.
pub fn percents_to_weights(scorecard: &Scorecard) -> Vec<TierWeight> {
    let divisor = scorecard.units.values().fold(0, |acc, &u| gcd(acc, u));
    scorecard
        .iter()
        .map(|(id, u)| {
            let weight = if divisor == 0 { 0 } else { u / divisor };
            TierWeight::new(id, weight)
        })
        .collect()
}

/// Percent (out of `TOTAL_POINTS`) of a single weight within a collection.
pub fn weight_to_points(redemption_weight: u64, weights: &[TierWeight]) -> f64 {
    let total: u128 = weights.iter().map(|w| w.redemption_weight as u128).sum();
    if total == 0 {
        return 0.0;
    }
    redemption_weight as f64 / total as f64 * TOTAL_POINTS
}

/// Sanitize a single form value into a redemption weight.
///
/// Blank input counts as zero. Anything else must be a non-negative whole
/// number.
pub fn parse_weight(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Ok(weight) = trimmed.parse::<u64>() {
        return Ok(weight);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ScorecardError::InvalidInput(format!("'{}' is not a number", trimmed)))?;
    if !value.is_finite() {
        return Err(ScorecardError::InvalidInput(format!("'{}' is not finite", trimmed)));
    }
    if value < 0.0 {
        return Err(ScorecardError::InvalidInput(format!(
            "weight must not be negative, got {}",
            trimmed
        )));
    }
    if value.fract() != 0.0 {
        return Err(ScorecardError::InvalidInput(format!(
            "weight must be a whole number, got {}",
            trimmed
        )));
    }
    if value >= u64::MAX as f64 {
        return Err(ScorecardError::InvalidInput(format!("weight {} is too large", trimmed)));
    }
    Ok(value as u64)
}

/// Reject collections carrying more than one weight for the same tier.
pub fn validate_weights(weights: &[TierWeight]) -> Result<()> {
    let mut seen = std::collections::BTreeSet::new();
    for w in weights {
        if !seen.insert(w.id) {
            return Err(ScorecardError::InvalidInput(format!(
                "duplicate weight for tier {}",
                w.id
            )));
        }
    }
    Ok(())
}

fn collapse(weights: &[TierWeight]) -> BTreeMap<u32, u64> {
    let mut raw = BTreeMap::new();
    for w in weights {
        if raw.insert(w.id, w.redemption_weight).is_some() {
            tracing::warn!(tier = w.id, "duplicate tier weight, keeping the last one");
        }
    }
    raw
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn weights(pairs: &[(u32, u64)]) -> Vec<TierWeight> {
        pairs.iter().map(|&(id, w)| TierWeight::new(id, w)).collect()
    }

    #[test]
    fn test_proportional_split() {
        let scorecard = weights_to_percents(&weights(&[(1, 10), (2, 30), (3, 0)]));

        assert_eq!(scorecard.units(1), 250_000_000);
        assert_eq!(scorecard.units(2), 750_000_000);
        assert_eq!(scorecard.units(3), 0);
        assert!((scorecard.points(2) - 75.0).abs() < 1e-9);
        assert_eq!(scorecard.total_units(), TOTAL_REDEMPTION_WEIGHT as u128);
    }

    #[test]
    fn test_zero_sum_is_all_zero() {
        let scorecard = weights_to_percents(&weights(&[(1, 0), (2, 0)]));
        assert_eq!(scorecard.len(), 2);
        assert!(scorecard.is_zero());
        assert_eq!(scorecard.points(1), 0.0);
        assert_eq!(scorecard.total_points(), 0.0);
    }

    #[test]
    fn test_empty_input() {
        let scorecard = weights_to_percents(&[]);
        assert!(scorecard.is_empty());
        assert!(percents_to_weights(&scorecard).is_empty());
    }

    #[test]
    fn test_leftover_goes_to_largest_remainder() {
        // 1/3 each: 333_333_333 units with one unit left over for tier 1
        let scorecard = weights_to_percents(&weights(&[(3, 1), (1, 1), (2, 1)]));
        assert_eq!(scorecard.units(1), 333_333_334);
        assert_eq!(scorecard.units(2), 333_333_333);
        assert_eq!(scorecard.units(3), 333_333_333);
        assert_eq!(scorecard.total_units(), TOTAL_REDEMPTION_WEIGHT as u128);
    }

    #[test]
    fn test_ranking_descending_then_id() {
        let scorecard = weights_to_percents(&weights(&[(4, 5), (2, 5), (9, 10), (1, 0)]));
        let order: Vec<u32> = scorecard.ranked().iter().map(|w| w.id).collect();
        assert_eq!(order, vec![9, 2, 4, 1]);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let scorecard = weights_to_percents(&weights(&[(1, 10), (2, 10), (1, 30)]));
        assert_eq!(scorecard.len(), 2);
        assert_eq!(scorecard.units(1), 750_000_000);
    }

    #[test]
    fn test_input_not_mutated() {
        let input = weights(&[(1, 10), (2, 30)]);
        let before = input.clone();
        let first = weights_to_percents(&input);
        let first_copy = first.clone();

        let mut edited = input.clone();
        edited[0].redemption_weight = 90;
        let second = weights_to_percents(&edited);

        assert_eq!(input, before);
        assert_eq!(first, first_copy);
        assert_eq!(first.units(1), 250_000_000);
        assert_eq!(second.units(1), 750_000_000);
    }

    #[test]
    fn test_loaded_scorecard_total_does_not_overflow() {
        let loaded: Scorecard =
            serde_json::from_str(r#"{"1":18446744073709551615,"2":1}"#).unwrap();
        assert_eq!(loaded.total_units(), u64::MAX as u128 + 1);

        // Renormalizing a loaded scorecard brings it back to the fixed total
        let renormalized = weights_to_percents(&loaded.to_tier_weights());
        assert_eq!(renormalized.total_units(), TOTAL_REDEMPTION_WEIGHT as u128);
    }

    #[test]
    fn test_percents_to_weights_reduces() {
        let scorecard = weights_to_percents(&weights(&[(1, 10), (2, 30), (3, 0)]));
        assert_eq!(
            percents_to_weights(&scorecard),
            weights(&[(1, 1), (2, 3), (3, 0)])
        );
    }

    #[test]
    fn test_weight_to_points() {
        let all = weights(&[(1, 10), (2, 30)]);
        assert!((weight_to_points(30, &all) - 75.0).abs() < 1e-9);
        assert_eq!(weight_to_points(5, &[]), 0.0);
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("42").unwrap(), 42);
        assert_eq!(parse_weight("  7 ").unwrap(), 7);
        assert_eq!(parse_weight("").unwrap(), 0);
        assert_eq!(parse_weight("12.0").unwrap(), 12);

        for bad in ["-1", "1.5", "abc", "NaN", "inf", "1e30"] {
            assert!(
                matches!(parse_weight(bad), Err(ScorecardError::InvalidInput(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_validate_weights() {
        assert!(validate_weights(&weights(&[(1, 1), (2, 0)])).is_ok());
        assert!(validate_weights(&weights(&[(1, 1), (1, 2)])).is_err());
    }

    #[test]
    fn test_json_shape() {
        let scorecard = weights_to_percents(&weights(&[(1, 1), (2, 1)]));
        let json = serde_json::to_string(&scorecard).unwrap();
        assert_eq!(json, r#"{"1":500000000,"2":500000000}"#);
        let back: Scorecard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scorecard);
    }

    fn weight_sets() -> impl Strategy<Value = Vec<TierWeight>> {
        prop::collection::btree_map(0u32..64, 0u64..1_000_000_000_000, 1..24).prop_map(|m| {
            m.into_iter()
                .map(|(id, w)| TierWeight::new(id, w))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_units_sum_to_total(input in weight_sets()) {
            let scorecard = weights_to_percents(&input);
            let raw_sum: u64 = input.iter().map(|w| w.redemption_weight).sum();
            if raw_sum == 0 {
                prop_assert!(scorecard.is_zero());
            } else {
                prop_assert_eq!(scorecard.total_units(), TOTAL_REDEMPTION_WEIGHT as u128);
                prop_assert!((scorecard.total_points() - TOTAL_POINTS).abs() < 1e-6);
            }
        }

        #[test]
        fn prop_round_trip_is_exact(input in weight_sets()) {
            let scorecard = weights_to_percents(&input);
            let restored = weights_to_percents(&percents_to_weights(&scorecard));
            prop_assert_eq!(restored, scorecard);
        }

        #[test]
        fn prop_order_follows_weights(input in weight_sets()) {
            let scorecard = weights_to_percents(&input);
            let ranked = scorecard.ranked();
            for pair in ranked.windows(2) {
                prop_assert!(
                    pair[0].redemption_weight > pair[1].redemption_weight
                        || (pair[0].redemption_weight == pair[1].redemption_weight
                            && pair[0].id < pair[1].id)
                );
            }
        }
    }
}
