use rayon::prelude::*;

use crate::normalize::weights_to_percents;
use crate::proposal::Proposal;
use crate::tier::{ScoreCardEntry, Tier, TierWeight};

/// Build the ranked scorecard table for the full tier set.
///
/// All weights are normalized together, including weights whose tier is not
/// in `tiers`. Each tier then gets exactly one row; tiers without a weight
/// score zero. Rows are ordered by descending points, ties by ascending
/// tier id.
///
/// # Arguments
/// * `tiers` - Every tier of the game
/// * `weights` - Raw or on-chain redemption weights
pub fn merge_with_full_tier_set(tiers: &[Tier], weights: &[TierWeight]) -> Vec<ScoreCardEntry> {
    let scorecard = weights_to_percents(weights);

    let orphans = scorecard
        .iter()
        .filter(|(id, _)| !tiers.iter().any(|t| t.id == *id))
        .count();
    if orphans > 0 {
        tracing::debug!(orphans, "weights reference tiers outside the tier set");
    }

    let mut seen = std::collections::BTreeSet::new();
    let mut entries: Vec<ScoreCardEntry> = tiers
        .iter()
        .filter(|t| seen.insert(t.id))
        .map(|t| ScoreCardEntry::new(t, scorecard.units(t.id)))
        .collect();

    sort_entries(&mut entries);
    entries
}

/// Order rows by descending weight, ties by ascending tier id.
pub fn sort_entries(entries: &mut [ScoreCardEntry]) {
    entries.sort_by(|a, b| {
        b.redemption_weight
            .cmp(&a.redemption_weight)
            .then(a.tier_id.cmp(&b.tier_id))
    });
}

/// Build one ranked table per proposal.
///
/// Uses parallel processing; the output keeps the order of `proposals`.
pub fn score_tables(tiers: &[Tier], proposals: &[Proposal]) -> Vec<Vec<ScoreCardEntry>> {
    proposals
        .par_iter()
        .map(|p| merge_with_full_tier_set(tiers, &p.tier_weights))
        .collect()
}

/// Rows sharing the highest score. Empty when nobody scored.
pub fn leaders(entries: &[ScoreCardEntry]) -> Vec<&ScoreCardEntry> {
    let top = entries.iter().map(|e| e.redemption_weight).max().unwrap_or(0);
    if top == 0 {
        return Vec::new();
    }
    entries.iter().filter(|e| e.redemption_weight == top).collect()
}
