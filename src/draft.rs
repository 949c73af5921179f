use std::collections::BTreeMap;

use crate::error::{Result, ScorecardError};
use crate::normalize::{parse_weight, percents_to_weights, weights_to_percents, Scorecard};
use crate::table::merge_with_full_tier_set;
use crate::tier::{ScoreCardEntry, TierWeight};
use crate::tier_set::TierSet;

/// Scorecard being filled in by a player before submission.
///
/// Holds at most one weight per tier; setting a weight again replaces it.
#[derive(Clone, Debug)]
pub struct ScorecardDraft {
    tiers: TierSet,
    weights: BTreeMap<u32, u64>,
}

impl ScorecardDraft {
    pub fn new(tiers: TierSet) -> Self {
        ScorecardDraft {
            tiers,
            weights: BTreeMap::new(),
        }
    }

    /// Pre-load a draft from an existing scorecard.
    ///
    /// Weights for tiers outside `tiers` are dropped.
    pub fn from_scorecard(tiers: TierSet, scorecard: &Scorecard) -> Self {
        let weights = percents_to_weights(scorecard)
            .into_iter()
            .filter(|w| tiers.contains(w.id))
            .map(|w| (w.id, w.redemption_weight))
            .collect();
        ScorecardDraft { tiers, weights }
    }

    pub fn tiers(&self) -> &TierSet {
        &self.tiers
    }

    pub fn set_weight(&mut self, id: u32, redemption_weight: u64) -> Result<()> {
        if !self.tiers.contains(id) {
            return Err(ScorecardError::InvalidInput(format!("unknown tier {}", id)));
        }
        self.weights.insert(id, redemption_weight);
        Ok(())
    }

    /// Set a weight straight from form text.
    pub fn set_weight_str(&mut self, id: u32, input: &str) -> Result<()> {
        let weight = parse_weight(input)?;
        self.set_weight(id, weight)
    }

    /// Current weight of a tier, 0 when not filled in.
    pub fn weight(&self, id: u32) -> u64 {
        self.weights.get(&id).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.weights.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Entered weights in ascending tier id.
    pub fn weights(&self) -> Vec<TierWeight> {
        self.weights
            .iter()
            .map(|(&id, &w)| TierWeight::new(id, w))
            .collect()
    }

    /// Normalized scorecard ready for submission.
    pub fn normalize(&self) -> Scorecard {
        weights_to_percents(&self.weights())
    }

    /// Ranked table of the draft over every tier.
    pub fn preview(&self) -> Vec<ScoreCardEntry> {
        merge_with_full_tier_set(&self.tiers.tiers(), &self.weights())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOTAL_REDEMPTION_WEIGHT;
    use crate::tier::Tier;

    fn make_tiers() -> TierSet {
        TierSet::from_tiers(vec![Tier::new(1, "A"), Tier::new(2, "B"), Tier::new(3, "C")]).unwrap()
    }

    #[test]
    fn test_upsert_and_default() {
        let mut draft = ScorecardDraft::new(make_tiers());
        draft.set_weight(1, 5).unwrap();
        draft.set_weight(1, 9).unwrap();

        assert_eq!(draft.weight(1), 9);
        assert_eq!(draft.weight(2), 0);
        assert_eq!(draft.weights().len(), 1);
    }

    #[test]
    fn test_rejects_unknown_tier_and_bad_text() {
        let mut draft = ScorecardDraft::new(make_tiers());
        assert!(draft.set_weight(9, 1).is_err());
        assert!(draft.set_weight_str(1, "-3").is_err());
        assert!(draft.is_empty());

        draft.set_weight_str(1, "4").unwrap();
        assert_eq!(draft.weight(1), 4);
    }

    #[test]
    fn test_clear() {
        let mut draft = ScorecardDraft::new(make_tiers());
        draft.set_weight(2, 3).unwrap();
        draft.clear();
        assert!(draft.is_empty());
        assert!(draft.normalize().is_empty());
    }

    #[test]
    fn test_normalize_and_preview() {
        let mut draft = ScorecardDraft::new(make_tiers());
        draft.set_weight(1, 1).unwrap();
        draft.set_weight(3, 3).unwrap();

        let scorecard = draft.normalize();
        assert_eq!(scorecard.total_units(), TOTAL_REDEMPTION_WEIGHT as u128);

        let preview = draft.preview();
        assert_eq!(preview.len(), 3);
        assert_eq!(preview[0].team_name, "C");
        assert_eq!(preview[2].team_name, "B");
    }

    #[test]
    fn test_from_scorecard_round_trip() {
        let mut draft = ScorecardDraft::new(make_tiers());
        draft.set_weight(1, 20).unwrap();
        draft.set_weight(2, 60).unwrap();
        let submitted = draft.normalize();

        let reloaded = ScorecardDraft::from_scorecard(make_tiers(), &submitted);
        assert_eq!(reloaded.weight(1), 1);
        assert_eq!(reloaded.weight(2), 3);
        assert_eq!(reloaded.normalize(), submitted);
    }
}
