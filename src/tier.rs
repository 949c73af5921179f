use serde::{Deserialize, Serialize};

use crate::constants::units_to_points;

/// A team tier of the game, as registered in the tier store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub id: u32,
    pub team_name: String,
}

impl Tier {
    pub fn new(id: u32, team_name: impl Into<String>) -> Self {
        Tier {
            id,
            team_name: team_name.into(),
        }
    }
}

/// Redemption weight assigned to one tier.
///
/// Raw form input and normalized on-chain weights share this shape; only the
/// scale differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierWeight {
    pub id: u32,
    pub redemption_weight: u64,
}

impl TierWeight {
    pub fn new(id: u32, redemption_weight: u64) -> Self {
        TierWeight {
            id,
            redemption_weight,
        }
    }
}

/// One row of a rendered scorecard table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCardEntry {
    pub tier_id: u32,
    pub team_name: String,

    /// Normalized redemption weight units (out of `TOTAL_REDEMPTION_WEIGHT`)
    pub redemption_weight: u64,

    /// Display points (out of `TOTAL_POINTS`)
    pub points: f64,
}

impl ScoreCardEntry {
    pub fn new(tier: &Tier, redemption_weight: u64) -> Self {
        ScoreCardEntry {
            tier_id: tier.id,
            team_name: tier.team_name.clone(),
            redemption_weight,
            points: units_to_points(redemption_weight),
        }
    }
}
