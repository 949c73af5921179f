use serde::{Deserialize, Serialize};

use crate::constants::BLOCK_DURATION_SECS;
use crate::error::Result;
use crate::table::merge_with_full_tier_set;
use crate::tier::{ScoreCardEntry, Tier, TierWeight};

/// A scorecard submitted to governance for attestation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub proposal_id: String,
    pub title: String,

    /// True for the default scorecard that splits the pot evenly
    #[serde(default)]
    pub is_equal: bool,

    pub tier_weights: Vec<TierWeight>,
}

impl Proposal {
    pub fn new(
        proposal_id: impl Into<String>,
        title: impl Into<String>,
        is_equal: bool,
        tier_weights: Vec<TierWeight>,
    ) -> Self {
        Proposal {
            proposal_id: proposal_id.into(),
            title: title.into(),
            is_equal,
            tier_weights,
        }
    }

    /// Parse a JSON array of proposals.
    pub fn list_from_json(json: &str) -> Result<Vec<Proposal>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Ranked table of this proposal over the full tier set.
    pub fn table(&self, tiers: &[Tier]) -> Vec<ScoreCardEntry> {
        merge_with_full_tier_set(tiers, &self.tier_weights)
    }
}

/// Governor proposal lifecycle, numbered as the governor reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProposalState {
    Pending = 0,
    Active = 1,
    Canceled = 2,
    Defeated = 3,
    Queued = 4,
    Expired = 5,
    Executed = 6,
}

impl ProposalState {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ProposalState::Pending),
            1 => Some(ProposalState::Active),
            2 => Some(ProposalState::Canceled),
            3 => Some(ProposalState::Defeated),
            4 => Some(ProposalState::Queued),
            5 => Some(ProposalState::Expired),
            6 => Some(ProposalState::Executed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProposalState::Pending => "Pending",
            ProposalState::Active => "Active",
            ProposalState::Canceled => "Canceled",
            ProposalState::Defeated => "Defeated",
            ProposalState::Queued => "Queued",
            ProposalState::Expired => "Expired",
            ProposalState::Executed => "Executed",
        }
    }

    /// Whether votes can still be cast.
    pub fn is_open(&self) -> bool {
        matches!(self, ProposalState::Active)
    }
}

/// Ballot option on an attestation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteChoice {
    Against = 0,
    For = 1,
}

impl VoteChoice {
    /// Support value passed to the governor's `castVote`.
    pub fn support(&self) -> u8 {
        *self as u8
    }

    /// Selection after pressing `pressed`: pressing the selected option clears it.
    pub fn toggle(current: Option<VoteChoice>, pressed: VoteChoice) -> Option<VoteChoice> {
        if current == Some(pressed) {
            None
        } else {
            Some(pressed)
        }
    }
}

/// Abbreviate a vote count: `999`, `12 thousands`, `3 millions`, `2 billions`.
pub fn format_vote_count(votes: u64) -> String {
    let n = votes as f64;
    if votes < 1_000 {
        votes.to_string()
    } else if votes < 1_000_000 {
        format!("{:.0} thousands", n / 1e3)
    } else if votes < 1_000_000_000 {
        format!("{:.0} millions", n / 1e6)
    } else {
        format!("{:.0} billions", n / 1e9)
    }
}

/// Estimate when voting closes, in unix milliseconds.
///
/// # Arguments
/// * `deadline_block` - Block at which the proposal deadline falls
/// * `current_block` - Latest known block
/// * `now_ms` - Current wall-clock time in unix milliseconds
///
/// Saturates at the `i64` bounds for block distances too large to represent.
pub fn estimate_voting_end(deadline_block: u64, current_block: u64, now_ms: i64) -> i64 {
    let blocks_left = deadline_block as i128 - current_block as i128;
    let end = now_ms as i128 + blocks_left * BLOCK_DURATION_SECS as i128 * 1000;
    end.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
