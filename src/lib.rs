//! Scorecard Core - scorecard normalization for tiered fantasy sports games.
//!
//! Converts the redemption weights players assign to team tiers into
//! fixed-point scorecards, ranks tiers for display, and recovers editable
//! weights from submitted scorecards. Python bindings via PyO3 are available
//! behind the `python` feature.

pub mod constants;
pub mod draft;
pub mod error;
pub mod normalize;
pub mod proposal;
pub mod table;
pub mod tier;
pub mod tier_set;

#[cfg(feature = "python")]
pub mod python;

pub use constants::{units_to_points, BLOCK_DURATION_SECS, TOTAL_POINTS, TOTAL_REDEMPTION_WEIGHT};
pub use draft::ScorecardDraft;
pub use error::{Result, ScorecardError};
pub use normalize::{
    parse_weight, percents_to_weights, validate_weights, weight_to_points, weights_to_percents,
    Scorecard,
};
pub use proposal::{estimate_voting_end, format_vote_count, Proposal, ProposalState, VoteChoice};
pub use table::{leaders, merge_with_full_tier_set, score_tables, sort_entries};
pub use tier::{ScoreCardEntry, Tier, TierWeight};
pub use tier_set::TierSet;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn scorecard_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<python::PyTier>()?;
    m.add_class::<python::PyScoreCardEntry>()?;
    m.add_class::<python::PyScorecardDraft>()?;

    // Normalization
    m.add_function(wrap_pyfunction!(python::weights_to_percents, m)?)?;
    m.add_function(wrap_pyfunction!(python::weights_to_points, m)?)?;
    m.add_function(wrap_pyfunction!(python::percents_to_weights, m)?)?;
    m.add_function(wrap_pyfunction!(python::merge_with_full_tier_set, m)?)?;
    m.add_function(wrap_pyfunction!(python::parse_weight, m)?)?;
    m.add_function(wrap_pyfunction!(python::read_tiers, m)?)?;

    // Governance helpers
    m.add_function(wrap_pyfunction!(python::proposal_state_label, m)?)?;
    m.add_function(wrap_pyfunction!(python::format_vote_count, m)?)?;
    m.add_function(wrap_pyfunction!(python::estimate_voting_end, m)?)?;

    // Constants
    m.add("TOTAL_REDEMPTION_WEIGHT", TOTAL_REDEMPTION_WEIGHT)?;
    m.add("TOTAL_POINTS", TOTAL_POINTS)?;
    m.add("BLOCK_DURATION_SECS", BLOCK_DURATION_SECS)?;

    Ok(())
}
