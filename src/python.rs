use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::collections::{BTreeMap, HashMap};

use crate::draft::ScorecardDraft;
use crate::error::ScorecardError;
use crate::normalize;
use crate::tier::{ScoreCardEntry, Tier, TierWeight};
use crate::tier_set::TierSet;

impl From<ScorecardError> for PyErr {
    fn from(err: ScorecardError) -> PyErr {
        match err {
            ScorecardError::Io(e) => PyIOError::new_err(format!("Failed to read file: {}", e)),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

fn to_weights(weights: &HashMap<u32, u64>) -> Vec<TierWeight> {
    weights
        .iter()
        .map(|(&id, &w)| TierWeight::new(id, w))
        .collect()
}

/// Tier exposed to Python.
#[pyclass(name = "Tier")]
#[derive(Clone, Debug)]
pub struct PyTier {
    #[pyo3(get, set)]
    pub id: u32,

    #[pyo3(get, set)]
    pub team_name: String,
}

#[pymethods]
impl PyTier {
    #[new]
    pub fn new(id: u32, team_name: String) -> Self {
        PyTier { id, team_name }
    }

    fn __repr__(&self) -> String {
        format!("Tier({}, {:?})", self.id, self.team_name)
    }
}

impl From<PyTier> for Tier {
    fn from(t: PyTier) -> Tier {
        Tier::new(t.id, t.team_name)
    }
}

impl From<Tier> for PyTier {
    fn from(t: Tier) -> PyTier {
        PyTier::new(t.id, t.team_name)
    }
}

/// Scorecard table row exposed to Python.
#[pyclass(name = "ScoreCardEntry")]
#[derive(Clone, Debug)]
pub struct PyScoreCardEntry {
    #[pyo3(get)]
    pub tier_id: u32,

    #[pyo3(get)]
    pub team_name: String,

    #[pyo3(get)]
    pub redemption_weight: u64,

    #[pyo3(get)]
    pub points: f64,
}

#[pymethods]
impl PyScoreCardEntry {
    fn __repr__(&self) -> String {
        format!(
            "ScoreCardEntry({}, {:?}, points={:.4})",
            self.tier_id, self.team_name, self.points
        )
    }
}

impl From<ScoreCardEntry> for PyScoreCardEntry {
    fn from(e: ScoreCardEntry) -> Self {
        PyScoreCardEntry {
            tier_id: e.tier_id,
            team_name: e.team_name,
            redemption_weight: e.redemption_weight,
            points: e.points,
        }
    }
}

/// Editable scorecard exposed to Python.
#[pyclass(name = "ScorecardDraft")]
#[derive(Clone)]
pub struct PyScorecardDraft {
    inner: ScorecardDraft,
}

#[pymethods]
impl PyScorecardDraft {
    #[new]
    pub fn new(tiers: Vec<PyTier>) -> PyResult<Self> {
        let set = TierSet::from_tiers(tiers.into_iter().map(Tier::from))?;
        Ok(PyScorecardDraft {
            inner: ScorecardDraft::new(set),
        })
    }

    /// Read the tier set from an `id,teamName` CSV file.
    #[staticmethod]
    pub fn from_file(filepath: &str) -> PyResult<Self> {
        Ok(PyScorecardDraft {
            inner: ScorecardDraft::new(TierSet::read_from_file(filepath)?),
        })
    }

    pub fn set_weight(&mut self, id: u32, redemption_weight: u64) -> PyResult<()> {
        Ok(self.inner.set_weight(id, redemption_weight)?)
    }

    pub fn set_weight_str(&mut self, id: u32, value: &str) -> PyResult<()> {
        Ok(self.inner.set_weight_str(id, value)?)
    }

    pub fn weight(&self, id: u32) -> u64 {
        self.inner.weight(id)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Normalized units per tier id.
    pub fn normalize(&self) -> BTreeMap<u32, u64> {
        self.inner.normalize().iter().collect()
    }

    pub fn preview(&self) -> Vec<PyScoreCardEntry> {
        self.inner.preview().into_iter().map(Into::into).collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScorecardDraft({} tiers, {} weights)",
            self.inner.tiers().len(),
            self.inner.weights().len()
        )
    }
}

/// Normalize raw weights to redemption weight units.
#[pyfunction]
pub fn weights_to_percents(weights: HashMap<u32, u64>) -> BTreeMap<u32, u64> {
    normalize::weights_to_percents(&to_weights(&weights))
        .iter()
        .collect()
}

/// Normalize raw weights to display points.
#[pyfunction]
pub fn weights_to_points(weights: HashMap<u32, u64>) -> BTreeMap<u32, f64> {
    normalize::weights_to_percents(&to_weights(&weights)).to_points()
}

/// Smallest integer weights reproducing a normalized scorecard.
#[pyfunction]
pub fn percents_to_weights(units: HashMap<u32, u64>) -> BTreeMap<u32, u64> {
    let scorecard = normalize::weights_to_percents(&to_weights(&units));
    normalize::percents_to_weights(&scorecard)
        .into_iter()
        .map(|w| (w.id, w.redemption_weight))
        .collect()
}

/// Ranked table over the full tier set.
#[pyfunction]
pub fn merge_with_full_tier_set(
    tiers: Vec<PyTier>,
    weights: HashMap<u32, u64>,
) -> Vec<PyScoreCardEntry> {
    let tiers: Vec<Tier> = tiers.into_iter().map(Tier::from).collect();
    crate::table::merge_with_full_tier_set(&tiers, &to_weights(&weights))
        .into_iter()
        .map(Into::into)
        .collect()
}

#[pyfunction]
pub fn parse_weight(value: &str) -> PyResult<u64> {
    Ok(normalize::parse_weight(value)?)
}

/// Read tiers from an `id,teamName` CSV file.
#[pyfunction]
pub fn read_tiers(filepath: &str) -> PyResult<Vec<PyTier>> {
    let set = TierSet::read_from_file(filepath)?;
    Ok(set.tiers().into_iter().map(Into::into).collect())
}

#[pyfunction]
pub fn proposal_state_label(code: u8) -> Option<&'static str> {
    crate::proposal::ProposalState::from_code(code).map(|s| s.label())
}

#[pyfunction]
pub fn format_vote_count(votes: u64) -> String {
    crate::proposal::format_vote_count(votes)
}

#[pyfunction]
pub fn estimate_voting_end(deadline_block: u64, current_block: u64, now_ms: i64) -> i64 {
    crate::proposal::estimate_voting_end(deadline_block, current_block, now_ms)
}
