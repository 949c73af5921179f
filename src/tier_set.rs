use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, ScorecardError};
use crate::tier::Tier;

/// Read-only registry of the game's tiers, keyed by tier id.
///
/// Tiers are iterated in ascending id order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierSet {
    tiers: BTreeMap<u32, Tier>,
}

impl TierSet {
    /// Build a tier set, rejecting duplicate ids.
    pub fn from_tiers(tiers: impl IntoIterator<Item = Tier>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for tier in tiers {
            let id = tier.id;
            if map.insert(id, tier).is_some() {
                return Err(ScorecardError::InvalidInput(format!("duplicate tier id {}", id)));
            }
        }
        Ok(TierSet { tiers: map })
    }

    /// Read tiers from a CSV file.
    /// Format: id,teamName
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut tiers = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((id, name)) = line.split_once(',') else {
                continue;
            };
            let id: u32 = id.trim().parse().map_err(|e| {
                ScorecardError::InvalidInput(format!("invalid tier id '{}': {}", id.trim(), e))
            })?;
            tiers.push(Tier::new(id, name.trim()));
        }

        let set = Self::from_tiers(tiers)?;
        tracing::debug!(path = %path.display(), tiers = set.len(), "loaded tier set");
        Ok(set)
    }

    /// Parse a JSON array of `{ "id", "teamName" }` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let tiers: Vec<Tier> = serde_json::from_str(json)?;
        Self::from_tiers(tiers)
    }

    pub fn get(&self, id: u32) -> Option<&Tier> {
        self.tiers.get(&id)
    }

    pub fn team_name(&self, id: u32) -> Option<&str> {
        self.tiers.get(&id).map(|t| t.team_name.as_str())
    }

    pub fn contains(&self, id: u32) -> bool {
        self.tiers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// All tiers in ascending id order.
    pub fn tiers(&self) -> Vec<Tier> {
        self.tiers.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.values()
    }
}
