//! The competitive map pool and per-map win/loss tallies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The seven competitive CS2 maps that analysis is restricted to.
///
/// Variant order is the canonical order used for tie-breaking when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CsMap {
    #[serde(rename = "de_ancient")]
    Ancient,
    #[serde(rename = "de_anubis")]
    Anubis,
    #[serde(rename = "de_dust2")]
    Dust2,
    #[serde(rename = "de_inferno")]
    Inferno,
    #[serde(rename = "de_mirage")]
    Mirage,
    #[serde(rename = "de_nuke")]
    Nuke,
    #[serde(rename = "de_train")]
    Train,
}

impl CsMap {
    /// Every map in the pool, in canonical order.
    pub const ALL: [CsMap; 7] = [
        CsMap::Ancient,
        CsMap::Anubis,
        CsMap::Dust2,
        CsMap::Inferno,
        CsMap::Mirage,
        CsMap::Nuke,
        CsMap::Train,
    ];

    /// The map name as it appears in the FACEIT API.
    pub fn as_str(&self) -> &'static str {
        match self {
            CsMap::Ancient => "de_ancient",
            CsMap::Anubis => "de_anubis",
            CsMap::Dust2 => "de_dust2",
            CsMap::Inferno => "de_inferno",
            CsMap::Mirage => "de_mirage",
            CsMap::Nuke => "de_nuke",
            CsMap::Train => "de_train",
        }
    }

    /// Look up a map by its API name. Names outside the pool return `None`.
    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl std::fmt::Display for CsMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Win/loss counters for one roster on one map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// Per-map win/loss tally for one roster.
///
/// Always holds an entry for every map in [`CsMap::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapTally(BTreeMap<CsMap, WinLoss>);

impl Default for MapTally {
    fn default() -> Self {
        Self::new()
    }
}

impl MapTally {
    /// A tally with every map at (0, 0).
    pub fn new() -> Self {
        Self(CsMap::ALL.into_iter().map(|m| (m, WinLoss::default())).collect())
    }

    /// Count one match result on `map`.
    pub fn record(&mut self, map: CsMap, won: bool) {
        self.0.entry(map).or_default().record(won);
    }

    pub fn get(&self, map: CsMap) -> WinLoss {
        self.0.get(&map).copied().unwrap_or_default()
    }

    /// Iterate in canonical map order.
    pub fn iter(&self) -> impl Iterator<Item = (CsMap, WinLoss)> + '_ {
        self.0.iter().map(|(m, wl)| (*m, *wl))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total matches counted across all maps.
    pub fn total_matches(&self) -> u32 {
        self.0.values().map(WinLoss::total).sum()
    }
}

impl FromIterator<(CsMap, WinLoss)> for MapTally {
    fn from_iter<I: IntoIterator<Item = (CsMap, WinLoss)>>(iter: I) -> Self {
        let mut tally = Self::new();
        for (map, wl) in iter {
            tally.0.insert(map, wl);
        }
        tally
    }
}
