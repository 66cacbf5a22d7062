//! Map analysis output models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CsMap, MapTally, MatchId};

/// A map paired with the win-rate differential in favour of one roster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedMap {
    pub map: CsMap,

    /// Own win rate minus opponent win rate, rounded to 2 decimals
    pub differential: f64,
}

impl RankedMap {
    /// Whether this roster should prefer the map over its opponent.
    pub fn is_favoured(&self) -> bool {
        self.differential > 0.0
    }
}

/// Analysis for one side of a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAnalysis {
    /// Team display name
    pub name: String,

    /// Player nicknames in roster order
    pub players: Vec<String>,

    /// Raw win/loss counts per map
    pub tally: MapTally,

    /// Every map, best pick first
    pub ranked_maps: Vec<RankedMap>,
}

/// Result of analysing a match: both rosters' ranked map lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub match_id: MatchId,

    /// Number of recent matches fetched per player
    pub match_limit: u32,

    pub generated_at: DateTime<Utc>,

    pub roster_1: TeamAnalysis,
    pub roster_2: TeamAnalysis,
}
