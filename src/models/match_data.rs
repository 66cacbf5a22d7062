//! Match and player data as returned by the FACEIT Data API.

use serde::{Deserialize, Serialize};

use super::{CsMap, MatchId, PlayerId};

/// One player on a roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub player_id: PlayerId,
    #[serde(default)]
    pub nickname: String,
}

/// One side of a match: team display name plus its players in API order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub name: String,
    pub roster: Vec<RosterPlayer>,
}

impl Roster {
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.roster.iter().map(|p| p.player_id.clone()).collect()
    }

    pub fn nicknames(&self) -> Vec<String> {
        self.roster.iter().map(|p| p.nickname.clone()).collect()
    }
}

/// The two rosters of a match (`faction1` and `faction2`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub match_id: MatchId,
    pub roster_1: Roster,
    pub roster_2: Roster,
}

/// Per-match statistics block of a stat record.
///
/// Only the fields used for map analysis are decoded; the API sends many more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    #[serde(rename = "Map")]
    pub map: String,

    /// "1" for a win, "0" for a loss
    #[serde(rename = "Result")]
    pub result: String,

    #[serde(rename = "Match Id", default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
}

/// One historical match from a player's stats history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub stats: PlayerMatchStats,
}

impl StatRecord {
    pub fn new(map: impl Into<String>, won: bool) -> Self {
        Self {
            stats: PlayerMatchStats {
                map: map.into(),
                result: if won { "1" } else { "0" }.to_string(),
                match_id: None,
            },
        }
    }

    /// The map of this record, if it is in the competitive pool.
    pub fn map(&self) -> Option<CsMap> {
        CsMap::from_api_name(&self.stats.map)
    }

    /// Whether the player won this match.
    pub fn is_win(&self) -> bool {
        self.stats.result == "1"
    }
}
