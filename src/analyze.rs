//! Match resolution: from a FACEIT room URL to both rosters' ranked maps.

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{calculate_winloss, rank_maps};
use crate::config::AnalysisConfig;
use crate::fetch::{FaceitApi, FetchError};
use crate::models::{MatchAnalysis, MatchId, MatchDetails, MapTally, RankedMap, Roster, TeamAnalysis};

/// Errors from analysing a match.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid match URL: {0}")]
    InvalidMatchUrl(String),

    #[error("FACEIT API error: {0}")]
    Upstream(#[from] FetchError),
}

/// How far back to look in each player's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryLength {
    #[default]
    #[serde(rename = "past_20")]
    Recent,
    #[serde(rename = "all_time")]
    AllTime,
}

impl QueryLength {
    /// Parse a form value. Anything other than `all_time` means recent.
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "all_time" => QueryLength::AllTime,
            _ => QueryLength::Recent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryLength::Recent => "past_20",
            QueryLength::AllTime => "all_time",
        }
    }
}

fn match_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://www\.faceit\.com/en/cs2/room/1-([\w-]+)")
            .expect("match URL regex is valid")
    })
}

/// Extract the match id from a FACEIT CS2 room URL.
///
/// Trailing path segments (e.g. `/scoreboard`) are allowed.
pub fn parse_match_url(url: &str) -> Result<MatchId, AnalysisError> {
    let url = url.trim();
    match_url_regex()
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|id| MatchId::new(format!("1-{}", id.as_str())))
        .ok_or_else(|| AnalysisError::InvalidMatchUrl(url.to_string()))
}

/// Runs the fetch, aggregate and rank pipeline for a match.
#[derive(Clone)]
pub struct MatchAnalyzer {
    api: Arc<dyn FaceitApi>,
    windows: AnalysisConfig,
    concurrency: usize,
}

impl MatchAnalyzer {
    pub fn new(api: Arc<dyn FaceitApi>, windows: AnalysisConfig, concurrency: usize) -> Self {
        Self {
            api,
            windows,
            concurrency,
        }
    }

    /// Matches fetched per player for a query length.
    pub fn match_limit(&self, query_length: QueryLength) -> u32 {
        match query_length {
            QueryLength::Recent => self.windows.recent_matches,
            QueryLength::AllTime => self.windows.all_time_matches,
        }
    }

    /// Analyse the match behind a room URL.
    ///
    /// The URL is validated before any API call is made.
    pub async fn analyze(
        &self,
        match_url: &str,
        query_length: QueryLength,
    ) -> Result<MatchAnalysis, AnalysisError> {
        let match_id = parse_match_url(match_url)?;
        self.analyze_match(&match_id, self.match_limit(query_length))
            .await
    }

    /// Analyse a match by id with an explicit per-player match limit.
    pub async fn analyze_match(
        &self,
        match_id: &MatchId,
        match_limit: u32,
    ) -> Result<MatchAnalysis, AnalysisError> {
        info!("Analysing match {} (last {} matches per player)", match_id, match_limit);

        let MatchDetails {
            match_id,
            roster_1,
            roster_2,
        } = self.api.fetch_match(match_id).await.map_err(|e| {
            warn!("Match lookup failed for {}: {}", match_id, e);
            e
        })?;

        let (tally_1, tally_2) = calculate_winloss(
            self.api.as_ref(),
            &roster_1.player_ids(),
            &roster_2.player_ids(),
            match_limit,
            self.concurrency,
        )
        .await
        .map_err(|e| {
            warn!("Player stats fetch failed for match {}: {}", match_id, e);
            e
        })?;

        let (ranked_1, ranked_2) = rank_maps(&tally_1, &tally_2);
        if let (Some(best_1), Some(best_2)) = (ranked_1.first(), ranked_2.first()) {
            info!(
                "{}: {} should pick {} ({:+.2}), {} should pick {} ({:+.2})",
                match_id,
                roster_1.name,
                best_1.map,
                best_1.differential,
                roster_2.name,
                best_2.map,
                best_2.differential
            );
        }

        Ok(MatchAnalysis {
            match_id,
            match_limit,
            generated_at: Utc::now(),
            roster_1: team_analysis(roster_1, tally_1, ranked_1),
            roster_2: team_analysis(roster_2, tally_2, ranked_2),
        })
    }
}

fn team_analysis(roster: Roster, tally: MapTally, ranked_maps: Vec<RankedMap>) -> TeamAnalysis {
    TeamAnalysis {
        players: roster.nicknames(),
        name: roster.name,
        tally,
        ranked_maps,
    }
}
