//! FACEIT Data API client.
//!
//! Two endpoints are used: the match lookup (both rosters of a match) and
//! the per-player CS2 stats history. Every call is a single GET with the
//! configured bearer token. Nothing is retried or cached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::FaceitConfig;
use crate::models::{MatchDetails, MatchId, PlayerId, Roster, StatRecord};

/// Errors that can occur while talking to the FACEIT API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FACEIT API key is not configured (set FACEIT_API_KEY)")]
    MissingApiKey,

    #[error("FACEIT API key contains characters not allowed in a header")]
    InvalidApiKey,
}

/// Source of match and player data.
#[async_trait]
pub trait FaceitApi: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Look up both rosters of a match.
    async fn fetch_match(&self, match_id: &MatchId) -> Result<MatchDetails, FetchError>;

    /// Fetch the `match_limit` most recent CS2 stat records of a player.
    async fn fetch_player_stats(
        &self,
        player_id: &PlayerId,
        match_limit: u32,
    ) -> Result<Vec<StatRecord>, FetchError>;
}

/// `GET /matches/{id}` response, reduced to the rosters.
#[derive(Debug, Deserialize)]
struct MatchResponse {
    teams: MatchTeams,
}

#[derive(Debug, Deserialize)]
struct MatchTeams {
    faction1: Roster,
    faction2: Roster,
}

/// `GET /players/{id}/games/cs2/stats` response.
#[derive(Debug, Deserialize)]
struct StatsResponse {
    items: Vec<StatRecord>,
}

/// reqwest-backed FACEIT Data API client.
pub struct FaceitClient {
    client: Client,
    base: Url,
}

impl FaceitClient {
    /// Create a client from explicit configuration.
    pub fn new(config: &FaceitConfig) -> Result<Self, FetchError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(FetchError::MissingApiKey)?;

        let base = Url::parse(&config.api_base)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.api_base.clone()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| FetchError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("map-scout/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base })
    }

    /// Build an API URL by appending path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl FaceitApi for FaceitClient {
    fn name(&self) -> &'static str {
        "faceit"
    }

    async fn fetch_match(&self, match_id: &MatchId) -> Result<MatchDetails, FetchError> {
        let url = self.endpoint(&["matches", match_id.as_str()])?;
        let response: MatchResponse = self.get_json(url).await?;

        Ok(MatchDetails {
            match_id: match_id.clone(),
            roster_1: response.teams.faction1,
            roster_2: response.teams.faction2,
        })
    }

    async fn fetch_player_stats(
        &self,
        player_id: &PlayerId,
        match_limit: u32,
    ) -> Result<Vec<StatRecord>, FetchError> {
        let mut url = self.endpoint(&["players", player_id.as_str(), "games", "cs2", "stats"])?;
        url.query_pairs_mut()
            .append_pair("offset", "0")
            .append_pair("limit", &match_limit.to_string());

        let response: StatsResponse = self.get_json(url).await?;
        debug!(
            "Fetched {} stat records for player {}",
            response.items.len(),
            player_id
        );
        Ok(response.items)
    }
}

/// In-memory API used by tests across the crate.
#[cfg(test)]
pub struct MockFaceit {
    matches: std::collections::HashMap<String, MatchDetails>,
    stats: std::collections::HashMap<String, Vec<StatRecord>>,
    delays: std::collections::HashMap<String, Duration>,
    failing: std::collections::HashSet<String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockFaceit {
    pub fn new() -> Self {
        Self {
            matches: Default::default(),
            stats: Default::default(),
            delays: Default::default(),
            failing: Default::default(),
            calls: Default::default(),
        }
    }

    pub fn with_match(mut self, details: MatchDetails) -> Self {
        self.matches
            .insert(details.match_id.as_str().to_string(), details);
        self
    }

    pub fn with_player(mut self, player_id: &str, records: Vec<StatRecord>) -> Self {
        self.stats.insert(player_id.to_string(), records);
        self
    }

    /// Delay this player's response, to force out-of-order completion.
    pub fn with_delay(mut self, player_id: &str, millis: u64) -> Self {
        self.delays
            .insert(player_id.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn with_failing_player(mut self, player_id: &str) -> Self {
        self.failing.insert(player_id.to_string());
        self
    }

    /// Number of API calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl FaceitApi for MockFaceit {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_match(&self, match_id: &MatchId) -> Result<MatchDetails, FetchError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.matches
            .get(match_id.as_str())
            .cloned()
            .ok_or(FetchError::HttpStatus {
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    async fn fetch_player_stats(
        &self,
        player_id: &PlayerId,
        match_limit: u32,
    ) -> Result<Vec<StatRecord>, FetchError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delays.get(player_id.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(player_id.as_str()) {
            return Err(FetchError::HttpStatus {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        let records = self
            .stats
            .get(player_id.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(records.into_iter().take(match_limit as usize).collect())
    }
}
