// Fantasy Premier League API client.
//
// Four read-only endpoints: player bootstrap data, H2H standings, paginated
// H2H matches and per-manager gameweek picks. Requests are awaited one at a
// time and never retried; the first failure is returned to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{
    BootstrapPayload, Fixture, MatchesPage, PicksBundle, PlayerIndex, Standings,
    StandingsPayload,
};

// ---------------------------------------------------------------------------
// LeagueSource
// ---------------------------------------------------------------------------

/// Where league data comes from. The report builders only talk to this
/// trait, so tests can feed them canned payloads.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    async fn fetch_players(&self) -> Result<PlayerIndex, FetchError>;

    /// League table, including the AVERAGE row when the league has one.
    async fn fetch_standings(&self, league_id: u64) -> Result<Standings, FetchError>;

    /// Every fixture of the league across all pages, in page order.
    async fn fetch_matches(&self, league_id: u64) -> Result<Vec<Fixture>, FetchError>;

    async fn fetch_picks(&self, manager_id: u64, gameweek: u32)
        -> Result<PicksBundle, FetchError>;
}

// ---------------------------------------------------------------------------
// FplClient
// ---------------------------------------------------------------------------

pub struct FplClient {
    http: reqwest::Client,
    base_url: String,
}

impl FplClient {
    /// Client with reqwest defaults (no timeout).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(api.user_agent.clone());
        if let Some(secs) = api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|source| FetchError::Transport {
            url: api.base_url.clone(),
            source,
        })?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl LeagueSource for FplClient {
    async fn fetch_players(&self) -> Result<PlayerIndex, FetchError> {
        let payload: BootstrapPayload = self.get_json(&self.url("bootstrap-static/")).await?;
        let index: PlayerIndex = payload.elements.into_iter().collect();
        info!(players = index.len(), "loaded player index");
        Ok(index)
    }

    async fn fetch_standings(&self, league_id: u64) -> Result<Standings, FetchError> {
        let url = self.url(&format!("leagues-h2h/{league_id}/standings/"));
        let payload: StandingsPayload = self.get_json(&url).await?;
        let standings = Standings::new(payload.standings.results);
        info!(
            league_id,
            rows = standings.len(),
            has_average = standings.average().is_some(),
            "loaded league standings"
        );
        Ok(standings)
    }

    async fn fetch_matches(&self, league_id: u64) -> Result<Vec<Fixture>, FetchError> {
        let url = self.url(&format!("leagues-h2h-matches/league/{league_id}"));
        let mut fixtures = Vec::new();
        let mut page: u32 = 1;

        loop {
            let batch: MatchesPage = self.get_json(&format!("{url}?page={page}")).await?;
            debug!(
                page,
                results = batch.results.len(),
                has_next = batch.has_next,
                "matches page"
            );
            fixtures.extend(batch.results);
            if !batch.has_next {
                break;
            }
            page += 1;
        }

        info!(league_id, pages = page, fixtures = fixtures.len(), "loaded league matches");
        Ok(fixtures)
    }

    async fn fetch_picks(
        &self,
        manager_id: u64,
        gameweek: u32,
    ) -> Result<PicksBundle, FetchError> {
        let url = self.url(&format!("entry/{manager_id}/event/{gameweek}/picks/"));
        self.get_json(&url).await
    }
}
