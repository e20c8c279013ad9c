// End-to-end run: load the per-run league snapshot, build the match reports
// for the configured gameweek and assemble the prompt.
//
// Every failure is tagged with the stage it happened in. Nothing is returned
// on failure, so callers never see a partial report set.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::api::LeagueSource;
use crate::config::Config;
use crate::error::{FetchError, ReportError};
use crate::model::{Fixture, MatchReport, PlayerIndex, Standings};
use crate::prompt::assemble_prompt;
use crate::report::build_reports;

// ---------------------------------------------------------------------------
// Stages and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadPlayers,
    LoadStandings,
    LoadMatches,
    BuildReports,
    AssemblePrompt,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::LoadPlayers => "loading player data",
            Stage::LoadStandings => "loading league standings",
            Stage::LoadMatches => "loading league matches",
            Stage::BuildReports => "building match reports",
            Stage::AssemblePrompt => "assembling prompt",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} failed: {source}")]
    Fetch {
        stage: Stage,
        #[source]
        source: FetchError,
    },

    #[error("building match reports failed: {0}")]
    Report(#[source] ReportError),

    #[error("assembling prompt failed: {0}")]
    Prompt(#[source] serde_json::Error),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch { stage, .. } => *stage,
            PipelineError::Report(_) => Stage::BuildReports,
            PipelineError::Prompt(_) => Stage::AssemblePrompt,
        }
    }
}

fn at(stage: Stage) -> impl FnOnce(FetchError) -> PipelineError {
    move |source| PipelineError::Fetch { stage, source }
}

// ---------------------------------------------------------------------------
// Snapshot and run
// ---------------------------------------------------------------------------

/// League data fetched once per run and shared by every match.
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    pub players: PlayerIndex,
    pub standings: Standings,
    pub fixtures: Vec<Fixture>,
}

impl LeagueSnapshot {
    pub async fn load<S>(source: &S, league_id: u64) -> Result<Self, PipelineError>
    where
        S: LeagueSource + ?Sized,
    {
        info!(league_id, "loading league snapshot");
        let players = source
            .fetch_players()
            .await
            .map_err(at(Stage::LoadPlayers))?;
        let standings = source
            .fetch_standings(league_id)
            .await
            .map_err(at(Stage::LoadStandings))?;
        let fixtures = source
            .fetch_matches(league_id)
            .await
            .map_err(at(Stage::LoadMatches))?;

        Ok(Self {
            players,
            standings,
            fixtures,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub gameweek: u32,
    pub reports: Vec<MatchReport>,
    pub prompt: String,
}

/// Run the whole pipeline for the league and gameweek in `config`.
pub async fn run<S>(source: &S, config: &Config) -> Result<PipelineOutput, PipelineError>
where
    S: LeagueSource + ?Sized,
{
    let gameweek = config.league.gameweek;
    let snapshot = LeagueSnapshot::load(source, config.league.league_id).await?;

    let reports = build_reports(
        source,
        gameweek,
        &snapshot.fixtures,
        &snapshot.standings,
        &snapshot.players,
        &config.bios,
    )
    .await
    .map_err(PipelineError::Report)?;
    info!(gameweek, matches = reports.len(), "all match reports processed");

    let prompt = assemble_prompt(
        &config.templates.task,
        &config.templates.detail,
        config.tone,
        &reports,
    )
    .map_err(PipelineError::Prompt)?;

    Ok(PipelineOutput {
        gameweek,
        reports,
        prompt,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
