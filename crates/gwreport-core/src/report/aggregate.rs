// Match aggregation: one report per fixture of the target gameweek, with the
// league-average pseudo-team handled as a degenerate side.

use tracing::{info, warn};

use crate::api::LeagueSource;
use crate::error::{NotFoundError, ReportError};
use crate::model::{
    AverageSummary, BioStore, Fixture, FixtureSide, MatchReport, PlayerIndex, SideReport,
    Standings, AVERAGE_ENTRY_ID, NO_BIO, UNKNOWN,
};

use super::extract::extract_summary;

/// Build the match reports for `gameweek`.
///
/// Fixtures from other gameweeks are skipped, as are fixtures with AVERAGE on
/// both sides. Reports keep fixture order and are numbered from 1 over the
/// fixtures that made it in. The first failure aborts the whole batch.
pub async fn build_reports<S>(
    source: &S,
    gameweek: u32,
    fixtures: &[Fixture],
    standings: &Standings,
    players: &PlayerIndex,
    bios: &BioStore,
) -> Result<Vec<MatchReport>, ReportError>
where
    S: LeagueSource + ?Sized,
{
    let mut reports = Vec::new();

    for fixture in fixtures.iter().filter(|f| f.gameweek == gameweek) {
        let (side_1, side_2) = (fixture.side_1(), fixture.side_2());

        let (team_1, team_2) = match (side_1.is_average(), side_2.is_average()) {
            (true, true) => {
                warn!(gameweek, "skipping fixture with AVERAGE on both sides");
                continue;
            }
            (false, false) => (
                manager_side(source, side_1, gameweek, players, standings, bios).await?,
                manager_side(source, side_2, gameweek, players, standings, bios).await?,
            ),
            (true, false) => (
                SideReport::Average(average_summary(side_1, standings, bios)?),
                manager_side(source, side_2, gameweek, players, standings, bios).await?,
            ),
            (false, true) => (
                manager_side(source, side_1, gameweek, players, standings, bios).await?,
                SideReport::Average(average_summary(side_2, standings, bios)?),
            ),
        };

        let number = reports.len() + 1;
        let score = format!("{} - {}", team_1.manager_points(), team_2.manager_points());
        info!(number, score = %score, "{} vs {}", side_1.name, side_2.name);

        reports.push(MatchReport {
            number,
            team_1,
            team_2,
            score,
        });
    }

    Ok(reports)
}

/// The AVERAGE side of a fixture. Points are the fixture's own figure for
/// that side, never recomputed.
pub fn average_summary(
    side: FixtureSide<'_>,
    standings: &Standings,
    bios: &BioStore,
) -> Result<AverageSummary, NotFoundError> {
    let row = standings.average().ok_or(NotFoundError::AverageRow)?;
    let bio = bios.get(AVERAGE_ENTRY_ID);

    Ok(AverageSummary {
        name: bio.map_or_else(|| UNKNOWN.to_string(), |b| b.team_name.clone()),
        manager_points: side.points,
        league_rank: row.rank,
        previous_league_rank: row.previous_rank,
        overall_league_points: row.league_points_total,
        overall_fpl_points: row.overall_points_for,
        background: bio.map_or_else(|| NO_BIO.to_string(), |b| b.bio.clone()),
    })
}

async fn manager_side<S>(
    source: &S,
    side: FixtureSide<'_>,
    gameweek: u32,
    players: &PlayerIndex,
    standings: &Standings,
    bios: &BioStore,
) -> Result<SideReport, ReportError>
where
    S: LeagueSource + ?Sized,
{
    let manager_id = side
        .id
        .ok_or_else(|| NotFoundError::FixtureEntry(side.name.to_string()))?;
    let mut summary = extract_summary(
        source,
        manager_id,
        gameweek,
        players,
        standings,
        bios.get(manager_id),
    )
    .await?;
    summary.name = side.name.to_string();
    Ok(SideReport::Manager(summary))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
