// Per-manager gameweek summary: a manager's picks joined against the player
// index, the league table and the bio store.

use tracing::{debug, warn};

use crate::api::LeagueSource;
use crate::error::{NotFoundError, ReportError};
use crate::model::{
    Bio, ManagerGameweekSummary, PicksBundle, PlayerIndex, PlayerPoints, Standings, STARTING_XI,
};

/// How many players the top and bottom scorer lists hold.
pub const SCORER_LIST_LEN: usize = 3;

/// Fetch a manager's picks for `gameweek` and summarize them.
pub async fn extract_summary<S>(
    source: &S,
    manager_id: u64,
    gameweek: u32,
    players: &PlayerIndex,
    standings: &Standings,
    bio: Option<&Bio>,
) -> Result<ManagerGameweekSummary, ReportError>
where
    S: LeagueSource + ?Sized,
{
    let picks = source.fetch_picks(manager_id, gameweek).await?;
    Ok(summarize(manager_id, &picks, players, standings, bio)?)
}

/// Build the summary from an already fetched picks bundle.
///
/// The squad is split with `split_squad`. `name` starts out as the bio's team
/// name; the aggregator relabels it with the fixture's display name. A
/// missing bio falls back to `Bio::placeholder()`.
pub fn summarize(
    manager_id: u64,
    picks: &PicksBundle,
    players: &PlayerIndex,
    standings: &Standings,
    bio: Option<&Bio>,
) -> Result<ManagerGameweekSummary, NotFoundError> {
    let row = standings
        .find(manager_id)
        .ok_or(NotFoundError::Manager(manager_id))?;

    let squad = split_squad(picks, players)?;

    let bio = match bio {
        Some(bio) => bio.clone(),
        None => {
            warn!(manager_id, "no bio configured, using placeholder");
            Bio::placeholder()
        }
    };

    debug!(
        manager_id,
        counted = squad.counted.len(),
        bench = squad.bench.len(),
        "summarized picks"
    );

    Ok(ManagerGameweekSummary {
        manager_id,
        name: bio.team_name.clone(),
        manager_points: picks.net_points(),
        bench_points: picks.entry_history.points_on_bench,
        league_rank: row.rank,
        previous_league_rank: row.previous_rank,
        overall_league_points: row.league_points_total,
        overall_fpl_points: row.overall_points_for,
        chip_used: picks.active_chip.clone(),
        number_of_transfers: picks.entry_history.event_transfers,
        top_scoring_players: top_scorers(&squad.counted, SCORER_LIST_LEN),
        lowest_scoring_players: bottom_scorers(&squad.counted, SCORER_LIST_LEN),
        bench_player_points: squad.bench,
        captain: squad.captain,
        team_name: bio.team_name,
        manager: bio.manager,
        number_of_league_titles: bio.league_wins,
        background: bio.bio,
    })
}

/// A squad split into the players whose points counted and the bench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadSplit {
    pub counted: Vec<PlayerPoints>,
    pub bench: Vec<PlayerPoints>,
    /// Display name of the flagged captain. The last flag wins.
    pub captain: Option<String>,
}

/// Resolve every pick against the player index and split the squad.
///
/// Picks count when their squad position is in the starting eleven, or
/// always when bench boost is active. Pick order is kept in both halves.
pub fn split_squad(
    picks: &PicksBundle,
    players: &PlayerIndex,
) -> Result<SquadSplit, NotFoundError> {
    let bench_boost = picks.bench_boost_active();
    let mut split = SquadSplit {
        counted: Vec::with_capacity(picks.picks.len()),
        bench: Vec::new(),
        captain: None,
    };

    for pick in &picks.picks {
        let player = players
            .get(pick.player_id)
            .ok_or(NotFoundError::Player(pick.player_id))?;
        let entry = PlayerPoints {
            name: player.display_name.clone(),
            points: player.gameweek_points,
        };

        if pick.is_captain {
            split.captain = Some(player.display_name.clone());
        }

        if bench_boost || pick.squad_position <= STARTING_XI {
            split.counted.push(entry);
        } else {
            split.bench.push(entry);
        }
    }

    Ok(split)
}

/// Highest scorers first. Ties keep their squad order.
pub fn top_scorers(players: &[PlayerPoints], n: usize) -> Vec<PlayerPoints> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| b.points.cmp(&a.points));
    sorted.truncate(n);
    sorted
}

/// Lowest scorers first. Ties keep their squad order.
pub fn bottom_scorers(players: &[PlayerPoints], n: usize) -> Vec<PlayerPoints> {
    let mut sorted = players.to_vec();
    sorted.sort_by_key(|p| p.points);
    sorted.truncate(n);
    sorted
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
