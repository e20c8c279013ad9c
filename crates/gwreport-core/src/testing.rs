// In-memory LeagueSource and payload builders for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::api::LeagueSource;
use crate::error::FetchError;
use crate::model::{
    EntryHistory, Fixture, Pick, PicksBundle, Player, PlayerIndex, Standings, StandingsRow,
    AVERAGE_ENTRY_ID, AVERAGE_NAME,
};

/// Which endpoint a `FakeSource` should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Players,
    Standings,
    Matches,
}

#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    pub players: Vec<Player>,
    pub standings: Vec<StandingsRow>,
    pub fixtures: Vec<Fixture>,
    pub picks: HashMap<(u64, u32), PicksBundle>,
    pub failing: Option<Endpoint>,
}

impl FakeSource {
    fn check(&self, endpoint: Endpoint, url: &str) -> Result<(), FetchError> {
        if self.failing == Some(endpoint) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LeagueSource for FakeSource {
    async fn fetch_players(&self) -> Result<PlayerIndex, FetchError> {
        self.check(Endpoint::Players, "bootstrap-static/")?;
        Ok(self.players.iter().cloned().collect())
    }

    async fn fetch_standings(&self, _league_id: u64) -> Result<Standings, FetchError> {
        self.check(Endpoint::Standings, "standings/")?;
        Ok(Standings::new(self.standings.clone()))
    }

    async fn fetch_matches(&self, _league_id: u64) -> Result<Vec<Fixture>, FetchError> {
        self.check(Endpoint::Matches, "matches/")?;
        Ok(self.fixtures.clone())
    }

    async fn fetch_picks(
        &self,
        manager_id: u64,
        gameweek: u32,
    ) -> Result<PicksBundle, FetchError> {
        self.picks
            .get(&(manager_id, gameweek))
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: format!("entry/{manager_id}/event/{gameweek}/picks/"),
                status: 404,
            })
    }
}

pub(crate) fn player(id: u32, name: &str, points: i32) -> Player {
    Player {
        id,
        display_name: name.to_string(),
        gameweek_points: points,
    }
}

/// Fifteen players with ids `first_id..first_id + 15`, named `P{id}`.
pub(crate) fn squad_players(first_id: u32, points: [i32; 15]) -> Vec<Player> {
    points
        .iter()
        .enumerate()
        .map(|(i, &pts)| {
            let id = first_id + i as u32;
            player(id, &format!("P{id}"), pts)
        })
        .collect()
}

/// Picks for the players from `squad_players(first_id, ..)`, in squad order.
pub(crate) fn squad_picks(
    first_id: u32,
    captain_position: Option<u8>,
    chip: Option<&str>,
    points: i32,
    transfer_cost: i32,
) -> PicksBundle {
    let picks = (1..=15u8)
        .map(|pos| Pick {
            player_id: first_id + u32::from(pos) - 1,
            squad_position: pos,
            is_captain: captain_position == Some(pos),
        })
        .collect();

    PicksBundle {
        picks,
        entry_history: EntryHistory {
            points,
            event_transfers: if transfer_cost > 0 { 2 } else { 1 },
            event_transfers_cost: transfer_cost,
            points_on_bench: 7,
        },
        active_chip: chip.map(str::to_string),
    }
}

pub(crate) fn row(manager_id: u64, team_name: &str, rank: u32, previous_rank: u32) -> StandingsRow {
    StandingsRow {
        manager_id,
        team_name: team_name.to_string(),
        rank,
        previous_rank,
        league_points_total: 30 - 3 * rank as i32,
        overall_points_for: 1300 - 10 * rank as i32,
    }
}

pub(crate) fn average_row(rank: u32, previous_rank: u32) -> StandingsRow {
    row(AVERAGE_ENTRY_ID, AVERAGE_NAME, rank, previous_rank)
}

pub(crate) fn fixture(
    gameweek: u32,
    side_1: (Option<u64>, &str, i32),
    side_2: (Option<u64>, &str, i32),
) -> Fixture {
    Fixture {
        gameweek,
        entry_1_id: side_1.0,
        entry_1_name: side_1.1.to_string(),
        entry_1_points: side_1.2,
        entry_2_id: side_2.0,
        entry_2_name: side_2.1.to_string(),
        entry_2_points: side_2.2,
    }
}
