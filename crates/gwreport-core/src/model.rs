// League data model: API payloads as they arrive on the wire and the derived
// report types that get serialized into the prompt.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Entry name the API uses for the league-average pseudo-team.
pub const AVERAGE_NAME: &str = "AVERAGE";

/// Reserved entry id of the league-average pseudo-team. Also the bio key.
pub const AVERAGE_ENTRY_ID: u64 = 1_000_001;

/// `active_chip` value for the bench boost chip.
pub const BENCH_BOOST_CHIP: &str = "bboost";

/// Squad positions 1..=11 are the starting eleven.
pub const STARTING_XI: u8 = 11;

/// Rendered in place of an absent captain or chip.
pub const NONE_SENTINEL: &str = "None";

pub const NO_BIO: &str = "No bio available.";
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// A player from the bootstrap payload, reduced to what the reports use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Player {
    pub id: u32,
    #[serde(rename = "web_name")]
    pub display_name: String,
    #[serde(rename = "event_points")]
    pub gameweek_points: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BootstrapPayload {
    pub elements: Vec<Player>,
}

/// Read-only player lookup keyed by player id. Built once per run.
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    players: HashMap<u32, Player>,
}

impl PlayerIndex {
    pub fn get(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl FromIterator<Player> for PlayerIndex {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// One row of the H2H league table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandingsRow {
    #[serde(rename = "entry", deserialize_with = "entry_id_or_average")]
    pub manager_id: u64,
    #[serde(rename = "entry_name")]
    pub team_name: String,
    pub rank: u32,
    #[serde(rename = "last_rank")]
    pub previous_rank: u32,
    /// League points (3 per win, 1 per draw).
    #[serde(rename = "total")]
    pub league_points_total: i32,
    /// Accumulated FPL points scored across all matches.
    #[serde(rename = "points_for")]
    pub overall_points_for: i32,
}

impl StandingsRow {
    pub fn is_average(&self) -> bool {
        self.team_name == AVERAGE_NAME || self.manager_id == AVERAGE_ENTRY_ID
    }
}

/// The average row may carry a null entry id; it is pinned to the reserved id.
fn entry_id_or_average<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(AVERAGE_ENTRY_ID))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StandingsPayload {
    pub standings: StandingsResults,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StandingsResults {
    pub results: Vec<StandingsRow>,
}

/// Snapshot of the league table for one run.
#[derive(Debug, Clone, Default)]
pub struct Standings {
    rows: Vec<StandingsRow>,
}

impl Standings {
    pub fn new(rows: Vec<StandingsRow>) -> Self {
        Self { rows }
    }

    /// Row for a real manager. Never returns the average row.
    pub fn find(&self, manager_id: u64) -> Option<&StandingsRow> {
        self.rows
            .iter()
            .find(|r| r.manager_id == manager_id && !r.is_average())
    }

    pub fn average(&self) -> Option<&StandingsRow> {
        self.rows.iter().find(|r| r.is_average())
    }

    pub fn rows(&self) -> &[StandingsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// One H2H match. Field names follow the API; the average side has no entry id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fixture {
    #[serde(rename = "event")]
    pub gameweek: u32,
    #[serde(rename = "entry_1_entry", default)]
    pub entry_1_id: Option<u64>,
    pub entry_1_name: String,
    pub entry_1_points: i32,
    #[serde(rename = "entry_2_entry", default)]
    pub entry_2_id: Option<u64>,
    pub entry_2_name: String,
    pub entry_2_points: i32,
}

/// Borrowed view of one side of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSide<'a> {
    pub id: Option<u64>,
    pub name: &'a str,
    pub points: i32,
}

impl FixtureSide<'_> {
    pub fn is_average(&self) -> bool {
        self.name == AVERAGE_NAME
    }
}

impl Fixture {
    pub fn side_1(&self) -> FixtureSide<'_> {
        FixtureSide {
            id: self.entry_1_id,
            name: &self.entry_1_name,
            points: self.entry_1_points,
        }
    }

    pub fn side_2(&self) -> FixtureSide<'_> {
        FixtureSide {
            id: self.entry_2_id,
            name: &self.entry_2_name,
            points: self.entry_2_points,
        }
    }
}

/// One page of the matches endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MatchesPage {
    pub results: Vec<Fixture>,
    #[serde(default)]
    pub has_next: bool,
}

// ---------------------------------------------------------------------------
// Picks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pick {
    #[serde(rename = "element")]
    pub player_id: u32,
    /// 1..=15; 12..=15 is the bench.
    #[serde(rename = "position")]
    pub squad_position: u8,
    #[serde(default)]
    pub is_captain: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryHistory {
    pub points: i32,
    pub event_transfers: u32,
    pub event_transfers_cost: i32,
    pub points_on_bench: i32,
}

/// A manager's squad selection for one gameweek.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PicksBundle {
    pub picks: Vec<Pick>,
    pub entry_history: EntryHistory,
    #[serde(default)]
    pub active_chip: Option<String>,
}

impl PicksBundle {
    /// Gameweek points after the transfer hit.
    pub fn net_points(&self) -> i32 {
        self.entry_history.points - self.entry_history.event_transfers_cost
    }

    pub fn bench_boost_active(&self) -> bool {
        self.active_chip.as_deref() == Some(BENCH_BOOST_CHIP)
    }
}

// ---------------------------------------------------------------------------
// Bios
// ---------------------------------------------------------------------------

/// Static per-manager flavour text from the bio store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bio {
    pub team_name: String,
    pub manager: String,
    #[serde(default)]
    pub league_wins: u32,
    #[serde(default)]
    pub bio: String,
}

impl Bio {
    /// Stand-in for a manager with no bio entry.
    pub fn placeholder() -> Self {
        Self {
            team_name: UNKNOWN.to_string(),
            manager: UNKNOWN.to_string(),
            league_wins: 0,
            bio: NO_BIO.to_string(),
        }
    }
}

/// Bio store keyed by manager id as a string, as it is kept on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BioStore {
    entries: BTreeMap<String, Bio>,
}

impl BioStore {
    pub fn get(&self, manager_id: u64) -> Option<&Bio> {
        self.entries.get(&manager_id.to_string())
    }

    pub fn insert(&mut self, manager_id: u64, bio: Bio) {
        self.entries.insert(manager_id.to_string(), bio);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bio)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Derived report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerPoints {
    pub name: String,
    pub points: i32,
}

/// One manager's gameweek, self-contained for the prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerGameweekSummary {
    pub manager_id: u64,
    pub name: String,
    pub manager_points: i32,
    pub bench_points: i32,
    pub league_rank: u32,
    pub previous_league_rank: u32,
    pub overall_league_points: i32,
    pub overall_fpl_points: i32,
    #[serde(serialize_with = "or_none_sentinel")]
    pub chip_used: Option<String>,
    pub number_of_transfers: u32,
    pub top_scoring_players: Vec<PlayerPoints>,
    pub lowest_scoring_players: Vec<PlayerPoints>,
    pub bench_player_points: Vec<PlayerPoints>,
    #[serde(serialize_with = "or_none_sentinel")]
    pub captain: Option<String>,
    pub team_name: String,
    pub manager: String,
    pub number_of_league_titles: u32,
    pub background: String,
}

/// The league-average opponent, built from its standings row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageSummary {
    pub name: String,
    pub manager_points: i32,
    pub league_rank: u32,
    pub previous_league_rank: u32,
    pub overall_league_points: i32,
    pub overall_fpl_points: i32,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SideReport {
    Manager(ManagerGameweekSummary),
    Average(AverageSummary),
}

impl SideReport {
    pub fn name(&self) -> &str {
        match self {
            SideReport::Manager(s) => &s.name,
            SideReport::Average(s) => &s.name,
        }
    }

    pub fn manager_points(&self) -> i32 {
        match self {
            SideReport::Manager(s) => s.manager_points,
            SideReport::Average(s) => s.manager_points,
        }
    }

    pub fn is_average(&self) -> bool {
        matches!(self, SideReport::Average(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    #[serde(rename = "match")]
    pub number: usize,
    pub team_1: SideReport,
    pub team_2: SideReport,
    pub score: String,
}

fn or_none_sentinel<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(NONE_SENTINEL))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
