// Wire types for the draft-league backend API.
//
// Everything here mirrors the backend's JSON shapes: camelCase field names,
// 1-indexed pagination, optional fields where the backend omits them. These
// are deserialization targets only; presentation structures live in the
// `derive` modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pagination envelope
// ---------------------------------------------------------------------------

/// Envelope returned by every paginated list endpoint.
///
/// Backend invariants: `data.len() <= page_size`,
/// `total_pages == ceil(total / page_size)` (0 when `total == 0`),
/// `page >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Page count the envelope should carry for its `total`/`page_size`.
    pub fn expected_total_pages(&self) -> u32 {
        if self.total == 0 || self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size as u64) as u32
    }
}

// ---------------------------------------------------------------------------
// Users and auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// League / season / team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: i64,
    pub league_id: i64,
    pub name: String,
    /// Backend lifecycle state, e.g. "DRAFTING", "ACTIVE", "FINISHED".
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub season_id: i64,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub pokemon_ids: Vec<i64>,
}

/// Create/update payload for leagues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaguePayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Create/update payload for seasons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPayload {
    pub league_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Create/update payload for teams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    pub season_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pokemon_ids: Vec<i64>,
}

/// Update payload for users (admin screens).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Pokemon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PokemonStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub id: i64,
    pub name: String,
    pub types: Vec<String>,
    pub stats: PokemonStats,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub generation: Option<u32>,
}

/// Damage class of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    /// Fixed presentation order: Physical, Special, Status.
    pub const ORDERED: [MoveCategory; 3] = [
        MoveCategory::Physical,
        MoveCategory::Special,
        MoveCategory::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MoveCategory::Physical => "Physical",
            MoveCategory::Special => "Special",
            MoveCategory::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    pub id: i64,
    pub name: String,
    /// Pokemon type of the move. Absent for moves the backend has not typed;
    /// such moves are skipped by the by-type grouping.
    #[serde(default, rename = "type")]
    pub move_type: Option<String>,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
    /// Orthogonal tags (signature move groups and the like). Empty means the
    /// move appears in no special-category grouping.
    #[serde(default)]
    pub special_categories: Vec<String>,
}

/// One row of a Pokemon's defensive type chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeEffectivenessEntry {
    pub attacking_type: String,
    pub multiplier: f64,
}

/// Payload of the per-Pokemon detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetail {
    pub pokemon: Pokemon,
    #[serde(default)]
    pub moves: Vec<MoveInfo>,
    #[serde(default)]
    pub effectiveness: Vec<TypeEffectivenessEntry>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
