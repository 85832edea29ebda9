//! Seat model: the smallest allocatable unit.

use serde::{Deserialize, Serialize};

/// A single seat within a room's grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub room_id: String,
    pub row_number: i64,
    pub column_number: i64,
    /// Human-readable label, e.g. "C4".
    pub seat_label: String,
    /// Reserves this seat for teams of exactly this headcount; null = any size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size_preference: Option<i64>,
    /// The authoritative exclusivity bit. False iff an allocation holds the seat.
    pub is_available: bool,
    pub is_active: bool,
}

/// Request body for regenerating a room's seat grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateGridRequest {
    pub rows: i64,
    pub cols: i64,
}

/// Request body for bulk-tagging seats with a team-size preference.
///
/// A null `team_size` clears the tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSizePreferenceRequest {
    pub seat_ids: Vec<String>,
    #[serde(default)]
    pub team_size: Option<i64>,
}

/// Result of a bulk size-preference update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePreferenceResult {
    pub updated_seats: u64,
}
