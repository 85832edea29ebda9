//! Allocation models: the persisted fact that a team occupies a seat.

use serde::{Deserialize, Serialize};

/// The assignment of one seat to one team.
///
/// Block, room and seat names are captured at allocation time; later renames
/// do not rewrite existing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: String,
    pub team_id: String,
    pub seat_id: String,
    pub room_id: String,
    pub block_id: String,
    pub block_name: String,
    pub room_name: String,
    pub seat_label: String,
    /// Checked-in headcount at the moment of allocation.
    pub team_size: i64,
    /// Volunteer who performed the allocation; opaque, not validated.
    pub allocated_by: String,
    pub allocated_at: String,
}

/// Request body for allocating a seat to a team.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateSeatRequest {
    pub team_id: String,
    pub volunteer_id: String,
}

/// Per-room slice of the allocation stats view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub block_name: String,
    pub room_name: String,
    pub capacity: i64,
    pub current_occupancy: i64,
    pub available_seats: i64,
}

/// Aggregate allocation view. Computed from an unsynchronized snapshot and
/// may be slightly stale under concurrent allocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStats {
    pub total_seats: i64,
    pub available_seats: i64,
    pub allocated_teams: i64,
    /// Sum of team sizes across all allocations.
    pub seated_participants: i64,
    pub rooms: Vec<RoomOccupancy>,
}
