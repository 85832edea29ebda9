//! Room model: a bookable space within a block.

use serde::{Deserialize, Serialize};

/// A room inside a block, grouping seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub block_id: String,
    pub name: String,
    /// Informational seat count, set by grid generation.
    pub capacity: i64,
    /// Denormalized running counter of seated participants.
    /// Updated only inside allocation and release transactions.
    pub current_occupancy: i64,
    /// Position in deterministic placement order, scoped to the block.
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: String,
}

/// Request body for creating a new room.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub block_id: String,
    pub name: String,
}

/// One room's occupancy counter after reconciliation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputedRoom {
    pub room_id: String,
    pub room_name: String,
    /// Counter value before the recompute.
    pub previous_occupancy: i64,
    /// Sum of allocated team sizes for seats in this room.
    pub recomputed_occupancy: i64,
}
