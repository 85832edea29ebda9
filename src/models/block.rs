//! Block model: a building or zone grouping rooms.

use serde::{Deserialize, Serialize};

/// A physical building or zone within the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub name: String,
    pub city: String,
    /// Position in deterministic placement order (lower first).
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: String,
}

/// Request body for creating a new block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockRequest {
    pub name: String,
}
