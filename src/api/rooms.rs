//! Room catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateRoomRequest, RecomputedRoom, Room};
use crate::AppState;

/// POST /api/rooms - Create a new room in a block.
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> ApiResult<Room> {
    if request.block_id.trim().is_empty() {
        return Err(AppError::Validation("Block id is required".to_string()));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Room name is required".to_string()));
    }

    let room = state
        .catalog
        .create_room(request.block_id.trim(), request.name.trim())
        .await?;
    success(room)
}

/// GET /api/blocks/:id/rooms - List a block's active rooms in display order.
pub async fn list_rooms(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
) -> ApiResult<Vec<Room>> {
    let rooms = state.catalog.list_rooms(&block_id).await?;
    success(rooms)
}

/// POST /api/rooms/occupancy/recompute - Rebuild occupancy counters from
/// allocation records.
pub async fn recompute_occupancy(State(state): State<AppState>) -> ApiResult<Vec<RecomputedRoom>> {
    let rooms = state.allocations.recompute_occupancy().await?;
    success(rooms)
}
