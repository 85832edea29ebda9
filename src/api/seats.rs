//! Seat catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{GenerateGridRequest, Seat, SetSizePreferenceRequest, SizePreferenceResult};
use crate::AppState;

/// POST /api/rooms/:id/seats/grid - Regenerate a room's seat grid.
///
/// Replaces any existing seats in the room.
pub async fn generate_seat_grid(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<GenerateGridRequest>,
) -> ApiResult<Vec<Seat>> {
    if request.rows < 1 || request.cols < 1 {
        return Err(AppError::Validation(
            "Grid dimensions must be at least 1x1".to_string(),
        ));
    }

    let seats = state
        .catalog
        .generate_seat_grid(&room_id, request.rows, request.cols)
        .await?;
    success(seats)
}

/// GET /api/rooms/:id/seats - List a room's active seats in grid order.
pub async fn list_seats(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> ApiResult<Vec<Seat>> {
    let seats = state.catalog.list_seats(&room_id).await?;
    success(seats)
}

/// PUT /api/seats/size-preference - Bulk-tag seats with a team-size
/// preference, or clear it with a null team size.
pub async fn set_seat_size_preference(
    State(state): State<AppState>,
    Json(request): Json<SetSizePreferenceRequest>,
) -> ApiResult<SizePreferenceResult> {
    if request.seat_ids.is_empty() {
        return Err(AppError::Validation("No seat ids provided".to_string()));
    }
    if let Some(team_size) = request.team_size {
        if team_size < 1 {
            return Err(AppError::Validation(
                "Team size preference must be at least 1".to_string(),
            ));
        }
    }

    let updated_seats = state
        .catalog
        .set_seat_size_preference(&request.seat_ids, request.team_size)
        .await?;
    success(SizePreferenceResult { updated_seats })
}
