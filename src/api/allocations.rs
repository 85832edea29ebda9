//! Seat allocation endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{AllocateSeatRequest, Allocation, AllocationStats};
use crate::AppState;

/// POST /api/allocations - Allocate a seat to a team.
pub async fn allocate_seat(
    State(state): State<AppState>,
    Json(request): Json<AllocateSeatRequest>,
) -> ApiResult<Allocation> {
    if request.team_id.trim().is_empty() {
        return Err(AppError::Validation("Team id is required".to_string()));
    }
    if request.volunteer_id.trim().is_empty() {
        return Err(AppError::Validation("Volunteer id is required".to_string()));
    }

    let allocation = state
        .allocations
        .allocate_seat(request.team_id.trim(), request.volunteer_id.trim())
        .await?;
    success(allocation)
}

/// GET /api/allocations/:team_id - Get a team's allocation.
pub async fn get_team_allocation(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<Allocation> {
    match state.allocations.get_team_allocation(&team_id).await? {
        Some(allocation) => success(allocation),
        None => Err(AppError::NotFound(format!(
            "Team {} has no seat allocation",
            team_id
        ))),
    }
}

/// DELETE /api/allocations/:team_id - Release a team's seat.
pub async fn release_seat(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<()> {
    state.allocations.release_seat(&team_id).await?;
    success(())
}

/// GET /api/allocations/stats - Aggregate allocation view.
pub async fn get_allocation_stats(State(state): State<AppState>) -> ApiResult<AllocationStats> {
    let stats = state.allocations.allocation_stats().await?;
    success(stats)
}
