//! Block catalog endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Block, CreateBlockRequest};
use crate::AppState;

/// POST /api/blocks - Create a new block.
pub async fn create_block(
    State(state): State<AppState>,
    Json(request): Json<CreateBlockRequest>,
) -> ApiResult<Block> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Block name is required".to_string()));
    }

    let block = state
        .catalog
        .create_block(request.name.trim(), &state.config.city)
        .await?;
    success(block)
}

/// GET /api/blocks - List active blocks in display order.
pub async fn list_blocks(State(state): State<AppState>) -> ApiResult<Vec<Block>> {
    let blocks = state.catalog.list_blocks().await?;
    success(blocks)
}
