//! Venue catalog repository: blocks, rooms and seat grids.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Block, Room, Seat};

/// Repository for the Block -> Room -> Seat hierarchy.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== BLOCK OPERATIONS ====================

    /// Create a new block with the next global display order.
    ///
    /// The city comes from configuration; the deployment supports one city.
    pub async fn create_block(&self, name: &str, city: &str) -> Result<Block, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query("SELECT COALESCE(MAX(display_order), 0) AS max_order FROM blocks")
            .fetch_one(&self.pool)
            .await?;
        let display_order: i64 = row.get::<i64, _>("max_order") + 1;

        sqlx::query(
            "INSERT INTO blocks (id, name, city, display_order, is_active, created_at) VALUES (?, ?, ?, ?, 1, ?)"
        )
        .bind(&id)
        .bind(name)
        .bind(city)
        .bind(display_order)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Block {
            id,
            name: name.to_string(),
            city: city.to_string(),
            display_order,
            is_active: true,
            created_at: now,
        })
    }

    /// List active blocks in display order.
    pub async fn list_blocks(&self) -> Result<Vec<Block>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, city, display_order, is_active, created_at FROM blocks WHERE is_active = 1 ORDER BY display_order"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(block_from_row).collect())
    }

    // ==================== ROOM OPERATIONS ====================

    /// Create a new room with the next display order scoped to its block.
    pub async fn create_room(&self, block_id: &str, name: &str) -> Result<Room, AppError> {
        let block = sqlx::query("SELECT id FROM blocks WHERE id = ? AND is_active = 1")
            .bind(block_id)
            .fetch_optional(&self.pool)
            .await?;
        if block.is_none() {
            return Err(AppError::NotFound(format!("Block {} not found", block_id)));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(
            "SELECT COALESCE(MAX(display_order), 0) AS max_order FROM rooms WHERE block_id = ?",
        )
        .bind(block_id)
        .fetch_one(&self.pool)
        .await?;
        let display_order: i64 = row.get::<i64, _>("max_order") + 1;

        sqlx::query(
            "INSERT INTO rooms (id, block_id, name, capacity, current_occupancy, display_order, is_active, created_at) VALUES (?, ?, ?, 0, 0, ?, 1, ?)"
        )
        .bind(&id)
        .bind(block_id)
        .bind(name)
        .bind(display_order)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Room {
            id,
            block_id: block_id.to_string(),
            name: name.to_string(),
            capacity: 0,
            current_occupancy: 0,
            display_order,
            is_active: true,
            created_at: now,
        })
    }

    /// List a block's active rooms in display order.
    pub async fn list_rooms(&self, block_id: &str) -> Result<Vec<Room>, AppError> {
        let rows = sqlx::query(
            "SELECT id, block_id, name, capacity, current_occupancy, display_order, is_active, created_at FROM rooms WHERE block_id = ? AND is_active = 1 ORDER BY display_order"
        )
        .bind(block_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(room_from_row).collect())
    }

    // ==================== SEAT OPERATIONS ====================

    /// Regenerate a room's seat grid.
    ///
    /// Replaces all existing seats in the room unconditionally and sets the
    /// room capacity to `rows * cols`. Seats are labeled row-letter plus
    /// 1-based column ("A1" ... "C4"); rows past 26 fall back to a "RowN"
    /// prefix. All new seats start available, active and without a size
    /// preference.
    pub async fn generate_seat_grid(
        &self,
        room_id: &str,
        rows: i64,
        cols: i64,
    ) -> Result<Vec<Seat>, AppError> {
        let mut tx = self.pool.begin().await?;

        let room = sqlx::query("SELECT id FROM rooms WHERE id = ? AND is_active = 1")
            .bind(room_id)
            .fetch_optional(&mut *tx)
            .await?;
        if room.is_none() {
            return Err(AppError::NotFound(format!("Room {} not found", room_id)));
        }

        sqlx::query("DELETE FROM seats WHERE room_id = ?")
            .bind(room_id)
            .execute(&mut *tx)
            .await?;

        let mut seats = Vec::with_capacity((rows * cols) as usize);
        for row_number in 1..=rows {
            for column_number in 1..=cols {
                let id = uuid::Uuid::new_v4().to_string();
                let seat_label = format!("{}{}", row_prefix(row_number), column_number);

                sqlx::query(
                    "INSERT INTO seats (id, room_id, row_number, column_number, seat_label, team_size_preference, is_available, is_active) VALUES (?, ?, ?, ?, ?, NULL, 1, 1)"
                )
                .bind(&id)
                .bind(room_id)
                .bind(row_number)
                .bind(column_number)
                .bind(&seat_label)
                .execute(&mut *tx)
                .await?;

                seats.push(Seat {
                    id,
                    room_id: room_id.to_string(),
                    row_number,
                    column_number,
                    seat_label,
                    team_size_preference: None,
                    is_available: true,
                    is_active: true,
                });
            }
        }

        sqlx::query("UPDATE rooms SET capacity = ? WHERE id = ?")
            .bind(rows * cols)
            .bind(room_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(seats)
    }

    /// Bulk-tag seats with a preferred team size, or clear the tag with `None`.
    ///
    /// Returns the number of seats updated.
    pub async fn set_seat_size_preference(
        &self,
        seat_ids: &[String],
        team_size: Option<i64>,
    ) -> Result<u64, AppError> {
        if seat_ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; seat_ids.len()].join(", ");
        let sql = format!(
            "UPDATE seats SET team_size_preference = ? WHERE id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(team_size);
        for seat_id in seat_ids {
            query = query.bind(seat_id);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// List a room's active seats in grid order (row, then column).
    pub async fn list_seats(&self, room_id: &str) -> Result<Vec<Seat>, AppError> {
        let rows = sqlx::query(
            "SELECT id, room_id, row_number, column_number, seat_label, team_size_preference, is_available, is_active FROM seats WHERE room_id = ? AND is_active = 1 ORDER BY row_number, column_number"
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(seat_from_row).collect())
    }
}

/// Row label prefix: "A".."Z" for the first 26 rows, "RowN" beyond.
fn row_prefix(row_number: i64) -> String {
    if (1..=26).contains(&row_number) {
        let letter = (b'A' + (row_number - 1) as u8) as char;
        letter.to_string()
    } else {
        format!("Row{}", row_number)
    }
}

// Helper functions for row conversion

fn block_from_row(row: &sqlx::sqlite::SqliteRow) -> Block {
    let is_active: i64 = row.get("is_active");
    Block {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        display_order: row.get("display_order"),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
    }
}

fn room_from_row(row: &sqlx::sqlite::SqliteRow) -> Room {
    let is_active: i64 = row.get("is_active");
    Room {
        id: row.get("id"),
        block_id: row.get("block_id"),
        name: row.get("name"),
        capacity: row.get("capacity"),
        current_occupancy: row.get("current_occupancy"),
        display_order: row.get("display_order"),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
    }
}

fn seat_from_row(row: &sqlx::sqlite::SqliteRow) -> Seat {
    let is_available: i64 = row.get("is_available");
    let is_active: i64 = row.get("is_active");
    Seat {
        id: row.get("id"),
        room_id: row.get("room_id"),
        row_number: row.get("row_number"),
        column_number: row.get("column_number"),
        seat_label: row.get("seat_label"),
        team_size_preference: row.get("team_size_preference"),
        is_available: is_available != 0,
        is_active: is_active != 0,
    }
}
