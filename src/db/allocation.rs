//! Seat allocation engine.
//!
//! Owns the allocation transaction: team-size resolution, two-tier seat
//! placement, the conditional seat reservation, occupancy bookkeeping and the
//! allocation record. The conditional update on `seats.is_available` is the
//! guard against double allocation; everything else rides in the same
//! transaction and rolls back with it.

use chrono::Utc;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Allocation, AllocationStats, RecomputedRoom, RoomOccupancy};

/// Candidate seat chosen by the placement query, with display names resolved
/// through the room/block join.
struct CandidateSeat {
    seat_id: String,
    seat_label: String,
    room_id: String,
    room_name: String,
    block_id: String,
    block_name: String,
}

/// Transactional engine for seat allocation and its read-side queries.
#[derive(Clone)]
pub struct AllocationEngine {
    pool: SqlitePool,
}

impl AllocationEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== ALLOCATION ====================

    /// Allocate a seat to a team, as one atomic transaction.
    ///
    /// Fails with `AlreadyAllocated` if the team holds a seat, `NoParticipants`
    /// if the team has no check-ins, `NoSeatsAvailable` if placement finds no
    /// candidate, and `SeatTaken` if another allocation claimed the candidate
    /// first (the caller retries the whole call for a fresh candidate).
    pub async fn allocate_seat(
        &self,
        team_id: &str,
        volunteer_id: &str,
    ) -> Result<Allocation, AppError> {
        let mut conn = self.pool.acquire().await?;

        // BEGIN IMMEDIATE takes the write lock before the candidate read, so
        // concurrent allocators queue here instead of aborting on a stale
        // snapshot. The conditional update below stays the correctness guard.
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result = match Self::try_allocate(&mut conn, team_id, volunteer_id).await {
            Ok(allocation) => sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map(|_| allocation)
                .map_err(AppError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(allocation) => {
                tracing::info!(
                    team_id,
                    seat = %allocation.seat_label,
                    room = %allocation.room_name,
                    "allocated seat"
                );
                Ok(allocation)
            }
            Err(err) => {
                // The connection must not go back to the pool mid-transaction.
                if let Err(rollback_err) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    tracing::debug!("rollback after failed allocation: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    async fn try_allocate(
        conn: &mut SqliteConnection,
        team_id: &str,
        volunteer_id: &str,
    ) -> Result<Allocation, AppError> {
        let existing = sqlx::query("SELECT id FROM allocations WHERE team_id = ?")
            .bind(team_id)
            .fetch_optional(&mut *conn)
            .await?;
        if existing.is_some() {
            return Err(AppError::AlreadyAllocated(format!(
                "Team {} already has a seat allocated",
                team_id
            )));
        }

        // Team size = checked-in headcount, captured at allocation time.
        let row = sqlx::query("SELECT COUNT(*) AS headcount FROM checkins WHERE team_id = ?")
            .bind(team_id)
            .fetch_one(&mut *conn)
            .await?;
        let team_size: i64 = row.get("headcount");
        if team_size == 0 {
            return Err(AppError::NoParticipants(format!(
                "Team {} has no checked-in participants",
                team_id
            )));
        }

        // Exact size-preference match first, then any available seat.
        let candidate = match Self::find_candidate(conn, Some(team_size)).await? {
            Some(seat) => seat,
            None => match Self::find_candidate(conn, None).await? {
                Some(seat) => seat,
                None => {
                    return Err(AppError::NoSeatsAvailable(
                        "No available seats".to_string(),
                    ))
                }
            },
        };

        // Conditional reservation: flips availability only if still available.
        let reserved =
            sqlx::query("UPDATE seats SET is_available = 0 WHERE id = ? AND is_available = 1")
                .bind(&candidate.seat_id)
                .execute(&mut *conn)
                .await?;
        if reserved.rows_affected() == 0 {
            return Err(AppError::SeatTaken(format!(
                "Seat {} was just allocated by another volunteer",
                candidate.seat_label
            )));
        }

        // Atomic increment; never read-modify-write in application code.
        sqlx::query("UPDATE rooms SET current_occupancy = current_occupancy + ? WHERE id = ?")
            .bind(team_size)
            .bind(&candidate.room_id)
            .execute(&mut *conn)
            .await?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO allocations (id, team_id, seat_id, room_id, block_id, block_name, room_name, seat_label, team_size, allocated_by, allocated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(team_id)
        .bind(&candidate.seat_id)
        .bind(&candidate.room_id)
        .bind(&candidate.block_id)
        .bind(&candidate.block_name)
        .bind(&candidate.room_name)
        .bind(&candidate.seat_label)
        .bind(team_size)
        .bind(volunteer_id)
        .bind(&now)
        .execute(&mut *conn)
        .await?;

        Ok(Allocation {
            id,
            team_id: team_id.to_string(),
            seat_id: candidate.seat_id,
            room_id: candidate.room_id,
            block_id: candidate.block_id,
            block_name: candidate.block_name,
            room_name: candidate.room_name,
            seat_label: candidate.seat_label,
            team_size,
            allocated_by: volunteer_id.to_string(),
            allocated_at: now,
        })
    }

    /// Pick the first available seat in `(block display order, room display
    /// order, row, column)` order, over active seats in active rooms and
    /// blocks. With a size preference, only seats tagged for exactly that team
    /// size are eligible.
    async fn find_candidate(
        conn: &mut SqliteConnection,
        team_size_preference: Option<i64>,
    ) -> Result<Option<CandidateSeat>, AppError> {
        let row = match team_size_preference {
            Some(team_size) => {
                sqlx::query(
                    r#"SELECT s.id AS seat_id, s.seat_label, r.id AS room_id, r.name AS room_name,
                              b.id AS block_id, b.name AS block_name
                       FROM seats s
                       JOIN rooms r ON r.id = s.room_id
                       JOIN blocks b ON b.id = r.block_id
                       WHERE s.is_available = 1 AND s.is_active = 1
                         AND r.is_active = 1 AND b.is_active = 1
                         AND s.team_size_preference = ?
                       ORDER BY b.display_order, r.display_order, s.row_number, s.column_number
                       LIMIT 1"#,
                )
                .bind(team_size)
                .fetch_optional(&mut *conn)
                .await?
            }
            None => {
                sqlx::query(
                    r#"SELECT s.id AS seat_id, s.seat_label, r.id AS room_id, r.name AS room_name,
                              b.id AS block_id, b.name AS block_name
                       FROM seats s
                       JOIN rooms r ON r.id = s.room_id
                       JOIN blocks b ON b.id = r.block_id
                       WHERE s.is_available = 1 AND s.is_active = 1
                         AND r.is_active = 1 AND b.is_active = 1
                       ORDER BY b.display_order, r.display_order, s.row_number, s.column_number
                       LIMIT 1"#,
                )
                .fetch_optional(&mut *conn)
                .await?
            }
        };

        Ok(row.map(|row| CandidateSeat {
            seat_id: row.get("seat_id"),
            seat_label: row.get("seat_label"),
            room_id: row.get("room_id"),
            room_name: row.get("room_name"),
            block_id: row.get("block_id"),
            block_name: row.get("block_name"),
        }))
    }

    /// Release a team's seat: delete the allocation record, flip the seat
    /// back to available and decrement room occupancy by the recorded team
    /// size, all in one transaction.
    pub async fn release_seat(&self, team_id: &str) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result = match Self::try_release(&mut conn, team_id).await {
            Ok(()) => sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map(|_| ())
                .map_err(AppError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                tracing::info!(team_id, "released seat");
                Ok(())
            }
            Err(err) => {
                if let Err(rollback_err) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    tracing::debug!("rollback after failed release: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    async fn try_release(conn: &mut SqliteConnection, team_id: &str) -> Result<(), AppError> {
        let row = sqlx::query("SELECT seat_id, room_id, team_size FROM allocations WHERE team_id = ?")
            .bind(team_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Team {} has no seat allocation", team_id))
            })?;

        let seat_id: String = row.get("seat_id");
        let room_id: String = row.get("room_id");
        let team_size: i64 = row.get("team_size");

        sqlx::query("DELETE FROM allocations WHERE team_id = ?")
            .bind(team_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("UPDATE seats SET is_available = 1 WHERE id = ?")
            .bind(&seat_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("UPDATE rooms SET current_occupancy = current_occupancy - ? WHERE id = ?")
            .bind(team_size)
            .bind(&room_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    // ==================== QUERIES ====================

    /// Get a team's allocation, or `None` if the team is unseated.
    pub async fn get_team_allocation(
        &self,
        team_id: &str,
    ) -> Result<Option<Allocation>, AppError> {
        let row = sqlx::query(
            "SELECT id, team_id, seat_id, room_id, block_id, block_name, room_name, seat_label, team_size, allocated_by, allocated_at FROM allocations WHERE team_id = ?"
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(allocation_from_row))
    }

    /// Aggregate allocation view over an unsynchronized snapshot.
    pub async fn allocation_stats(&self) -> Result<AllocationStats, AppError> {
        let seat_totals = sqlx::query(
            "SELECT COUNT(*) AS total, COALESCE(SUM(is_available), 0) AS available FROM seats WHERE is_active = 1"
        )
        .fetch_one(&self.pool)
        .await?;

        let allocation_totals = sqlx::query(
            "SELECT COUNT(*) AS teams, COALESCE(SUM(team_size), 0) AS participants FROM allocations"
        )
        .fetch_one(&self.pool)
        .await?;

        let room_rows = sqlx::query(
            r#"SELECT b.name AS block_name, r.name AS room_name, r.capacity, r.current_occupancy,
                      (SELECT COUNT(*) FROM seats s
                       WHERE s.room_id = r.id AND s.is_available = 1 AND s.is_active = 1) AS available_seats
               FROM rooms r
               JOIN blocks b ON b.id = r.block_id
               WHERE r.is_active = 1 AND b.is_active = 1
               ORDER BY b.display_order, r.display_order"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let rooms = room_rows
            .iter()
            .map(|row| RoomOccupancy {
                block_name: row.get("block_name"),
                room_name: row.get("room_name"),
                capacity: row.get("capacity"),
                current_occupancy: row.get("current_occupancy"),
                available_seats: row.get("available_seats"),
            })
            .collect();

        Ok(AllocationStats {
            total_seats: seat_totals.get("total"),
            available_seats: seat_totals.get("available"),
            allocated_teams: allocation_totals.get("teams"),
            seated_participants: allocation_totals.get("participants"),
            rooms,
        })
    }

    /// Rewrite every room's occupancy counter from the sum of allocated team
    /// sizes. Repair tool for counter drift; returns before/after per room.
    pub async fn recompute_occupancy(&self) -> Result<Vec<RecomputedRoom>, AppError> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            r#"SELECT r.id, r.name, r.current_occupancy,
                      COALESCE((SELECT SUM(a.team_size) FROM allocations a WHERE a.room_id = r.id), 0) AS actual
               FROM rooms r
               ORDER BY r.display_order"#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut recomputed = Vec::with_capacity(rows.len());
        for row in &rows {
            let room_id: String = row.get("id");
            let previous_occupancy: i64 = row.get("current_occupancy");
            let recomputed_occupancy: i64 = row.get("actual");

            if previous_occupancy != recomputed_occupancy {
                sqlx::query("UPDATE rooms SET current_occupancy = ? WHERE id = ?")
                    .bind(recomputed_occupancy)
                    .bind(&room_id)
                    .execute(&mut *tx)
                    .await?;
                tracing::warn!(
                    %room_id,
                    previous_occupancy,
                    recomputed_occupancy,
                    "occupancy counter drift repaired"
                );
            }

            recomputed.push(RecomputedRoom {
                room_id,
                room_name: row.get("name"),
                previous_occupancy,
                recomputed_occupancy,
            });
        }

        tx.commit().await?;

        Ok(recomputed)
    }
}

// Helper functions for row conversion

fn allocation_from_row(row: &sqlx::sqlite::SqliteRow) -> Allocation {
    Allocation {
        id: row.get("id"),
        team_id: row.get("team_id"),
        seat_id: row.get("seat_id"),
        room_id: row.get("room_id"),
        block_id: row.get("block_id"),
        block_name: row.get("block_name"),
        room_name: row.get("room_name"),
        seat_label: row.get("seat_label"),
        team_size: row.get("team_size"),
        allocated_by: row.get("allocated_by"),
        allocated_at: row.get("allocated_at"),
    }
}
