//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for the venue catalog and allocation records.
//! The `checkins` table is written by the external check-in subsystem; this
//! service only reads it to resolve team sizes.

mod allocation;
mod catalog;

pub use allocation::*;
pub use catalog::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blocks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            display_order INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rooms (
            id TEXT PRIMARY KEY,
            block_id TEXT NOT NULL REFERENCES blocks(id),
            name TEXT NOT NULL,
            capacity INTEGER NOT NULL DEFAULT 0,
            current_occupancy INTEGER NOT NULL DEFAULT 0,
            display_order INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seats (
            id TEXT PRIMARY KEY,
            room_id TEXT NOT NULL REFERENCES rooms(id),
            row_number INTEGER NOT NULL,
            column_number INTEGER NOT NULL,
            seat_label TEXT NOT NULL,
            team_size_preference INTEGER,
            is_available INTEGER NOT NULL DEFAULT 1,
            is_active INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS allocations (
            id TEXT PRIMARY KEY,
            team_id TEXT NOT NULL UNIQUE,
            seat_id TEXT NOT NULL UNIQUE,
            room_id TEXT NOT NULL,
            block_id TEXT NOT NULL,
            block_name TEXT NOT NULL,
            room_name TEXT NOT NULL,
            seat_label TEXT NOT NULL,
            team_size INTEGER NOT NULL,
            allocated_by TEXT NOT NULL,
            allocated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Written by the check-in subsystem; read here for team-size resolution.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checkins (
            id TEXT PRIMARY KEY,
            team_id TEXT NOT NULL,
            participant_id TEXT NOT NULL,
            checked_in_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_rooms_block ON rooms(block_id);
        CREATE INDEX IF NOT EXISTS idx_seats_room ON seats(room_id);
        CREATE INDEX IF NOT EXISTS idx_seats_available ON seats(is_available);
        CREATE INDEX IF NOT EXISTS idx_checkins_team ON checkins(team_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
