//! PostgreSQL implementation of SessionArchiveRepository.
//!
//! One row per finished game. Summary columns are queryable; the full
//! snapshot (players, ranking, per-slide submissions) is stored as JSONB.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::game::ArchivedSession;
use crate::ports::SessionArchiveRepository;

#[derive(Clone)]
pub struct PostgresArchiveRepository {
    pool: PgPool,
}

impl PostgresArchiveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionArchiveRepository for PostgresArchiveRepository {
    async fn archive_session(&self, archive: &ArchivedSession) -> Result<bool, DomainError> {
        let snapshot = serde_json::to_value(archive).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize archived session: {}", e),
            )
        })?;

        let winner = archive
            .ranking
            .iter()
            .find(|entry| entry.rank == 1)
            .map(|entry| entry.player_id.as_uuid().to_owned());

        let result = sqlx::query(
            r#"
            INSERT INTO game_archives (
                session_id, host_id, kahoot_id, pin, player_count,
                winner_player_id, started_at, completed_at, snapshot
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (session_id) DO NOTHING
            "#,
        )
        .bind(archive.session_id.as_uuid())
        .bind(archive.host_id.as_str())
        .bind(archive.kahoot_id.as_uuid())
        .bind(&archive.pin)
        .bind(archive.players.len() as i32)
        .bind(winner)
        .bind(archive.times.started_at.as_datetime())
        .bind(archive.times.completed_at.map(|t| *t.as_datetime()))
        .bind(snapshot)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to archive session: {}", e),
            )
        })?;

        Ok(result.rows_affected() == 1)
    }
}
