//! The snapshot table.
//!
//! One table, `games(game_id TEXT PRIMARY KEY, game_type TEXT NOT NULL,
//! game_state TEXT NOT NULL)`. The payload grammar belongs to the
//! snapshot codec; this module only moves strings in and out.
//!
//! The load paths are deliberately tolerant: a row that is missing,
//! carries an unexpected type, or fails to decode reads as absent (with
//! a log), and `load_all` never fails the whole restore because of one
//! bad row. Only real I/O failures surface as errors.

use std::collections::HashMap;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use parlor_core::{GameId, GameType};
use parlor_games::{decode_snapshot, encode_snapshot, Snapshot};

use crate::StorageError;

/// Durable store of match snapshots, keyed by game id.
#[derive(Debug, Clone)]
pub struct GameRepository {
    pool: SqlitePool,
}

impl GameRepository {
    /// Opens (creating if missing) the database at `url` with a pool of
    /// the given size.
    pub async fn connect(url: &str, pool_size: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool. Used by tests and anywhere the pool's
    /// lifetime is managed elsewhere.
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for callers that need raw table access
    /// (test seeding, ad-hoc inspection).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Ensures the `games` table exists. Idempotent; the only schema
    /// migration in scope.
    pub async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS games (
                game_id TEXT PRIMARY KEY,
                game_type TEXT NOT NULL,
                game_state TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Upserts the snapshot for a game. A second save for the same id
    /// overwrites both the type and the payload.
    pub async fn save(&self, game_id: GameId, snapshot: &Snapshot) -> Result<(), StorageError> {
        let payload = encode_snapshot(snapshot)?;
        sqlx::query(
            "INSERT INTO games (game_id, game_type, game_state)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(game_id) DO UPDATE SET
                game_type = excluded.game_type,
                game_state = excluded.game_state",
        )
        .bind(game_id.to_string())
        .bind(snapshot.game_type().short_name())
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Loads the snapshot for a game, expecting the given type.
    ///
    /// Returns `None` when the row is missing, the stored type differs
    /// from the expected one, or the payload does not decode. The last
    /// two are logged, since they indicate external tampering or a version
    /// skew, not a caller mistake.
    pub async fn load(
        &self,
        game_id: GameId,
        game_type: GameType,
    ) -> Result<Option<Snapshot>, StorageError> {
        let row = sqlx::query("SELECT game_type, game_state FROM games WHERE game_id = ?1")
            .bind(game_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored_type: String = row.get("game_type");
        match stored_type.parse::<GameType>() {
            Ok(ty) if ty == game_type => {}
            _ => {
                tracing::warn!(
                    %game_id,
                    expected = %game_type,
                    stored = %stored_type,
                    "stored game type does not match, treating as absent"
                );
                return Ok(None);
            }
        }

        let payload: String = row.get("game_state");
        match decode_snapshot(game_type, &payload) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(%game_id, error = %e, "stored snapshot does not decode, treating as absent");
                Ok(None)
            }
        }
    }

    /// Loads every well-formed snapshot row.
    ///
    /// Rows with a malformed id, an unrecognized type, or an
    /// undecodable payload are skipped with a warning; a partially
    /// corrupt table must not prevent the rest from restoring.
    pub async fn load_all(&self) -> Result<HashMap<GameId, (GameType, Snapshot)>, StorageError> {
        let rows = sqlx::query("SELECT game_id, game_type, game_state FROM games")
            .fetch_all(&self.pool)
            .await?;

        let mut snapshots = HashMap::with_capacity(rows.len());
        for row in rows {
            let raw_id: String = row.get("game_id");
            let raw_type: String = row.get("game_type");

            let Ok(game_id) = raw_id.parse::<GameId>() else {
                tracing::warn!(game_id = %raw_id, "skipping row with malformed game id");
                continue;
            };
            let Ok(game_type) = raw_type.parse::<GameType>() else {
                tracing::warn!(%game_id, game_type = %raw_type, "skipping row with unrecognized game type");
                continue;
            };

            let payload: String = row.get("game_state");
            match decode_snapshot(game_type, &payload) {
                Ok(snapshot) => {
                    snapshots.insert(game_id, (game_type, snapshot));
                }
                Err(e) => {
                    tracing::warn!(%game_id, error = %e, "skipping row with undecodable snapshot");
                }
            }
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::{Player, PlayerId};
    use parlor_games::tictactoe::{GameState, Move};
    use parlor_games::GameModel;

    use super::*;

    async fn memory_repo() -> GameRepository {
        // A single connection keeps every statement on the same
        // in-memory database.
        let repo = GameRepository::connect("sqlite::memory:", 1).await.unwrap();
        repo.init().await.unwrap();
        repo
    }

    fn sample_state() -> (GameState, PlayerId) {
        let alice = Player::new(PlayerId::random(), "alice");
        let bob = Player::new(PlayerId::random(), "bob");
        let a = alice.id;
        (GameState::new_match(vec![alice, bob]).unwrap(), a)
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let repo = memory_repo().await;
        repo.init().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let repo = memory_repo().await;
        let (state, alice) = sample_state();
        let state = state.apply(alice, &Move { row: 1, col: 2 }).unwrap();
        let game_id = GameId::random();

        repo.save(game_id, &state.snapshot()).await.unwrap();

        let loaded = repo.load(game_id, GameType::TicTacToe).await.unwrap().unwrap();
        let restored = GameState::from_snapshot(loaded).unwrap();
        assert_eq!(restored.view(), state.view());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_row() {
        let repo = memory_repo().await;
        let (state, alice) = sample_state();
        let game_id = GameId::random();

        repo.save(game_id, &state.snapshot()).await.unwrap();
        let moved = state.apply(alice, &Move { row: 0, col: 0 }).unwrap();
        repo.save(game_id, &moved.snapshot()).await.unwrap();

        let loaded = repo.load(game_id, GameType::TicTacToe).await.unwrap().unwrap();
        let restored = GameState::from_snapshot(loaded).unwrap();
        assert_eq!(restored.view()["board"][0][0], "X");
    }

    #[tokio::test]
    async fn test_load_missing_row_is_none() {
        let repo = memory_repo().await;
        let loaded = repo.load(GameId::random(), GameType::TicTacToe).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_tolerates_corrupt_payload() {
        let repo = memory_repo().await;
        let game_id = GameId::random();
        sqlx::query("INSERT INTO games (game_id, game_type, game_state) VALUES (?1, ?2, ?3)")
            .bind(game_id.to_string())
            .bind("tictactoe")
            .bind("not-json")
            .execute(&repo.pool)
            .await
            .unwrap();

        let loaded = repo.load(game_id, GameType::TicTacToe).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_all_skips_bad_rows() {
        let repo = memory_repo().await;
        let (state, _) = sample_state();
        let good_id = GameId::random();
        repo.save(good_id, &state.snapshot()).await.unwrap();

        // Stored type names parse case-insensitively.
        let corrupt_id = GameId::random();
        for (id, ty, payload) in [
            (corrupt_id.to_string(), "TicTacToe", "not-json"),
            (GameId::random().to_string(), "UnknownGame", "{}"),
            ("not-a-uuid".to_string(), "tictactoe", "{}"),
        ] {
            sqlx::query("INSERT INTO games (game_id, game_type, game_state) VALUES (?1, ?2, ?3)")
                .bind(id)
                .bind(ty)
                .bind(payload)
                .execute(&repo.pool)
                .await
                .unwrap();
        }

        let all = repo.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let (ty, snapshot) = all.get(&good_id).unwrap();
        assert_eq!(*ty, GameType::TicTacToe);
        assert!(GameState::from_snapshot(snapshot.clone()).is_some());
    }

    #[tokio::test]
    async fn test_load_rejects_type_mismatch_as_none() {
        let repo = memory_repo().await;
        let game_id = GameId::random();
        sqlx::query("INSERT INTO games (game_id, game_type, game_state) VALUES (?1, ?2, ?3)")
            .bind(game_id.to_string())
            .bind("checkers")
            .bind("{}")
            .execute(&repo.pool)
            .await
            .unwrap();

        let loaded = repo.load(game_id, GameType::TicTacToe).await.unwrap();
        assert!(loaded.is_none());
    }
}
