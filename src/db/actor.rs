use crate::db::models::DbItemMeta;
use crate::db::schema::SQLITE_INIT;
use crate::error::GeomarkError;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub enum DbActorMessage {
    /// Fetch one metadata row by (item_id, meta_key).
    GetMeta(
        i64,
        String,
        RpcReplyPort<Result<Option<DbItemMeta>, GeomarkError>>,
    ),

    /// Insert or overwrite one metadata value (JSON text).
    UpsertMeta(i64, String, String, RpcReplyPort<Result<(), GeomarkError>>),

    /// Remove one metadata row; replies whether a row existed.
    DeleteMeta(i64, String, RpcReplyPort<Result<bool, GeomarkError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn get_meta(
        &self,
        item_id: i64,
        meta_key: &str,
    ) -> Result<Option<DbItemMeta>, GeomarkError> {
        ractor::call!(
            self.actor,
            DbActorMessage::GetMeta,
            item_id,
            meta_key.to_string()
        )
        .map_err(|e| GeomarkError::RactorError(format!("DbActor GetMeta RPC failed: {e}")))?
    }

    pub async fn upsert_meta(
        &self,
        item_id: i64,
        meta_key: &str,
        meta_value: String,
    ) -> Result<(), GeomarkError> {
        ractor::call!(
            self.actor,
            DbActorMessage::UpsertMeta,
            item_id,
            meta_key.to_string(),
            meta_value
        )
        .map_err(|e| GeomarkError::RactorError(format!("DbActor UpsertMeta RPC failed: {e}")))?
    }

    pub async fn delete_meta(&self, item_id: i64, meta_key: &str) -> Result<bool, GeomarkError> {
        ractor::call!(
            self.actor,
            DbActorMessage::DeleteMeta,
            item_id,
            meta_key.to_string()
        )
        .map_err(|e| GeomarkError::RactorError(format!("DbActor DeleteMeta RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::GetMeta(item_id, key, reply) => {
                let res = self.get_meta(&state.pool, item_id, &key).await;
                let _ = reply.send(res);
            }
            DbActorMessage::UpsertMeta(item_id, key, value, reply) => {
                let res = self.upsert_meta(&state.pool, item_id, &key, value).await;
                let _ = reply.send(res);
            }
            DbActorMessage::DeleteMeta(item_id, key, reply) => {
                let res = self.delete_meta(&state.pool, item_id, &key).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn get_meta(
        &self,
        pool: &SqlitePool,
        item_id: i64,
        meta_key: &str,
    ) -> Result<Option<DbItemMeta>, GeomarkError> {
        let row = sqlx::query_as::<_, DbItemMeta>(
            r#"
        SELECT id, item_id, meta_key, meta_value, updated_at
        FROM item_meta
        WHERE item_id = ? AND meta_key = ?
        "#,
        )
        .bind(item_id)
        .bind(meta_key)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    async fn upsert_meta(
        &self,
        pool: &SqlitePool,
        item_id: i64,
        meta_key: &str,
        meta_value: String,
    ) -> Result<(), GeomarkError> {
        let now = Utc::now();
        sqlx::query(
            r#"
        INSERT INTO item_meta (item_id, meta_key, meta_value, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(item_id, meta_key) DO UPDATE SET
            meta_value = excluded.meta_value,
            updated_at = excluded.updated_at
        "#,
        )
        .bind(item_id)
        .bind(meta_key)
        .bind(meta_value)
        .bind(now)
        .execute(pool)
        .await?;

        debug!(item_id, meta_key, "item meta upserted");
        Ok(())
    }

    async fn delete_meta(
        &self,
        pool: &SqlitePool,
        item_id: i64,
        meta_key: &str,
    ) -> Result<bool, GeomarkError> {
        let res = sqlx::query("DELETE FROM item_meta WHERE item_id = ? AND meta_key = ?")
            .bind(item_id)
            .bind(meta_key)
            .execute(pool)
            .await?;

        let removed = res.rows_affected() > 0;
        debug!(item_id, meta_key, removed, "item meta delete");
        Ok(removed)
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// The actor is unnamed so several stores can coexist in one process.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, GeomarkError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| GeomarkError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), GeomarkError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
