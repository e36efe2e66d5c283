use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;

use super::{AssetStore, StoreError, UpdateDoc, UserStore};
use crate::model::{Asset, User};

/// Postgres-backed store. Assets are kept as JSONB documents keyed by their
/// opaque id so that partial updates can apply dot-path update documents
/// directly; users live in a plain table with a unique username.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and make sure the backing tables exist. A failure here is
    /// fatal for the caller: the process must not start serving without a
    /// reachable store.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS assets (
                id TEXT PRIMARY KEY,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }
}

#[async_trait]
impl AssetStore for PgStore {
    async fn find_all(&self) -> Result<Vec<Asset>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM assets ORDER BY (doc->>'addedAt')::bigint")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| {
                let doc: Value = row.try_get("doc").map_err(map_sqlx)?;
                decode_asset(doc)
            })
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Asset>, StoreError> {
        let row = sqlx::query("SELECT doc FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => {
                let doc: Value = row.try_get("doc").map_err(map_sqlx)?;
                decode_asset(doc).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, asset: &Asset) -> Result<(), StoreError> {
        let doc = serde_json::to_value(asset).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        sqlx::query("INSERT INTO assets (id, doc) VALUES ($1, $2)")
            .bind(&asset.id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    /// Applies the update document in a single UPDATE statement: each dot
    /// path becomes one `jsonb_set` layer, so all fields land atomically.
    async fn update_by_id(&self, id: &str, update: &UpdateDoc) -> Result<(), StoreError> {
        if update.is_empty() {
            return match self.find_by_id(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound),
            };
        }

        let mut expr = String::from("doc");
        let mut placeholder = 2;
        for _ in update {
            expr = format!("jsonb_set({}, ${}, ${}, true)", expr, placeholder, placeholder + 1);
            placeholder += 2;
        }
        let sql = format!("UPDATE assets SET doc = {} WHERE id = $1", expr);

        let mut query = sqlx::query(&sql).bind(id);
        for (path, value) in update {
            let segments: Vec<String> = path.split('.').map(str::to_string).collect();
            query = query.bind(segments).bind(Json(value.clone()));
        }

        let result = query.execute(&self.pool).await.map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, username, password) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.password)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                    StoreError::UsernameConflict(user.username.clone())
                } else {
                    map_sqlx(e)
                }
            })?;
        Ok(())
    }

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, password FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.map(decode_user).transpose()
    }

    async fn by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.map(decode_user).transpose()
    }
}

fn decode_asset(doc: Value) -> Result<Asset, StoreError> {
    serde_json::from_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn decode_user(row: sqlx::postgres::PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id").map_err(map_sqlx)?,
        username: row.try_get("username").map_err(map_sqlx)?,
        password: row.try_get("password").map_err(map_sqlx)?,
    })
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Connection(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}
