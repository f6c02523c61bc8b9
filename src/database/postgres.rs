use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Asset, AssetCategory, AssetChanges, NewAsset, NewUser, User, UserChanges};
use crate::database::store::Store;

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";
const ASSET_COLUMNS: &str =
    "id, user_id, name, category, value, currency, notes, created_at, updated_at";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS assets (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        value NUMERIC(20, 2) NOT NULL,
        currency TEXT NOT NULL,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS assets_user_id_idx ON assets (user_id)",
];

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they are missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Database schema ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Translate constraint violations into domain errors
fn map_write_error(err: sqlx::Error, conflict: impl FnOnce() -> String) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DatabaseError::Conflict(conflict());
        }
        if db_err.is_foreign_key_violation() {
            return DatabaseError::NotFound("User not found".to_string());
        }
    }
    DatabaseError::Sqlx(err)
}

fn asset_from_row(row: &PgRow) -> Result<Asset, DatabaseError> {
    let category: String = row.try_get("category")?;
    Ok(Asset {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        category: category.parse::<AssetCategory>().map_err(DatabaseError::Corrupt)?,
        value: row.try_get("value")?,
        currency: row.try_get("currency")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_user(&self, input: NewUser) -> Result<User, DatabaseError> {
        let user = User::create(input);
        sqlx::query(
            "INSERT INTO users (id, name, email, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, || format!("Email '{}' is already registered", user.email)))?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = now() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let email = changes.email.clone().unwrap_or_default();
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, || format!("Email '{}' is already registered", email)))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_assets(&self, owner: Uuid) -> Result<Vec<Asset>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM assets WHERE user_id = $1 ORDER BY created_at, id",
            ASSET_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(owner).fetch_all(&self.pool).await?;
        rows.iter().map(asset_from_row).collect()
    }

    async fn get_asset(&self, owner: Uuid, id: Uuid) -> Result<Option<Asset>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM assets WHERE id = $1 AND user_id = $2",
            ASSET_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(asset_from_row).transpose()
    }

    async fn create_asset(&self, owner: Uuid, input: NewAsset) -> Result<Asset, DatabaseError> {
        let asset = Asset::create(owner, input);
        let sql = format!(
            "INSERT INTO assets (id, user_id, name, category, value, currency, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            ASSET_COLUMNS
        );
        // The column's NUMERIC scale is authoritative, so answer with the stored row
        let row = sqlx::query(&sql)
            .bind(asset.id)
            .bind(asset.user_id)
            .bind(&asset.name)
            .bind(asset.category.as_str())
            .bind(asset.value)
            .bind(&asset.currency)
            .bind(&asset.notes)
            .bind(asset.created_at)
            .bind(asset.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, || "Asset already exists".to_string()))?;
        asset_from_row(&row)
    }

    async fn update_asset(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: AssetChanges,
    ) -> Result<Option<Asset>, DatabaseError> {
        let sql = format!(
            "UPDATE assets SET \
                name = COALESCE($3, name), \
                category = COALESCE($4, category), \
                value = COALESCE($5, value), \
                currency = COALESCE($6, currency), \
                notes = COALESCE($7, notes), \
                updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {}",
            ASSET_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .bind(changes.name)
            .bind(changes.category.map(|c| c.as_str()))
            .bind(changes.value)
            .bind(changes.currency)
            .bind(changes.notes)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(asset_from_row).transpose()
    }

    async fn delete_asset(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
