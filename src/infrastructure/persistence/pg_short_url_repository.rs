//! PostgreSQL implementation of the short URL repository.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::config::Config;
use crate::domain::entities::{NewShortUrl, ShortUrlRecord, TrackingFlags};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::StoreError;

/// Name of the uniqueness constraint on the key column.
///
/// Only violations of this constraint are reported as
/// [`StoreError::DuplicateKey`]; everything else is a backend fault.
const KEY_CONSTRAINT: &str = "short_urls_key_key";

/// PostgreSQL repository for short URL storage.
///
/// The `short_urls` table carries a `UNIQUE` constraint on the key column
/// alone (see `migrations/0001_short_urls.sql`); that constraint provides
/// the atomicity the allocation protocol depends on.
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a repository with an existing connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Connects a new pool using the database settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if no database URL is configured or the
    /// connection fails.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no database URL configured"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .connect(database_url)
            .await?;

        Ok(Self::new(Arc::new(pool)))
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrlRecord, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO short_urls (
                key, destination_url, public_url, redirect_status, single_use,
                activate_at, deactivate_at,
                track_visits, track_ip_address, track_os, track_os_version,
                track_browser, track_browser_version, track_referer, track_device_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING
                id, key, destination_url, public_url, redirect_status, single_use,
                activate_at, deactivate_at,
                track_visits, track_ip_address, track_os, track_os_version,
                track_browser, track_browser_version, track_referer, track_device_type,
                created_at
            "#,
        )
        .bind(&new_short_url.key)
        .bind(&new_short_url.destination_url)
        .bind(&new_short_url.public_url)
        .bind(new_short_url.redirect_status as i16)
        .bind(new_short_url.single_use)
        .bind(new_short_url.activate_at)
        .bind(new_short_url.deactivate_at)
        .bind(new_short_url.tracking.visits)
        .bind(new_short_url.tracking.ip_address)
        .bind(new_short_url.tracking.os)
        .bind(new_short_url.tracking.os_version)
        .bind(new_short_url.tracking.browser)
        .bind(new_short_url.tracking.browser_version)
        .bind(new_short_url.tracking.referer)
        .bind(new_short_url.tracking.device_type)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_insert_error(&new_short_url.key, e))?;

        record_from_row(&row).map_err(|e| StoreError::Backend(e.into()))
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM short_urls WHERE key = $1)")
            .bind(key)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::Backend(e.into()))?;

        row.try_get::<bool, _>(0)
            .map_err(|e| StoreError::Backend(e.into()))
    }
}

fn record_from_row(row: &PgRow) -> Result<ShortUrlRecord, sqlx::Error> {
    Ok(ShortUrlRecord {
        id: row.try_get("id")?,
        key: row.try_get("key")?,
        destination_url: row.try_get("destination_url")?,
        public_url: row.try_get("public_url")?,
        redirect_status: row.try_get::<i16, _>("redirect_status")? as u16,
        single_use: row.try_get("single_use")?,
        activate_at: row.try_get("activate_at")?,
        deactivate_at: row.try_get("deactivate_at")?,
        tracking: TrackingFlags {
            visits: row.try_get("track_visits")?,
            ip_address: row.try_get("track_ip_address")?,
            os: row.try_get("track_os")?,
            os_version: row.try_get("track_os_version")?,
            browser: row.try_get("track_browser")?,
            browser_version: row.try_get("track_browser_version")?,
            referer: row.try_get("track_referer")?,
            device_type: row.try_get("track_device_type")?,
        },
        created_at: row.try_get("created_at")?,
    })
}

fn map_insert_error(key: &str, e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
        && db_err.constraint() == Some(KEY_CONSTRAINT)
    {
        return StoreError::DuplicateKey {
            key: key.to_string(),
        };
    }

    StoreError::Backend(e.into())
}
