//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use rates_types::{Currency, CurrencyDirectory, CurrencyId, Rate, RepoError};

use crate::types::{DbCurrency, DbRate, date_to_text, map_db_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl_currencies = include_str!("../migrations/0001_create_currencies.sql");
        sqlx::query(ddl_currencies)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let ddl_rates = include_str!("../migrations/0002_create_rates.sql");
        sqlx::query(ddl_rates)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CurrencyDirectory for SqliteRepo {
    async fn find_by_abbreviation(
        &self,
        abbreviation: &str,
    ) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> = sqlx::query_as(
            r#"SELECT id, abbreviation, name, scale FROM currencies WHERE abbreviation = ?"#,
        )
        .bind(abbreviation)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(DbCurrency::into_domain))
    }

    async fn find_rate(
        &self,
        currency_id: CurrencyId,
        date: NaiveDate,
    ) -> Result<Option<Rate>, RepoError> {
        let row: Option<DbRate> = sqlx::query_as(
            r#"SELECT id, currency_id, rate_date, official_rate, scale
               FROM rates WHERE currency_id = ? AND rate_date = ?"#,
        )
        .bind(currency_id.value())
        .bind(date_to_text(date))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(DbRate::into_domain).transpose()
    }

    async fn save_rate(&self, rate: Rate) -> Result<Rate, RepoError> {
        let row: DbRate = sqlx::query_as(
            r#"INSERT INTO rates (currency_id, rate_date, official_rate, scale)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (currency_id, rate_date)
               DO UPDATE SET official_rate = excluded.official_rate, scale = excluded.scale
               RETURNING id, currency_id, rate_date, official_rate, scale"#,
        )
        .bind(rate.currency_id.value())
        .bind(date_to_text(rate.date))
        .bind(rate.official_rate.to_string())
        .bind(rate.scale)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.into_domain()
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError> {
        let rows: Vec<DbCurrency> = sqlx::query_as(
            r#"SELECT id, abbreviation, name, scale FROM currencies ORDER BY abbreviation"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(DbCurrency::into_domain).collect())
    }

    async fn list_rates(&self, currency_id: CurrencyId) -> Result<Vec<Rate>, RepoError> {
        let rows: Vec<DbRate> = sqlx::query_as(
            r#"SELECT id, currency_id, rate_date, official_rate, scale
               FROM rates WHERE currency_id = ? ORDER BY rate_date DESC"#,
        )
        .bind(currency_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(DbRate::into_domain).collect()
    }

    async fn upsert_currencies(&self, currencies: Vec<Currency>) -> Result<usize, RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let mut written = 0;
        for currency in &currencies {
            // An abbreviation moved to a new id retires the old id and its rates
            sqlx::query(r#"DELETE FROM currencies WHERE abbreviation = ? AND id <> ?"#)
                .bind(&currency.abbreviation)
                .bind(currency.id.value())
                .execute(&mut *db_tx)
                .await
                .map_err(map_db_error)?;

            let result = sqlx::query(
                r#"INSERT INTO currencies (id, abbreviation, name, scale) VALUES (?, ?, ?, ?)
                   ON CONFLICT (id)
                   DO UPDATE SET abbreviation = excluded.abbreviation, name = excluded.name, scale = excluded.scale"#,
            )
            .bind(currency.id.value())
            .bind(&currency.abbreviation)
            .bind(&currency.name)
            .bind(currency.scale)
            .execute(&mut *db_tx)
            .await
            .map_err(map_db_error)?;

            written += result.rows_affected() as usize;
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(written)
    }
}
