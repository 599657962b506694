//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use rates_types::{Currency, CurrencyDirectory, CurrencyId, Rate, RepoError};

use crate::types::{DbCurrency, DbRate, map_db_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository using native DATE and NUMERIC columns.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_currencies_pg.sql"),
        "0001",
    )
    .await?;

    execute_migration(
        pool,
        include_str!("../migrations/0002_create_rates_pg.sql"),
        "0002",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl CurrencyDirectory for PostgresRepo {
    async fn find_by_abbreviation(
        &self,
        abbreviation: &str,
    ) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> = sqlx::query_as(
            r#"SELECT id, abbreviation, name, scale FROM currencies WHERE abbreviation = $1"#,
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
               FROM rates WHERE currency_id = $1 AND rate_date = $2"#,
        )
        .bind(currency_id.value())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(DbRate::into_domain).transpose()
    }

    async fn save_rate(&self, rate: Rate) -> Result<Rate, RepoError> {
        let row: DbRate = sqlx::query_as(
            r#"INSERT INTO rates (currency_id, rate_date, official_rate, scale)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (currency_id, rate_date)
               DO UPDATE SET official_rate = EXCLUDED.official_rate, scale = EXCLUDED.scale
               RETURNING id, currency_id, rate_date, official_rate, scale"#,
        )
        .bind(rate.currency_id.value())
        .bind(rate.date)
        .bind(rate.official_rate)
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
               FROM rates WHERE currency_id = $1 ORDER BY rate_date DESC"#,
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
            sqlx::query(r#"DELETE FROM currencies WHERE abbreviation = $1 AND id <> $2"#)
                .bind(&currency.abbreviation)
                .bind(currency.id.value())
                .execute(&mut *db_tx)
                .await
                .map_err(map_db_error)?;

            let result = sqlx::query(
                r#"INSERT INTO currencies (id, abbreviation, name, scale) VALUES ($1, $2, $3, $4)
                   ON CONFLICT (id)
                   DO UPDATE SET abbreviation = EXCLUDED.abbreviation, name = EXCLUDED.name, scale = EXCLUDED.scale"#,
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
