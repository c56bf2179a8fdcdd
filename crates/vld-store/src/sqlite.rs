use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use vld_schemas::Shipment;

use crate::ShipmentStore;

pub const ENV_DB_URL: &str = "VLD_DATABASE_URL";

/// Connect to SQLite using VLD_DATABASE_URL.
pub async fn connect_from_env() -> Result<SqlitePool> {
    let url = std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;
    connect(&url).await
}

/// Open (creating if missing) the SQLite database at `url`.
///
/// The pool is capped at one connection: `sqlite::memory:` databases are
/// per-connection, and a single-operator tool never needs parallel writers.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid sqlite url {url}"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .context("failed to connect to SQLite")?;

    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// SQLite-backed shipment store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn decode_record(record: &str) -> Result<Shipment> {
    serde_json::from_str(record).context("failed to decode shipment record")
}

#[async_trait::async_trait]
impl ShipmentStore for SqliteStore {
    async fn put(&self, shipment: &Shipment) -> Result<()> {
        let record =
            serde_json::to_string(shipment).context("failed to encode shipment record")?;

        // Single-statement upsert: the whole record is replaced atomically.
        sqlx::query(
            r#"
            insert into shipments (id, reference_month, status, record)
            values (?1, ?2, ?3, ?4)
            on conflict(id) do update set
                reference_month = excluded.reference_month,
                status = excluded.status,
                record = excluded.record
            "#,
        )
        .bind(&shipment.id)
        .bind(&shipment.reference_month)
        .bind(shipment.status.as_str())
        .bind(&record)
        .execute(&self.pool)
        .await
        .context("put shipment failed")?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Shipment>> {
        let row = sqlx::query("select record from shipments where id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("get shipment failed")?;

        match row {
            Some(row) => {
                let record: String = row.try_get("record")?;
                Ok(Some(decode_record(&record)?))
            }
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Shipment>> {
        let rows = sqlx::query("select record from shipments order by id")
            .fetch_all(&self.pool)
            .await
            .context("get_all shipments failed")?;

        rows.iter()
            .map(|row| {
                let record: String = row.try_get("record")?;
                decode_record(&record)
            })
            .collect()
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("delete from shipments where id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete shipment failed")?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("delete from shipments")
            .execute(&self.pool)
            .await
            .context("clear shipments failed")?;
        Ok(())
    }
}
