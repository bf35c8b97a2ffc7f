use crate::errors::Result;
use crate::metrics::{DB_FAILURES_TOTAL, DB_LATENCY_SECONDS, READINGS_STORED_TOTAL};
use crate::model::{NewReading, SensorPayload, SensorReading};
use crate::validate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Number of rows returned by the telemetry egress query.
pub const RECENT_LIMIT: u32 = 20;

/// Opens the store lazily; connection errors surface on first use.
pub fn make_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy_with(options);

    Ok(pool)
}

/// Creates the readings table if it does not exist yet. Safe to run repeatedly.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations completed");
    Ok(())
}

/// Stores one row per present field of `payload`, all in one transaction.
pub async fn record_readings(pool: &SqlitePool, payload: &SensorPayload) -> Result<usize> {
    let readings = validate::readings(payload)?;
    insert_readings(pool, &readings).await
}

pub async fn insert_readings(pool: &SqlitePool, readings: &[NewReading]) -> Result<usize> {
    if readings.is_empty() {
        return Ok(0);
    }

    let start = Instant::now();
    match insert_readings_inner(pool, readings).await {
        Ok(()) => {
            DB_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
            READINGS_STORED_TOTAL.inc_by(readings.len() as f64);
            debug!("Stored {} readings", readings.len());
            Ok(readings.len())
        }
        Err(e) => {
            DB_FAILURES_TOTAL.inc();
            error!("Failed to store {} readings: {}", readings.len(), e);
            Err(e)
        }
    }
}

async fn insert_readings_inner(pool: &SqlitePool, readings: &[NewReading]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for reading in readings {
        sqlx::query("INSERT INTO sensor_readings (sensor_type, value) VALUES (?, ?)")
            .bind(reading.sensor.as_str())
            .bind(reading.value)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Most recent readings, newest first. Rows sharing a timestamp come back in
/// reverse insertion order.
pub async fn recent_readings(pool: &SqlitePool, limit: u32) -> Result<Vec<SensorReading>> {
    let start = Instant::now();

    let rows = sqlx::query_as::<_, SensorReading>(
        "SELECT id, ts AS timestamp, sensor_type, value
         FROM sensor_readings
         ORDER BY ts DESC, id DESC
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        DB_FAILURES_TOTAL.inc();
        error!("Failed to read recent readings: {}", e);
        e
    })?;

    DB_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
    Ok(rows)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // A single connection that never idles out keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}
