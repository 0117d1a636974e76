//! PSDM weather tables in PostgreSQL/PostGIS.

use async_trait::async_trait;
use std::collections::HashMap;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Coordinate, WeatherRecord, PSDM_COLUMNS};
use crate::utils::constants::{COORDINATE_TABLE, WEATHER_TABLE, WGS84_SRID};
use crate::writers::WeatherSink;

const SCHEMA_SQL: &str = r#"
CREATE EXTENSION IF NOT EXISTS postgis;

CREATE TABLE IF NOT EXISTS coordinate (
    id integer PRIMARY KEY,
    coordinate geography(POINT, 4326)
);

CREATE TABLE IF NOT EXISTS weathervalue (
    time timestamptz NOT NULL,
    coordinate_id integer NOT NULL REFERENCES coordinate (id),
    aswdifd_s double precision,
    aswdir_s double precision,
    t2m double precision,
    u131m double precision,
    v131m double precision,
    PRIMARY KEY (time, coordinate_id)
)
"#;

/// Three bind parameters per coordinate, well below the 65535 limit.
const COORDINATE_CHUNK: usize = 5000;

pub struct PostgresWriter {
    pool: PgPool,
}

impl PostgresWriter {
    pub async fn connect(options: PgConnectOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rows currently in the weather table.
    pub async fn count_records(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", WEATHER_TABLE))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// `INSERT INTO weathervalue (...) ` with the PSDM column order.
fn weather_insert_prefix() -> String {
    let columns: Vec<&str> = PSDM_COLUMNS.iter().map(|(_, column)| *column).collect();
    format!("INSERT INTO {} ({}) ", WEATHER_TABLE, columns.join(", "))
}

/// Upsert clause keyed on `(time, coordinate_id)`.
fn weather_conflict_clause() -> String {
    let updates: Vec<String> = PSDM_COLUMNS
        .iter()
        .skip(2)
        .map(|(_, column)| format!("{column} = EXCLUDED.{column}"))
        .collect();
    format!(
        " ON CONFLICT (time, coordinate_id) DO UPDATE SET {}",
        updates.join(", ")
    )
}

#[async_trait]
impl WeatherSink for PostgresWriter {
    async fn prepare(&mut self) -> Result<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(&self.pool).await?;
            }
        }
        info!("PSDM tables ready");
        Ok(())
    }

    async fn write_coordinates(&mut self, coordinates: &[Coordinate]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for chunk in coordinates.chunks(COORDINATE_CHUNK) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new(format!("INSERT INTO {} (id, coordinate) ", COORDINATE_TABLE));
            builder.push_values(chunk, |mut row, coordinate| {
                let (x, y) = coordinate.xy();
                row.push_bind(coordinate.id)
                    .push("ST_SetSRID(ST_MakePoint(")
                    .push_bind_unseparated(x)
                    .push_unseparated(", ")
                    .push_bind_unseparated(y)
                    .push_unseparated(format!("), {})::geography", WGS84_SRID));
            });
            builder.push(" ON CONFLICT (id) DO NOTHING");

            written += builder.build().execute(&mut *tx).await?.rows_affected();

            let ids: Vec<i32> = chunk.iter().map(|c| c.id).collect();
            let stored: HashMap<i32, (f64, f64)> = sqlx::query_as::<_, (i32, f64, f64)>(&format!(
                "SELECT id, ST_Y(coordinate::geometry), ST_X(coordinate::geometry) \
                 FROM {} WHERE id = ANY($1)",
                COORDINATE_TABLE
            ))
            .bind(ids)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(|(id, lat, lon)| (id, (lat, lon)))
            .collect();

            for coordinate in chunk {
                if let Some((lat, lon)) = stored.get(&coordinate.id) {
                    coordinate.ensure_same_location(*lat, *lon)?;
                }
            }
        }

        tx.commit().await?;
        info!(
            inserted = written,
            existing = coordinates.len() as u64 - written,
            "Coordinates committed"
        );
        Ok(written)
    }

    async fn write_records(&mut self, records: &[WeatherRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(weather_insert_prefix());
        builder.push_values(records, |mut row, record| {
            row.push_bind(record.time)
                .push_bind(record.coordinate_id)
                .push_bind(record.diffuse_irradiance)
                .push_bind(record.direct_irradiance)
                .push_bind(record.temperature)
                .push_bind(record.wind_velocity_u)
                .push_bind(record.wind_velocity_v);
        });
        builder.push(weather_conflict_clause());

        let affected = builder.build().execute(&mut *tx).await?.rows_affected();
        tx.commit().await?;

        debug!(rows = affected, "Committed weather batch");
        Ok(affected)
    }

    async fn finish(&mut self) -> Result<()> {
        let total = self.count_records().await?;
        info!(rows = total, table = WEATHER_TABLE, "Weather table row count");
        Ok(())
    }
}
