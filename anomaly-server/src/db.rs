//! Database module - read-only access to the login feature table

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::models::LoginFeatureRow;

/// Create database connection pool
///
/// The trainer runs one query, so a single connection is enough.
pub async fn create_pool(options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Most recent `limit` rows by `ts`, returned oldest first
pub async fn fetch_training_rows(pool: &PgPool, limit: i64) -> Result<Vec<LoginFeatureRow>, sqlx::Error> {
    sqlx::query_as::<_, LoginFeatureRow>(TRAINING_ROWS_SQL)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Feature query. Columns are cast so integer, numeric and boolean
/// sources all decode the same way.
const TRAINING_ROWS_SQL: &str = r#"
SELECT event_id, hour_of_day, minutes_since_prev, geo_km_from_prev, failed_15m, is_night
FROM (
    SELECT
        event_id::int8              AS event_id,
        hour_of_day::float8         AS hour_of_day,
        minutes_since_prev::float8  AS minutes_since_prev,
        geo_km_from_prev::float8    AS geo_km_from_prev,
        failed_15m::float8          AS failed_15m,
        is_night::int::float8       AS is_night,
        ts
    FROM public.login_features
    ORDER BY ts DESC
    LIMIT $1
) AS recent
ORDER BY ts ASC
"#;
