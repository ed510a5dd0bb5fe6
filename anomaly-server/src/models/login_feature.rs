//! Login feature row as stored in `public.login_features`

use anomaly_core::TrainingRow;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct LoginFeatureRow {
    pub event_id: i64,
    pub hour_of_day: Option<f64>,
    pub minutes_since_prev: Option<f64>,
    pub geo_km_from_prev: Option<f64>,
    pub failed_15m: Option<f64>,
    pub is_night: Option<f64>,
}

impl From<LoginFeatureRow> for TrainingRow {
    fn from(row: LoginFeatureRow) -> Self {
        TrainingRow {
            event_id: row.event_id,
            hour_of_day: row.hour_of_day,
            minutes_since_prev: row.minutes_since_prev,
            geo_km_from_prev: row.geo_km_from_prev,
            failed_15m: row.failed_15m,
            is_night: row.is_night,
        }
    }
}
