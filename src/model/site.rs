use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Geofence radius applied when a site has none configured.
pub const DEFAULT_GEOFENCE_RADIUS_M: f64 = 100.0;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "tenant_id": 1,
        "site_code": "SITE-007",
        "name": "MG Road Office Tower",
        "address": "1 MG Road, Bengaluru",
        "latitude": 12.9716,
        "longitude": 77.5946,
        "geofence_radius_m": 100.0,
        "is_active": true
    })
)]
pub struct Site {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = "SITE-007")]
    pub site_code: String,

    #[schema(example = "MG Road Office Tower")]
    pub name: String,

    #[schema(example = "1 MG Road, Bengaluru", nullable = true)]
    pub address: Option<String>,

    /// Geofence center; attendance enforcement applies only when both
    /// coordinates are set.
    #[schema(example = 12.9716, nullable = true)]
    pub latitude: Option<f64>,

    #[schema(example = 77.5946, nullable = true)]
    pub longitude: Option<f64>,

    #[schema(example = 100.0, nullable = true)]
    pub geofence_radius_m: Option<f64>,

    #[schema(example = true)]
    pub is_active: bool,
}
