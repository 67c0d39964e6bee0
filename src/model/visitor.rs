use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct VisitorLog {
    #[schema(example = 9)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = 7)]
    pub site_id: u64,

    #[schema(example = "Anita Desai")]
    pub visitor_name: String,

    #[schema(example = "+919876501234", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "Vendor meeting", nullable = true)]
    pub purpose: Option<String>,

    #[schema(example = "Facilities desk", nullable = true)]
    pub host_name: Option<String>,

    #[schema(example = "2026-02-10T10:15:00", value_type = String)]
    pub in_time: NaiveDateTime,

    #[schema(example = "2026-02-10T11:40:00", value_type = String, nullable = true)]
    pub out_time: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct VehicleLog {
    #[schema(example = 4)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = 7)]
    pub site_id: u64,

    #[schema(example = "KA-01-AB-1234")]
    pub registration_no: String,

    #[schema(example = "Suresh", nullable = true)]
    pub driver_name: Option<String>,

    #[schema(example = "Delivery", nullable = true)]
    pub purpose: Option<String>,

    #[schema(example = "2026-02-10T09:05:00", value_type = String)]
    pub in_time: NaiveDateTime,

    #[schema(example = "2026-02-10T09:50:00", value_type = String, nullable = true)]
    pub out_time: Option<NaiveDateTime>,
}
