use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Binding of a guard to a site and shift for a period. Attendance is
/// always recorded against an assignment, never directly against a site.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "tenant_id": 1,
        "guard_id": 1,
        "site_id": 7,
        "shift_name": "Night",
        "start_date": "2026-01-01",
        "end_date": null,
        "status": "active"
    })
)]
pub struct GuardAssignment {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = 1)]
    pub guard_id: u64,

    #[schema(example = 7)]
    pub site_id: u64,

    #[schema(example = "Night")]
    pub shift_name: String,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-06-30", value_type = String, format = "date", nullable = true)]
    pub end_date: Option<NaiveDate>,

    #[schema(example = "active")]
    pub status: String,
}
