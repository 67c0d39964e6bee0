use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One attendance record per (guard, assignment, date) under normal flow.
/// Created on check-in, mutated once on check-out, never deleted.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct GuardAttendance {
    #[schema(example = 101)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = 1)]
    pub guard_id: u64,

    #[schema(example = 42)]
    pub assignment_id: u64,

    #[schema(example = "2026-02-10", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,

    /// Wall-clock time in the app time zone, no zone marker.
    #[schema(example = "2026-02-10T08:01:12", value_type = String, nullable = true)]
    pub check_in_time: Option<NaiveDateTime>,

    /// "lat,lon" with six decimal places.
    #[schema(example = "12.971600,77.594600", nullable = true)]
    pub check_in_location: Option<String>,

    #[schema(example = "2026-02-10T20:03:40", value_type = String, nullable = true)]
    pub check_out_time: Option<NaiveDateTime>,

    #[schema(example = "12.971800,77.594600", nullable = true)]
    pub check_out_location: Option<String>,

    #[schema(example = "Present")]
    pub status: String,

    #[schema(example = "[Check-in: gate B] [Check-out: relieved by day shift]", nullable = true)]
    pub remarks: Option<String>,
}
