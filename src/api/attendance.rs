use crate::auth::auth::AuthUser;
use crate::model::attendance::GuardAttendance;
use crate::model::site::DEFAULT_GEOFENCE_RADIUS_M;
use crate::models::ApiEnvelope;
use crate::utils::{app_time, geo, site_cache};
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Single message for all "record missing / wrong guard / wrong tenant /
/// already checked out" cases so callers cannot probe which one failed.
const CHECK_OUT_NOT_FOUND: &str = "Attendance record not found or already checked out";
const ASSIGNMENT_NOT_FOUND: &str = "Assignment not found";
const SITE_NOT_CONFIGURED: &str = "Site location is not configured";

#[derive(Deserialize, ToSchema)]
pub struct CheckInReq {
    #[schema(example = 42)]
    pub assignment_id: u64,
    #[schema(example = 12.9716)]
    pub latitude: f64,
    #[schema(example = 77.5946)]
    pub longitude: f64,
    /// RFC3339 with offset (converted to the app time zone) or a naive
    /// "YYYY-MM-DDTHH:MM:SS" already in the app time zone.
    #[schema(example = "2026-02-10T02:31:12Z", nullable = true)]
    pub check_in_time: Option<String>,
    #[schema(example = "gate B", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOutReq {
    #[schema(example = 101)]
    pub attendance_id: u64,
    #[schema(example = 12.9718)]
    pub latitude: f64,
    #[schema(example = 77.5946)]
    pub longitude: f64,
    #[schema(example = "2026-02-10T14:33:40Z", nullable = true)]
    pub check_out_time: Option<String>,
    #[schema(example = "relieved by day shift", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendanceReq {
    #[schema(example = 1)]
    pub guard_id: u64,
    #[schema(example = 42)]
    pub assignment_id: u64,
    #[schema(example = "2026-02-10", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,
    #[schema(example = "Absent")]
    pub status: String,
    #[schema(example = "no-show, site informed", nullable = true)]
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub guard_id: Option<u64>,
    pub assignment_id: Option<u64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<GuardAttendance>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 57)]
    pub total: i64,
}

/// Administrative statuses a record can be marked with.
const MARK_STATUSES: [&str; 4] = ["Present", "Absent", "Leave", "Holiday"];

// -------------------- pure rules --------------------

pub enum GeofenceCheck {
    Within,
    Outside { distance_m: f64, radius_m: f64 },
}

/// Non-strict boundary: exactly at the radius is inside.
pub fn check_geofence(
    site_lat: f64,
    site_lon: f64,
    radius_m: Option<f64>,
    lat: f64,
    lon: f64,
) -> GeofenceCheck {
    let radius_m = radius_m.unwrap_or(DEFAULT_GEOFENCE_RADIUS_M);
    let distance_m = geo::haversine_distance_m(site_lat, site_lon, lat, lon);
    if distance_m <= radius_m {
        GeofenceCheck::Within
    } else {
        GeofenceCheck::Outside {
            distance_m,
            radius_m,
        }
    }
}

pub fn geofence_reject_message(distance_m: f64, radius_m: f64) -> String {
    format!(
        "You are {} away from the site (allowed: {:.0} m)",
        geo::format_distance(distance_m),
        radius_m
    )
}

/// A client timestamp arrives either UTC-tagged (RFC3339 with offset,
/// converted into the app zone) or naive (used as-is).
pub fn resolve_client_time(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(tagged) = DateTime::parse_from_rfc3339(raw) {
        return Ok(app_time::utc_to_app_tz(tagged.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("Unrecognized timestamp: {}", raw))
}

/// Append notes to the remarks field with a bracketed tag.
pub fn append_remark(existing: Option<String>, tag: &str, notes: Option<&str>) -> Option<String> {
    let notes = match notes.map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => return existing,
    };
    let tagged = format!("[{}: {}]", tag, notes);
    match existing {
        Some(r) if !r.trim().is_empty() => Some(format!("{} {}", r.trim_end(), tagged)),
        _ => Some(tagged),
    }
}

// -------------------- handlers --------------------

#[derive(sqlx::FromRow)]
struct OpenAttendanceRow {
    id: u64,
    assignment_id: u64,
    remarks: Option<String>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInReq,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "success": true, "message": "Checked in successfully", "data": null
        })),
        (status = 400, description = "Already checked in, geofence violation or bad assignment", body = Object, example = json!({
            "success": false, "message": "Already checked in today", "data": null
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckInReq>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let guard_id = auth.require_guard()?;

    // Attendance is always scoped through an assignment
    let site_id = sqlx::query_scalar::<_, u64>(
        r#"
        SELECT site_id FROM guard_assignments
        WHERE id = ? AND guard_id = ? AND tenant_id = ? AND status = 'active'
        "#,
    )
    .bind(payload.assignment_id)
    .bind(guard_id)
    .bind(tenant_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, guard_id, "Check-in assignment lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let site_id = match site_id {
        Some(s) => s,
        None => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiEnvelope::<()>::fail(ASSIGNMENT_NOT_FOUND)));
        }
    };

    // Geofence applies only when the site has coordinates configured
    let site = site_cache::site_geo(pool.get_ref(), tenant_id, site_id)
        .await
        .map_err(|e| {
            error!(error = %e, site_id, "Check-in site lookup failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let site = match site {
        Some(s) => s,
        None => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiEnvelope::<()>::fail(ASSIGNMENT_NOT_FOUND)));
        }
    };

    if let (Some(site_lat), Some(site_lon)) = (site.latitude, site.longitude) {
        if let GeofenceCheck::Outside {
            distance_m,
            radius_m,
        } = check_geofence(
            site_lat,
            site_lon,
            site.geofence_radius_m,
            payload.latitude,
            payload.longitude,
        ) {
            debug!(guard_id, site_id, distance_m, "Check-in outside geofence");
            return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(
                geofence_reject_message(distance_m, radius_m),
            )));
        }
    }

    let check_in_time = match &payload.check_in_time {
        Some(raw) => match resolve_client_time(raw) {
            Ok(t) => t,
            Err(msg) => return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(msg))),
        },
        None => app_time::now_in_app_tz(),
    };
    let attendance_date = check_in_time.date();
    let location = geo::location_string(payload.latitude, payload.longitude);
    let remarks = append_remark(None, "Check-in", payload.notes.as_deref());

    let result = sqlx::query(
        r#"
        INSERT INTO guard_attendance
        (tenant_id, guard_id, assignment_id, attendance_date, check_in_time, check_in_location, status, remarks)
        VALUES (?, ?, ?, ?, ?, ?, 'Present', ?)
        "#,
    )
    .bind(tenant_id)
    .bind(guard_id)
    .bind(payload.assignment_id)
    .bind(attendance_date)
    .bind(check_in_time)
    .bind(&location)
    .bind(&remarks)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok()
            .json(ApiEnvelope::<()>::ok_empty("Checked in successfully"))),

        Err(e) => {
            // Duplicate check-in for the same (guard, assignment, day)
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest()
                        .json(ApiEnvelope::<()>::fail("Already checked in today")));
                }
            }

            error!(error = %e, guard_id, "Check-in failed");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = CheckOutReq,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "success": true, "message": "Checked out successfully", "data": null
        })),
        (status = 400, description = "Not found / already checked out / geofence violation", body = Object, example = json!({
            "success": false, "message": "Attendance record not found or already checked out", "data": null
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckOutReq>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let guard_id = auth.require_guard()?;

    // Record must exist, belong to this guard and tenant, and still be open
    let record = sqlx::query_as::<_, OpenAttendanceRow>(
        r#"
        SELECT id, assignment_id, remarks
        FROM guard_attendance
        WHERE id = ? AND guard_id = ? AND tenant_id = ? AND check_out_time IS NULL
        "#,
    )
    .bind(payload.attendance_id)
    .bind(guard_id)
    .bind(tenant_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, guard_id, "Check-out record lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let record = match record {
        Some(r) => r,
        None => {
            return Ok(
                HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(CHECK_OUT_NOT_FOUND))
            );
        }
    };

    let site_id = sqlx::query_scalar::<_, u64>(
        "SELECT site_id FROM guard_assignments WHERE id = ? AND tenant_id = ?",
    )
    .bind(record.assignment_id)
    .bind(tenant_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, assignment_id = record.assignment_id, "Check-out assignment lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let site_id = match site_id {
        Some(s) => s,
        None => {
            return Ok(
                HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(CHECK_OUT_NOT_FOUND))
            );
        }
    };

    let site = site_cache::site_geo(pool.get_ref(), tenant_id, site_id)
        .await
        .map_err(|e| {
            error!(error = %e, site_id, "Check-out site lookup failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let site = match site {
        Some(s) => s,
        None => {
            return Ok(
                HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(CHECK_OUT_NOT_FOUND))
            );
        }
    };

    // Check-out always requires a configured geofence center
    let (site_lat, site_lon) = match (site.latitude, site.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Ok(
                HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(SITE_NOT_CONFIGURED))
            );
        }
    };

    if let GeofenceCheck::Outside {
        distance_m,
        radius_m,
    } = check_geofence(
        site_lat,
        site_lon,
        site.geofence_radius_m,
        payload.latitude,
        payload.longitude,
    ) {
        debug!(guard_id, site_id, distance_m, "Check-out outside geofence");
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(
            geofence_reject_message(distance_m, radius_m),
        )));
    }

    let check_out_time = match &payload.check_out_time {
        Some(raw) => match resolve_client_time(raw) {
            Ok(t) => t,
            Err(msg) => return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(msg))),
        },
        None => app_time::now_in_app_tz(),
    };
    let location = geo::location_string(payload.latitude, payload.longitude);
    let remarks = append_remark(record.remarks, "Check-out", payload.notes.as_deref());

    // The IS NULL guard makes a racing second check-out affect zero rows
    let affected = sqlx::query(
        r#"
        UPDATE guard_attendance
        SET check_out_time = ?, check_out_location = ?, remarks = ?
        WHERE id = ? AND check_out_time IS NULL
        "#,
    )
    .bind(check_out_time)
    .bind(&location)
    .bind(&remarks)
    .bind(record.id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, guard_id, "Check-out failed");
        ErrorInternalServerError("Internal Server Error")
    })?
    .rows_affected();

    if affected == 0 {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(CHECK_OUT_NOT_FOUND)));
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Checked out successfully")))
}

/// Administrative mark (e.g. Absent/Leave without a device check-in)
#[utoipa::path(
    post,
    path = "/api/v1/attendance/mark",
    request_body = MarkAttendanceReq,
    responses(
        (status = 200, description = "Attendance marked", body = Object, example = json!({
            "success": true, "message": "Attendance marked", "data": null
        })),
        (status = 400, description = "Validation or duplicate record", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<MarkAttendanceReq>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    if !MARK_STATUSES.contains(&payload.status.as_str()) {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(format!(
            "Status must be one of: {}",
            MARK_STATUSES.join(", ")
        ))));
    }

    let assignment_ok = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM guard_assignments
            WHERE id = ? AND guard_id = ? AND tenant_id = ?
        )
        "#,
    )
    .bind(payload.assignment_id)
    .bind(payload.guard_id)
    .bind(tenant_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Mark attendance assignment lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !assignment_ok {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(ASSIGNMENT_NOT_FOUND)));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO guard_attendance
        (tenant_id, guard_id, assignment_id, attendance_date, status, remarks)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(tenant_id)
    .bind(payload.guard_id)
    .bind(payload.assignment_id)
    .bind(payload.attendance_date)
    .bind(&payload.status)
    .bind(&payload.remarks)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Attendance marked"))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(
                        "Attendance already recorded for this day",
                    )));
                }
            }
            error!(error = %e, "Mark attendance failed");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Paged attendance register
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("guard_id" = Option<u64>, Query, description = "Filter by guard"),
        ("assignment_id" = Option<u64>, Query, description = "Filter by assignment"),
        ("from" = Option<String>, Query, description = "Start date (inclusive)"),
        ("to" = Option<String>, Query, description = "End date (inclusive)")
    ),
    responses(
        (status = 200, description = "Paginated attendance register", body = AttendanceListResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = vec!["tenant_id = ?"];
    let mut bindings: Vec<sqlx::types::JsonValue> = vec![tenant_id.into()];

    if let Some(guard_id) = query.guard_id {
        conditions.push("guard_id = ?");
        bindings.push(guard_id.into());
    }

    if let Some(assignment_id) = query.assignment_id {
        conditions.push("assignment_id = ?");
        bindings.push(assignment_id.into());
    }

    if let Some(from) = query.from {
        conditions.push("attendance_date >= ?");
        bindings.push(from.to_string().into());
    }

    if let Some(to) = query.to {
        conditions.push("attendance_date <= ?");
        bindings.push(to.to_string().into());
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    // ---------- total count ----------
    let count_sql = format!(
        "SELECT COUNT(*) as total FROM guard_attendance {}",
        where_clause
    );
    debug!(sql = %count_sql, "Counting attendance records");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count attendance records");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM guard_attendance {} ORDER BY attendance_date DESC, id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching attendance records");

    let mut data_query = sqlx::query_as::<_, GuardAttendance>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let records = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch attendance records");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        "OK",
        AttendanceListResponse {
            data: records,
            page,
            per_page,
            total,
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE_LAT: f64 = 12.9716;
    const SITE_LON: f64 = 77.5946;

    #[test]
    fn inside_radius_passes() {
        // ~22 m north of the site, 50 m radius
        match check_geofence(SITE_LAT, SITE_LON, Some(50.0), 12.9718, SITE_LON) {
            GeofenceCheck::Within => {}
            GeofenceCheck::Outside { distance_m, .. } => {
                panic!("expected within, was {} m out", distance_m)
            }
        }
    }

    #[test]
    fn outside_radius_reports_km_distance() {
        // ~1.1 km north, 50 m radius
        match check_geofence(SITE_LAT, SITE_LON, Some(50.0), 12.9816, SITE_LON) {
            GeofenceCheck::Within => panic!("expected outside"),
            GeofenceCheck::Outside {
                distance_m,
                radius_m,
            } => {
                let msg = geofence_reject_message(distance_m, radius_m);
                assert!(msg.contains("km away"), "got: {}", msg);
                assert!(msg.contains("allowed: 50 m"), "got: {}", msg);
            }
        }
    }

    #[test]
    fn boundary_distance_is_inside() {
        let d = geo::haversine_distance_m(SITE_LAT, SITE_LON, 12.9718, SITE_LON);
        // Radius set to the exact measured distance: non-strict boundary
        assert!(matches!(
            check_geofence(SITE_LAT, SITE_LON, Some(d), 12.9718, SITE_LON),
            GeofenceCheck::Within
        ));
    }

    #[test]
    fn missing_radius_defaults_to_100_m() {
        // ~22 m out, no configured radius
        assert!(matches!(
            check_geofence(SITE_LAT, SITE_LON, None, 12.9718, SITE_LON),
            GeofenceCheck::Within
        ));
        // ~1.1 km out still fails against the default
        assert!(matches!(
            check_geofence(SITE_LAT, SITE_LON, None, 12.9816, SITE_LON),
            GeofenceCheck::Outside { radius_m, .. } if radius_m == 100.0
        ));
    }

    #[test]
    fn utc_tagged_client_time_is_converted() {
        // 02:31 UTC is 08:01 IST (the process default zone)
        let t = resolve_client_time("2026-02-10T02:31:12Z").unwrap();
        assert_eq!(t.to_string(), "2026-02-10 08:01:12");
    }

    #[test]
    fn naive_client_time_is_used_as_is() {
        let t = resolve_client_time("2026-02-10T08:01:12").unwrap();
        assert_eq!(t.to_string(), "2026-02-10 08:01:12");
    }

    #[test]
    fn garbage_client_time_is_rejected() {
        assert!(resolve_client_time("ten past eight").is_err());
    }

    #[test]
    fn remarks_get_bracketed_tag() {
        assert_eq!(
            append_remark(None, "Check-out", Some("relieved")),
            Some("[Check-out: relieved]".to_string())
        );
        assert_eq!(
            append_remark(
                Some("[Check-in: gate B]".to_string()),
                "Check-out",
                Some("relieved")
            ),
            Some("[Check-in: gate B] [Check-out: relieved]".to_string())
        );
    }

    #[test]
    fn empty_notes_leave_remarks_untouched() {
        assert_eq!(append_remark(None, "Check-out", None), None);
        assert_eq!(
            append_remark(Some("kept".to_string()), "Check-out", Some("  ")),
            Some("kept".to_string())
        );
    }
}
