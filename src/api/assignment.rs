use crate::{auth::auth::AuthUser, model::assignment::GuardAssignment, models::ApiEnvelope};
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateAssignment {
    #[schema(example = 1)]
    pub guard_id: u64,
    #[schema(example = 7)]
    pub site_id: u64,
    #[schema(example = "Night")]
    pub shift_name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-06-30", format = "date", value_type = String, nullable = true)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignmentQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub guard_id: Option<u64>,
    pub site_id: Option<u64>,
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AssignmentListResponse {
    pub data: Vec<GuardAssignment>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 12)]
    pub total: i64,
}

/// Create Assignment (binds a guard to a site and shift)
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = CreateAssignment,
    responses(
        (status = 200, description = "Assignment created", body = Object, example = json!({
            "success": true, "message": "Assignment created", "data": null
        })),
        (status = 400, description = "Validation failure", body = Object, example = json!({
            "success": false, "message": "End date cannot be before start date", "data": null
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignment"
)]
pub async fn create_assignment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateAssignment>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    if let Some(end) = payload.end_date {
        if end < payload.start_date {
            return Ok(HttpResponse::BadRequest()
                .json(ApiEnvelope::<()>::fail("End date cannot be before start date")));
        }
    }

    if payload.shift_name.trim().is_empty() {
        return Ok(
            HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Shift name is required"))
        );
    }

    let db_err = |e: sqlx::Error| {
        error!(error = %e, "Assignment reference lookup failed");
        ErrorInternalServerError("Internal Server Error")
    };

    // Both references must live in the caller's tenant
    let guard_ok = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM guards WHERE id = ? AND tenant_id = ? AND status = 'active')",
    )
    .bind(payload.guard_id)
    .bind(tenant_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(db_err)?;

    if !guard_ok {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Guard not found")));
    }

    let site_ok = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM sites WHERE id = ? AND tenant_id = ? AND is_active = 1)",
    )
    .bind(payload.site_id)
    .bind(tenant_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(db_err)?;

    if !site_ok {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Site not found")));
    }

    sqlx::query(
        r#"
        INSERT INTO guard_assignments
        (tenant_id, guard_id, site_id, shift_name, start_date, end_date, status)
        VALUES (?, ?, ?, ?, ?, ?, 'active')
        "#,
    )
    .bind(tenant_id)
    .bind(payload.guard_id)
    .bind(payload.site_id)
    .bind(payload.shift_name.trim())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create assignment");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Assignment created")))
}

/// Paged assignment list
#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("guard_id" = Option<u64>, Query, description = "Filter by guard"),
        ("site_id" = Option<u64>, Query, description = "Filter by site"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Paginated assignment list", body = AssignmentListResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignment"
)]
pub async fn list_assignments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AssignmentQuery>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut conditions = vec!["tenant_id = ?"];
    let mut bindings: Vec<sqlx::types::JsonValue> = vec![tenant_id.into()];

    if let Some(guard_id) = query.guard_id {
        conditions.push("guard_id = ?");
        bindings.push(guard_id.into());
    }

    if let Some(site_id) = query.site_id {
        conditions.push("site_id = ?");
        bindings.push(site_id.into());
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone().into());
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    let count_sql = format!(
        "SELECT COUNT(*) as total FROM guard_assignments {}",
        where_clause
    );
    debug!(sql = %count_sql, "Counting assignments");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count assignments");
        ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        "SELECT * FROM guard_assignments {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching assignments");

    let mut data_query = sqlx::query_as::<_, GuardAssignment>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let assignments = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch assignments");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        "OK",
        AssignmentListResponse {
            data: assignments,
            page,
            per_page,
            total,
        },
    )))
}

/// End Assignment (close out; the row is kept for attendance history)
#[utoipa::path(
    put,
    path = "/api/v1/assignments/{id}/end",
    params(
        ("id" = u64, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment ended", body = Object, example = json!({
            "success": true, "message": "Assignment ended", "data": null
        })),
        (status = 400, description = "Assignment not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignment"
)]
pub async fn end_assignment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let assignment_id = path.into_inner();

    let today = crate::utils::app_time::today_in_app_tz();

    let affected = sqlx::query(
        r#"
        UPDATE guard_assignments
        SET status = 'ended', end_date = COALESCE(end_date, ?)
        WHERE id = ? AND tenant_id = ? AND status = 'active'
        "#,
    )
    .bind(today)
    .bind(assignment_id)
    .bind(tenant_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, assignment_id, "Failed to end assignment");
        ErrorInternalServerError("Internal Server Error")
    })?
    .rows_affected();

    if affected == 0 {
        return Ok(
            HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Assignment not found"))
        );
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Assignment ended")))
}
