use crate::{
    auth::auth::AuthUser,
    model::guard::Guard,
    models::ApiEnvelope,
    utils::db_utils::{build_tenant_update_sql, execute_update},
};
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateGuard {
    #[schema(example = "GRD-001", value_type = String)]
    pub guard_code: String,
    #[schema(example = "Ravi", value_type = String)]
    pub first_name: String,
    #[schema(example = "Kumar", value_type = String)]
    pub last_name: String,
    #[schema(example = "ravi.kumar@agency.com", format = "email", nullable = true)]
    pub email: Option<String>,
    #[schema(example = "+919812345678", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub joining_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GuardQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GuardListResponse {
    pub data: Vec<Guard>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Guard
#[utoipa::path(
    post,
    path = "/api/v1/guards",
    request_body = CreateGuard,
    responses(
        (status = 200, description = "Guard created", body = Object, example = json!({
            "success": true, "message": "Guard created", "data": null
        })),
        (status = 400, description = "Duplicate guard code", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Guard"
)]
pub async fn create_guard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateGuard>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    if payload.guard_code.trim().is_empty() || payload.first_name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiEnvelope::<()>::fail("Guard code and first name are required")));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO guards
        (tenant_id, guard_code, first_name, last_name, email, phone, joining_date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'active')
        "#,
    )
    .bind(tenant_id)
    .bind(payload.guard_code.trim())
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.joining_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Guard created"))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest()
                        .json(ApiEnvelope::<()>::fail("Guard code already exists")));
                }
            }
            error!(error = %e, "Failed to create guard");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Paged guard roster
#[utoipa::path(
    get,
    path = "/api/v1/guards",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Search by name or code")
    ),
    responses(
        (status = 200, description = "Paginated guard roster", body = GuardListResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Guard"
)]
pub async fn list_guards(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<GuardQuery>,
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

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone().into());
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR guard_code LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone().into());
        bindings.push(like.clone().into());
        bindings.push(like.into());
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM guards {}", where_clause);
    debug!(sql = %count_sql, "Counting guards");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count guards");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM guards {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching guards");

    let mut data_query = sqlx::query_as::<_, Guard>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let guards = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch guards");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        "OK",
        GuardListResponse {
            data: guards,
            page,
            per_page,
            total,
        },
    )))
}

/// Get Guard by ID
#[utoipa::path(
    get,
    path = "/api/v1/guards/{id}",
    params(
        ("id" = u64, Path, description = "Guard ID")
    ),
    responses(
        (status = 200, description = "Guard found", body = Guard),
        (status = 400, description = "Guard not found", body = Object, example = json!({
            "success": false, "message": "Guard not found", "data": null
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Guard"
)]
pub async fn get_guard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let guard_id = path.into_inner();

    let guard = sqlx::query_as::<_, Guard>(
        r#"
        SELECT id, tenant_id, guard_code, first_name, last_name, email, phone, joining_date, status
        FROM guards
        WHERE id = ? AND tenant_id = ?
        "#,
    )
    .bind(guard_id)
    .bind(tenant_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, guard_id, "Failed to fetch guard");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match guard {
        Some(g) => Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", g))),
        // Cross-tenant ids get the same message as missing rows
        None => Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Guard not found"))),
    }
}

/// Update Guard
#[utoipa::path(
    put,
    path = "/api/v1/guards/{id}",
    params(
        ("id" = u64, Path, description = "Guard ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Guard updated", body = Object, example = json!({
            "success": true, "message": "Guard updated", "data": null
        })),
        (status = 400, description = "Guard not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Guard"
)]
pub async fn update_guard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let guard_id = path.into_inner();

    let update = build_tenant_update_sql("guards", &body, guard_id, tenant_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Guard not found")));
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Guard updated")))
}
