use crate::{
    auth::auth::AuthUser,
    model::visitor::{VehicleLog, VisitorLog},
    models::ApiEnvelope,
    utils::app_time,
};
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct VisitorEntryReq {
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
}

#[derive(Deserialize, ToSchema)]
pub struct VehicleEntryReq {
    #[schema(example = 7)]
    pub site_id: u64,
    #[schema(example = "KA-01-AB-1234")]
    pub registration_no: String,
    #[schema(example = "Suresh", nullable = true)]
    pub driver_name: Option<String>,
    #[schema(example = "Delivery", nullable = true)]
    pub purpose: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub site_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct VisitorListResponse {
    pub data: Vec<VisitorLog>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 34)]
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct VehicleListResponse {
    pub data: Vec<VehicleLog>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 18)]
    pub total: i64,
}

async fn site_in_tenant(
    pool: &MySqlPool,
    site_id: u64,
    tenant_id: u64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM sites WHERE id = ? AND tenant_id = ? AND is_active = 1)",
    )
    .bind(site_id)
    .bind(tenant_id)
    .fetch_one(pool)
    .await
}

/// Log a visitor entry
#[utoipa::path(
    post,
    path = "/api/v1/visitors",
    request_body = VisitorEntryReq,
    responses(
        (status = 200, description = "Visitor logged", body = Object, example = json!({
            "success": true, "message": "Visitor logged", "data": null
        })),
        (status = 400, description = "Site not found or missing name", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitor"
)]
pub async fn log_visitor_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<VisitorEntryReq>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    if payload.visitor_name.trim().is_empty() {
        return Ok(
            HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Visitor name is required"))
        );
    }

    let site_ok = site_in_tenant(pool.get_ref(), payload.site_id, tenant_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Visitor site lookup failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !site_ok {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Site not found")));
    }

    sqlx::query(
        r#"
        INSERT INTO visitor_logs
        (tenant_id, site_id, visitor_name, phone, purpose, host_name, in_time)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(tenant_id)
    .bind(payload.site_id)
    .bind(payload.visitor_name.trim())
    .bind(&payload.phone)
    .bind(&payload.purpose)
    .bind(&payload.host_name)
    .bind(app_time::now_in_app_tz())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to log visitor");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Visitor logged")))
}

/// Mark a visitor as exited
#[utoipa::path(
    put,
    path = "/api/v1/visitors/{id}/exit",
    params(
        ("id" = u64, Path, description = "Visitor log ID")
    ),
    responses(
        (status = 200, description = "Exit recorded", body = Object, example = json!({
            "success": true, "message": "Exit recorded", "data": null
        })),
        (status = 400, description = "Log not found or already exited", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitor"
)]
pub async fn mark_visitor_exit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let log_id = path.into_inner();

    let affected = sqlx::query(
        r#"
        UPDATE visitor_logs
        SET out_time = ?
        WHERE id = ? AND tenant_id = ? AND out_time IS NULL
        "#,
    )
    .bind(app_time::now_in_app_tz())
    .bind(log_id)
    .bind(tenant_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, log_id, "Failed to record visitor exit");
        ErrorInternalServerError("Internal Server Error")
    })?
    .rows_affected();

    if affected == 0 {
        return Ok(HttpResponse::BadRequest()
            .json(ApiEnvelope::<()>::fail("Visitor log not found or already exited")));
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Exit recorded")))
}

/// Paged visitor log
#[utoipa::path(
    get,
    path = "/api/v1/visitors",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("site_id" = Option<u64>, Query, description = "Filter by site")
    ),
    responses(
        (status = 200, description = "Paginated visitor log", body = VisitorListResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitor"
)]
pub async fn list_visitors(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LogQuery>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let (where_clause, site_filter) = match query.site_id {
        Some(site_id) => ("WHERE tenant_id = ? AND site_id = ?", Some(site_id)),
        None => ("WHERE tenant_id = ?", None),
    };

    let count_sql = format!("SELECT COUNT(*) as total FROM visitor_logs {}", where_clause);

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(tenant_id);
    if let Some(site_id) = site_filter {
        count_query = count_query.bind(site_id);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count visitor logs");
        ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        "SELECT * FROM visitor_logs {} ORDER BY in_time DESC, id DESC LIMIT ? OFFSET ?",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, VisitorLog>(&data_sql).bind(tenant_id);
    if let Some(site_id) = site_filter {
        data_query = data_query.bind(site_id);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let logs = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch visitor logs");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        "OK",
        VisitorListResponse {
            data: logs,
            page,
            per_page,
            total,
        },
    )))
}

/// Log a vehicle entry
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    request_body = VehicleEntryReq,
    responses(
        (status = 200, description = "Vehicle logged", body = Object, example = json!({
            "success": true, "message": "Vehicle logged", "data": null
        })),
        (status = 400, description = "Site not found or missing registration", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitor"
)]
pub async fn log_vehicle_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<VehicleEntryReq>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    if payload.registration_no.trim().is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiEnvelope::<()>::fail("Registration number is required")));
    }

    let site_ok = site_in_tenant(pool.get_ref(), payload.site_id, tenant_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Vehicle site lookup failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !site_ok {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Site not found")));
    }

    sqlx::query(
        r#"
        INSERT INTO vehicle_logs
        (tenant_id, site_id, registration_no, driver_name, purpose, in_time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(tenant_id)
    .bind(payload.site_id)
    .bind(payload.registration_no.trim())
    .bind(&payload.driver_name)
    .bind(&payload.purpose)
    .bind(app_time::now_in_app_tz())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to log vehicle");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Vehicle logged")))
}

/// Mark a vehicle as exited
#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}/exit",
    params(
        ("id" = u64, Path, description = "Vehicle log ID")
    ),
    responses(
        (status = 200, description = "Exit recorded", body = Object, example = json!({
            "success": true, "message": "Exit recorded", "data": null
        })),
        (status = 400, description = "Log not found or already exited", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitor"
)]
pub async fn mark_vehicle_exit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let log_id = path.into_inner();

    let affected = sqlx::query(
        r#"
        UPDATE vehicle_logs
        SET out_time = ?
        WHERE id = ? AND tenant_id = ? AND out_time IS NULL
        "#,
    )
    .bind(app_time::now_in_app_tz())
    .bind(log_id)
    .bind(tenant_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, log_id, "Failed to record vehicle exit");
        ErrorInternalServerError("Internal Server Error")
    })?
    .rows_affected();

    if affected == 0 {
        return Ok(HttpResponse::BadRequest()
            .json(ApiEnvelope::<()>::fail("Vehicle log not found or already exited")));
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Exit recorded")))
}

/// Paged vehicle log
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("site_id" = Option<u64>, Query, description = "Filter by site")
    ),
    responses(
        (status = 200, description = "Paginated vehicle log", body = VehicleListResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitor"
)]
pub async fn list_vehicles(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LogQuery>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let (where_clause, site_filter) = match query.site_id {
        Some(site_id) => ("WHERE tenant_id = ? AND site_id = ?", Some(site_id)),
        None => ("WHERE tenant_id = ?", None),
    };

    let count_sql = format!("SELECT COUNT(*) as total FROM vehicle_logs {}", where_clause);

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(tenant_id);
    if let Some(site_id) = site_filter {
        count_query = count_query.bind(site_id);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count vehicle logs");
        ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        "SELECT * FROM vehicle_logs {} ORDER BY in_time DESC, id DESC LIMIT ? OFFSET ?",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, VehicleLog>(&data_sql).bind(tenant_id);
    if let Some(site_id) = site_filter {
        data_query = data_query.bind(site_id);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let logs = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch vehicle logs");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        "OK",
        VehicleListResponse {
            data: logs,
            page,
            per_page,
            total,
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_log_lists_carry_the_standard_envelope_shape() {
        let body = ApiEnvelope::ok(
            "OK",
            VisitorListResponse {
                data: Vec::new(),
                page: 1,
                per_page: 20,
                total: 0,
            },
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["page"], 1);
        assert_eq!(json["data"]["per_page"], 20);
        assert_eq!(json["data"]["total"], 0);
        assert!(json["data"]["data"].as_array().unwrap().is_empty());

        let body = ApiEnvelope::ok(
            "OK",
            VehicleListResponse {
                data: Vec::new(),
                page: 2,
                per_page: 50,
                total: 120,
            },
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["data"]["page"], 2);
        assert_eq!(json["data"]["total"], 120);
    }
}
