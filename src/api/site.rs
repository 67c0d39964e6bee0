use crate::{
    auth::auth::AuthUser,
    model::site::Site,
    models::ApiEnvelope,
    utils::db_utils::{build_tenant_update_sql, execute_update},
    utils::site_cache,
};
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::Value;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateSite {
    #[schema(example = "SITE-007")]
    pub site_code: String,
    #[schema(example = "MG Road Office Tower")]
    pub name: String,
    #[schema(example = "1 MG Road, Bengaluru", nullable = true)]
    pub address: Option<String>,
    #[schema(example = 12.9716, nullable = true)]
    pub latitude: Option<f64>,
    #[schema(example = 77.5946, nullable = true)]
    pub longitude: Option<f64>,
    #[schema(example = 100.0, nullable = true)]
    pub geofence_radius_m: Option<f64>,
}

fn validate_geofence(
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_m: Option<f64>,
) -> Result<(), &'static str> {
    // Coordinates come as a pair or not at all
    if latitude.is_some() != longitude.is_some() {
        return Err("Latitude and longitude must be set together");
    }
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err("Latitude must be between -90 and 90");
        }
    }
    if let Some(lon) = longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err("Longitude must be between -180 and 180");
        }
    }
    if let Some(r) = radius_m {
        if r <= 0.0 {
            return Err("Geofence radius must be positive");
        }
    }
    Ok(())
}

/// Create Site
#[utoipa::path(
    post,
    path = "/api/v1/sites",
    request_body = CreateSite,
    responses(
        (status = 200, description = "Site created", body = Object, example = json!({
            "success": true, "message": "Site created", "data": null
        })),
        (status = 400, description = "Validation failure or duplicate code", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site"
)]
pub async fn create_site(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSite>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    if payload.site_code.trim().is_empty() || payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiEnvelope::<()>::fail("Site code and name are required")));
    }

    if let Err(msg) = validate_geofence(
        payload.latitude,
        payload.longitude,
        payload.geofence_radius_m,
    ) {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail(msg)));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO sites
        (tenant_id, site_code, name, address, latitude, longitude, geofence_radius_m, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, 1)
        "#,
    )
    .bind(tenant_id)
    .bind(payload.site_code.trim())
    .bind(payload.name.trim())
    .bind(&payload.address)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.geofence_radius_m)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Site created"))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest()
                        .json(ApiEnvelope::<()>::fail("Site code already exists")));
                }
            }
            error!(error = %e, "Failed to create site");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// List Sites
#[utoipa::path(
    get,
    path = "/api/v1/sites",
    responses(
        (status = 200, description = "Active sites in the tenant", body = Object)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site"
)]
pub async fn list_sites(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let sites = sqlx::query_as::<_, Site>(
        r#"
        SELECT id, tenant_id, site_code, name, address, latitude, longitude,
               geofence_radius_m, is_active
        FROM sites
        WHERE tenant_id = ? AND is_active = 1
        ORDER BY name ASC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list sites");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", sites)))
}

/// Get Site by ID
#[utoipa::path(
    get,
    path = "/api/v1/sites/{id}",
    params(
        ("id" = u64, Path, description = "Site ID")
    ),
    responses(
        (status = 200, description = "Site found", body = Site),
        (status = 400, description = "Site not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site"
)]
pub async fn get_site(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let site_id = path.into_inner();

    let site = sqlx::query_as::<_, Site>(
        r#"
        SELECT id, tenant_id, site_code, name, address, latitude, longitude,
               geofence_radius_m, is_active
        FROM sites
        WHERE id = ? AND tenant_id = ?
        "#,
    )
    .bind(site_id)
    .bind(tenant_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, site_id, "Failed to fetch site");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match site {
        Some(s) => Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", s))),
        None => Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Site not found"))),
    }
}

/// Update Site
#[utoipa::path(
    put,
    path = "/api/v1/sites/{id}",
    params(
        ("id" = u64, Path, description = "Site ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Site updated", body = Object, example = json!({
            "success": true, "message": "Site updated", "data": null
        })),
        (status = 400, description = "Site not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site"
)]
pub async fn update_site(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let site_id = path.into_inner();

    let update = build_tenant_update_sql("sites", &body, site_id, tenant_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Site not found")));
    }

    // Geofence data may have changed
    site_cache::invalidate(tenant_id, site_id).await;

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Site updated")))
}

/// Deactivate Site (soft; attendance history stays intact)
#[utoipa::path(
    delete,
    path = "/api/v1/sites/{id}",
    params(
        ("id" = u64, Path, description = "Site ID")
    ),
    responses(
        (status = 200, description = "Site deactivated", body = Object, example = json!({
            "success": true, "message": "Site deactivated", "data": null
        })),
        (status = 400, description = "Site not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site"
)]
pub async fn deactivate_site(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let site_id = path.into_inner();

    let affected = sqlx::query("UPDATE sites SET is_active = 0 WHERE id = ? AND tenant_id = ?")
        .bind(site_id)
        .bind(tenant_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, site_id, "Failed to deactivate site");
            ErrorInternalServerError("Internal Server Error")
        })?
        .rows_affected();

    if affected == 0 {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Site not found")));
    }

    site_cache::invalidate(tenant_id, site_id).await;

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Site deactivated")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_must_come_as_a_pair() {
        assert!(validate_geofence(Some(12.9), None, None).is_err());
        assert!(validate_geofence(None, Some(77.5), None).is_err());
        assert!(validate_geofence(Some(12.9), Some(77.5), None).is_ok());
        assert!(validate_geofence(None, None, None).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        assert!(validate_geofence(Some(91.0), Some(77.5), None).is_err());
        assert!(validate_geofence(Some(12.9), Some(181.0), None).is_err());
    }

    #[test]
    fn radius_must_be_positive() {
        assert!(validate_geofence(Some(12.9), Some(77.5), Some(0.0)).is_err());
        assert!(validate_geofence(Some(12.9), Some(77.5), Some(50.0)).is_ok());
    }
}
