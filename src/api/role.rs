use crate::auth::auth::AuthUser;
use crate::model::role::{Permission, Role};
use crate::models::ApiEnvelope;
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateRole {
    #[schema(example = "Field Supervisor")]
    pub name: String,
    #[schema(example = "Supervises guards across assigned sites", nullable = true)]
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct GrantPermissions {
    /// (resource, action) pair ids to grant
    #[schema(example = json!([14, 15]))]
    pub permission_ids: Vec<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct GrantMenus {
    #[schema(example = json!([3]))]
    pub menu_ids: Vec<u64>,
    #[schema(example = json!([31, 32]))]
    pub sub_menu_ids: Vec<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignRoles {
    #[schema(example = 5)]
    pub user_id: u64,
    #[schema(example = json!([2]))]
    pub role_ids: Vec<u64>,
}

async fn role_in_tenant(
    pool: &MySqlPool,
    role_id: u64,
    tenant_id: u64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM roles WHERE id = ? AND tenant_id = ? AND is_active = 1)",
    )
    .bind(role_id)
    .bind(tenant_id)
    .fetch_one(pool)
    .await
}

/// Create Role
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = CreateRole,
    responses(
        (status = 200, description = "Role created", body = Object, example = json!({
            "success": true, "message": "Role created", "data": null
        })),
        (status = 400, description = "Duplicate role name", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Role"
)]
pub async fn create_role(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRole>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Name is required")));
    }

    let result = sqlx::query(
        "INSERT INTO roles (tenant_id, name, description, is_active) VALUES (?, ?, ?, 1)",
    )
    .bind(tenant_id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Role created"))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest()
                        .json(ApiEnvelope::<()>::fail("Role name already exists")));
                }
            }
            error!(error = %e, "Failed to create role");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// List Roles
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses(
        (status = 200, description = "Active roles in the tenant", body = Object)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Role"
)]
pub async fn list_roles(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let roles = sqlx::query_as::<_, Role>(
        r#"
        SELECT id, tenant_id, name, description, is_active
        FROM roles
        WHERE tenant_id = ? AND is_active = 1
        ORDER BY name ASC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list roles");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", roles)))
}

/// List Permissions (the global (resource, action) catalog)
#[utoipa::path(
    get,
    path = "/api/v1/roles/permissions",
    responses(
        (status = 200, description = "Permission catalog", body = Object)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Role"
)]
pub async fn list_permissions(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<HttpResponse> {
    let permissions = sqlx::query_as::<_, Permission>(
        "SELECT id, resource, action FROM permissions ORDER BY resource, action",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list permissions");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", permissions)))
}

/// Grant permissions to a role (idempotent)
#[utoipa::path(
    post,
    path = "/api/v1/roles/{id}/permissions",
    params(
        ("id" = u64, Path, description = "Role ID")
    ),
    request_body = GrantPermissions,
    responses(
        (status = 200, description = "Permissions granted", body = Object, example = json!({
            "success": true, "message": "Permissions granted", "data": null
        })),
        (status = 400, description = "Role not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Role"
)]
pub async fn grant_permissions(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<GrantPermissions>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let role_id = path.into_inner();

    let db_err = |e: sqlx::Error| {
        error!(error = %e, role_id, "Failed to grant permissions");
        ErrorInternalServerError("Internal Server Error")
    };

    if !role_in_tenant(pool.get_ref(), role_id, tenant_id)
        .await
        .map_err(db_err)?
    {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Role not found")));
    }

    for permission_id in &payload.permission_ids {
        sqlx::query("INSERT IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
            .bind(role_id)
            .bind(permission_id)
            .execute(pool.get_ref())
            .await
            .map_err(db_err)?;
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Permissions granted")))
}

/// Grant menu and submenu visibility to a role (idempotent)
#[utoipa::path(
    post,
    path = "/api/v1/roles/{id}/menus",
    params(
        ("id" = u64, Path, description = "Role ID")
    ),
    request_body = GrantMenus,
    responses(
        (status = 200, description = "Menus granted", body = Object, example = json!({
            "success": true, "message": "Menus granted", "data": null
        })),
        (status = 400, description = "Role not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Role"
)]
pub async fn grant_menus(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<GrantMenus>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let role_id = path.into_inner();

    let db_err = |e: sqlx::Error| {
        error!(error = %e, role_id, "Failed to grant menus");
        ErrorInternalServerError("Internal Server Error")
    };

    if !role_in_tenant(pool.get_ref(), role_id, tenant_id)
        .await
        .map_err(db_err)?
    {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Role not found")));
    }

    for menu_id in &payload.menu_ids {
        sqlx::query("INSERT IGNORE INTO role_menus (role_id, menu_id) VALUES (?, ?)")
            .bind(role_id)
            .bind(menu_id)
            .execute(pool.get_ref())
            .await
            .map_err(db_err)?;
    }

    for sub_menu_id in &payload.sub_menu_ids {
        sqlx::query("INSERT IGNORE INTO role_sub_menus (role_id, sub_menu_id) VALUES (?, ?)")
            .bind(role_id)
            .bind(sub_menu_id)
            .execute(pool.get_ref())
            .await
            .map_err(db_err)?;
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Menus granted")))
}

/// Assign roles to a user (idempotent)
#[utoipa::path(
    post,
    path = "/api/v1/roles/assign",
    request_body = AssignRoles,
    responses(
        (status = 200, description = "Roles assigned", body = Object, example = json!({
            "success": true, "message": "Roles assigned", "data": null
        })),
        (status = 400, description = "User or role not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Role"
)]
pub async fn assign_roles(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AssignRoles>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let db_err = |e: sqlx::Error| {
        error!(error = %e, "Failed to assign roles");
        ErrorInternalServerError("Internal Server Error")
    };

    let user_ok = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ? AND tenant_id = ?)",
    )
    .bind(payload.user_id)
    .bind(tenant_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(db_err)?;

    if !user_ok {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("User not found")));
    }

    for role_id in &payload.role_ids {
        if !role_in_tenant(pool.get_ref(), *role_id, tenant_id)
            .await
            .map_err(db_err)?
        {
            return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Role not found")));
        }

        sqlx::query("INSERT IGNORE INTO user_roles (user_id, role_id, tenant_id) VALUES (?, ?, ?)")
            .bind(payload.user_id)
            .bind(role_id)
            .bind(tenant_id)
            .execute(pool.get_ref())
            .await
            .map_err(db_err)?;
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Roles assigned")))
}
