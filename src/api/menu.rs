use crate::auth::auth::AuthUser;
use crate::model::menu::{Menu, MenuNode, SubMenu};
use crate::models::ApiEnvelope;
use crate::utils::db_utils::in_placeholders;
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use std::collections::BTreeSet;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateMenu {
    #[schema(example = "Attendance")]
    pub name: String,
    #[schema(example = "/attendance", nullable = true)]
    pub route: Option<String>,
    #[schema(example = "calendar-check", nullable = true)]
    pub icon: Option<String>,
    #[schema(example = 20)]
    pub display_order: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSubMenu {
    #[schema(example = 3)]
    pub menu_id: u64,
    #[schema(example = "Daily Register")]
    pub name: String,
    #[schema(example = "/attendance/register", nullable = true)]
    pub route: Option<String>,
    #[schema(example = 1)]
    pub display_order: i32,
}

/// Group ordered submenus under their ordered parent menus. Both inputs
/// arrive sorted by display_order; a submenu whose parent is not in
/// `menus` is dropped (the parent menu itself was not granted).
pub fn assemble_menu_tree(menus: Vec<Menu>, sub_menus: Vec<SubMenu>) -> Vec<MenuNode> {
    let mut nodes: Vec<MenuNode> = menus
        .into_iter()
        .map(|m| MenuNode {
            id: m.id,
            name: m.name,
            route: m.route,
            icon: m.icon,
            display_order: m.display_order,
            sub_menus: Vec::new(),
        })
        .collect();

    for sub in sub_menus {
        if let Some(node) = nodes.iter_mut().find(|n| n.id == sub.menu_id) {
            node.sub_menus.push(sub);
        }
    }

    nodes
}

async fn granted_ids(
    pool: &MySqlPool,
    table: &str,
    id_column: &str,
    role_ids: &[u64],
) -> Result<BTreeSet<u64>, sqlx::Error> {
    if role_ids.is_empty() {
        return Ok(BTreeSet::new());
    }
    let sql = format!(
        "SELECT DISTINCT {} FROM {} WHERE role_id IN ({})",
        id_column,
        table,
        in_placeholders(role_ids.len())
    );
    let mut query = sqlx::query_scalar::<_, u64>(&sql);
    for id in role_ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?.into_iter().collect())
}

/// The effective menu tree for the authenticated user, driven entirely
/// by role grants (union across roles) plus direct user_menus overrides.
#[utoipa::path(
    get,
    path = "/api/v1/menus/my",
    responses(
        (status = 200, description = "Menu tree visible to the caller", body = Object, example = json!({
            "success": true, "message": "OK",
            "data": [{"id": 3, "name": "Attendance", "route": "/attendance", "icon": null, "display_order": 20, "sub_menus": []}]
        })),
        (status = 400, description = "Tenant context missing", body = Object, example = json!({
            "success": false, "message": "Tenant context is missing", "data": null
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Menu"
)]
pub async fn my_menus(
    auth: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<HttpResponse> {
    // Unauthenticated callers see an empty tree, not an error
    let auth = match auth {
        Some(a) => a,
        None => {
            return Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", Vec::<MenuNode>::new())));
        }
    };

    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let db_err = |e: sqlx::Error| {
        error!(error = %e, user_id = auth.user_id, "Menu resolution query failed");
        ErrorInternalServerError("Internal Server Error")
    };

    // 1. All roles assigned to the user
    let role_ids: Vec<u64> =
        sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = ? AND tenant_id = ?")
            .bind(auth.user_id)
            .bind(tenant_id)
            .fetch_all(pool.get_ref())
            .await
            .map_err(db_err)?;

    // 2. Union of menu/submenu ids granted through any of those roles,
    //    plus per-user menu overrides
    let mut menu_ids = granted_ids(pool.get_ref(), "role_menus", "menu_id", &role_ids)
        .await
        .map_err(db_err)?;
    let sub_menu_ids = granted_ids(pool.get_ref(), "role_sub_menus", "sub_menu_id", &role_ids)
        .await
        .map_err(db_err)?;

    let override_ids: Vec<u64> =
        sqlx::query_scalar("SELECT menu_id FROM user_menus WHERE user_id = ? AND tenant_id = ?")
            .bind(auth.user_id)
            .bind(tenant_id)
            .fetch_all(pool.get_ref())
            .await
            .map_err(db_err)?;
    menu_ids.extend(override_ids);

    if menu_ids.is_empty() {
        return Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", Vec::<MenuNode>::new())));
    }

    // 3. Active menus in the tenant within the granted set
    let menu_sql = format!(
        r#"
        SELECT id, tenant_id, name, route, icon, display_order, is_active
        FROM menus
        WHERE tenant_id = ? AND is_active = 1 AND id IN ({})
        ORDER BY display_order ASC, id ASC
        "#,
        in_placeholders(menu_ids.len())
    );
    let mut menu_query = sqlx::query_as::<_, Menu>(&menu_sql).bind(tenant_id);
    for id in &menu_ids {
        menu_query = menu_query.bind(id);
    }
    let menus = menu_query.fetch_all(pool.get_ref()).await.map_err(db_err)?;

    // 4. Active granted submenus within the surfaced menus
    let sub_menus = if sub_menu_ids.is_empty() || menus.is_empty() {
        Vec::new()
    } else {
        let parent_ids: Vec<u64> = menus.iter().map(|m| m.id).collect();
        let sub_sql = format!(
            r#"
            SELECT id, tenant_id, menu_id, name, route, display_order, is_active
            FROM sub_menus
            WHERE tenant_id = ? AND is_active = 1 AND id IN ({}) AND menu_id IN ({})
            ORDER BY display_order ASC, id ASC
            "#,
            in_placeholders(sub_menu_ids.len()),
            in_placeholders(parent_ids.len())
        );
        let mut sub_query = sqlx::query_as::<_, SubMenu>(&sub_sql).bind(tenant_id);
        for id in &sub_menu_ids {
            sub_query = sub_query.bind(id);
        }
        for id in &parent_ids {
            sub_query = sub_query.bind(id);
        }
        sub_query.fetch_all(pool.get_ref()).await.map_err(db_err)?
    };

    debug!(
        user_id = auth.user_id,
        menus = menus.len(),
        sub_menus = sub_menus.len(),
        "Resolved menu tree"
    );

    let tree = assemble_menu_tree(menus, sub_menus);
    Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", tree)))
}

/// Create Menu
#[utoipa::path(
    post,
    path = "/api/v1/menus",
    request_body = CreateMenu,
    responses(
        (status = 200, description = "Menu created", body = Object, example = json!({
            "success": true, "message": "Menu created", "data": null
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Menu"
)]
pub async fn create_menu(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateMenu>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    sqlx::query(
        r#"
        INSERT INTO menus (tenant_id, name, route, icon, display_order, is_active)
        VALUES (?, ?, ?, ?, ?, 1)
        "#,
    )
    .bind(tenant_id)
    .bind(&payload.name)
    .bind(&payload.route)
    .bind(&payload.icon)
    .bind(payload.display_order)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create menu");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Menu created")))
}

/// Create SubMenu
#[utoipa::path(
    post,
    path = "/api/v1/menus/sub",
    request_body = CreateSubMenu,
    responses(
        (status = 200, description = "Submenu created", body = Object, example = json!({
            "success": true, "message": "Submenu created", "data": null
        })),
        (status = 400, description = "Parent menu not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Menu"
)]
pub async fn create_sub_menu(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSubMenu>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let parent_ok = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM menus WHERE id = ? AND tenant_id = ?)",
    )
    .bind(payload.menu_id)
    .bind(tenant_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Parent menu lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !parent_ok {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Menu not found")));
    }

    sqlx::query(
        r#"
        INSERT INTO sub_menus (tenant_id, menu_id, name, route, display_order, is_active)
        VALUES (?, ?, ?, ?, ?, 1)
        "#,
    )
    .bind(tenant_id)
    .bind(payload.menu_id)
    .bind(&payload.name)
    .bind(&payload.route)
    .bind(payload.display_order)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create submenu");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Submenu created")))
}

/// Flat list of menus (administration view)
#[utoipa::path(
    get,
    path = "/api/v1/menus",
    responses(
        (status = 200, description = "All active menus in the tenant", body = Object)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Menu"
)]
pub async fn list_menus(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let menus = sqlx::query_as::<_, Menu>(
        r#"
        SELECT id, tenant_id, name, route, icon, display_order, is_active
        FROM menus
        WHERE tenant_id = ? AND is_active = 1
        ORDER BY display_order ASC, id ASC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list menus");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok("OK", menus)))
}

/// Deactivate Menu (soft; configuration entities are never hard-deleted)
#[utoipa::path(
    delete,
    path = "/api/v1/menus/{id}",
    params(
        ("id" = u64, Path, description = "Menu ID")
    ),
    responses(
        (status = 200, description = "Menu deactivated", body = Object, example = json!({
            "success": true, "message": "Menu deactivated", "data": null
        })),
        (status = 400, description = "Menu not found", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Menu"
)]
pub async fn deactivate_menu(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let tenant_id = match auth.require_tenant() {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };
    let menu_id = path.into_inner();

    let affected =
        sqlx::query("UPDATE menus SET is_active = 0 WHERE id = ? AND tenant_id = ?")
            .bind(menu_id)
            .bind(tenant_id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, menu_id, "Failed to deactivate menu");
                ErrorInternalServerError("Internal Server Error")
            })?
            .rows_affected();

    if affected == 0 {
        return Ok(HttpResponse::BadRequest().json(ApiEnvelope::<()>::fail("Menu not found")));
    }

    Ok(HttpResponse::Ok().json(ApiEnvelope::<()>::ok_empty("Menu deactivated")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(id: u64, name: &str, order: i32) -> Menu {
        Menu {
            id,
            tenant_id: 1,
            name: name.to_string(),
            route: None,
            icon: None,
            display_order: order,
            is_active: true,
        }
    }

    fn sub(id: u64, menu_id: u64, name: &str, order: i32) -> SubMenu {
        SubMenu {
            id,
            tenant_id: 1,
            menu_id,
            name: name.to_string(),
            route: None,
            display_order: order,
            is_active: true,
        }
    }

    #[test]
    fn empty_inputs_give_empty_tree() {
        assert!(assemble_menu_tree(Vec::new(), Vec::new()).is_empty());
    }

    #[test]
    fn menu_without_granted_submenus_survives_with_empty_children() {
        let tree = assemble_menu_tree(vec![menu(3, "Attendance", 20)], Vec::new());
        assert_eq!(tree.len(), 1);
        assert!(tree[0].sub_menus.is_empty());
    }

    #[test]
    fn submenu_of_ungranted_parent_is_dropped() {
        // MenuA (id 1) granted; sub X belongs to MenuB (id 2) which was not
        let tree = assemble_menu_tree(
            vec![menu(1, "MenuA", 10)],
            vec![sub(31, 2, "SubMenuX", 1)],
        );
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "MenuA");
        assert!(tree[0].sub_menus.is_empty());
    }

    #[test]
    fn submenus_group_under_their_parents_in_order() {
        let tree = assemble_menu_tree(
            vec![menu(1, "Clients", 10), menu(2, "Attendance", 20)],
            vec![
                sub(21, 2, "Register", 1),
                sub(22, 2, "Exceptions", 2),
                sub(11, 1, "Contracts", 1),
            ],
        );
        assert_eq!(tree[0].name, "Clients");
        assert_eq!(tree[0].sub_menus.len(), 1);
        assert_eq!(tree[1].sub_menus.len(), 2);
        assert_eq!(tree[1].sub_menus[0].name, "Register");
        assert_eq!(tree[1].sub_menus[1].name, "Exceptions");
    }
}
