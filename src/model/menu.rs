use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Menu {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = "Attendance")]
    pub name: String,

    #[schema(example = "/attendance", nullable = true)]
    pub route: Option<String>,

    #[schema(example = "calendar-check", nullable = true)]
    pub icon: Option<String>,

    #[schema(example = 20)]
    pub display_order: i32,

    #[schema(example = true)]
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SubMenu {
    #[schema(example = 31)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = 3)]
    pub menu_id: u64,

    #[schema(example = "Daily Register")]
    pub name: String,

    #[schema(example = "/attendance/register", nullable = true)]
    pub route: Option<String>,

    #[schema(example = 1)]
    pub display_order: i32,

    #[schema(example = true)]
    pub is_active: bool,
}

/// A top-level menu with its visible submenus, as resolved for one user.
#[derive(Debug, Serialize, ToSchema)]
pub struct MenuNode {
    #[schema(example = 3)]
    pub id: u64,
    #[schema(example = "Attendance")]
    pub name: String,
    #[schema(example = "/attendance", nullable = true)]
    pub route: Option<String>,
    #[schema(example = "calendar-check", nullable = true)]
    pub icon: Option<String>,
    #[schema(example = 20)]
    pub display_order: i32,
    pub sub_menus: Vec<SubMenu>,
}
