use crate::api::assignment::{AssignmentListResponse, AssignmentQuery, CreateAssignment};
use crate::api::attendance::{
    AttendanceListResponse, AttendanceQuery, CheckInReq, CheckOutReq, MarkAttendanceReq,
};
use crate::api::guard::{CreateGuard, GuardListResponse, GuardQuery};
use crate::api::menu::{CreateMenu, CreateSubMenu};
use crate::api::role::{AssignRoles, CreateRole, GrantMenus, GrantPermissions};
use crate::api::site::CreateSite;
use crate::api::visitor::{
    LogQuery, VehicleEntryReq, VehicleListResponse, VisitorEntryReq, VisitorListResponse,
};
use crate::model::assignment::GuardAssignment;
use crate::model::attendance::GuardAttendance;
use crate::model::guard::Guard;
use crate::model::menu::{Menu, MenuNode, SubMenu};
use crate::model::role::{Permission, Role};
use crate::model::site::Site;
use crate::model::visitor::{VehicleLog, VisitorLog};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GuardOps API",
        version = "1.0.0",
        description = r#"
## Security Agency Back-Office

This API powers a **multi-tenant security-agency back-office**: guard
workforce administration, geofenced attendance, visitor and vehicle
logging, and data-driven role/menu administration.

### 🔹 Key Features
- **Guard & Site Management**
  - Guard roster, site registry with geofence configuration
- **Assignments**
  - Bind guards to sites and shifts for a period
- **Geofenced Attendance**
  - Check-in/check-out gated by the site's geofence radius,
    timestamped in the configured app time zone
- **Visitor & Vehicle Logs**
  - Gate register for people and vehicles per site
- **Roles, Permissions & Menus**
  - (resource, action) permissions and data-driven menu visibility

### 🔐 Security
All tenant data is partitioned by tenant id resolved from the
**JWT Bearer token**. Cross-tenant ids behave like missing rows.

### 📦 Response Format
Every command/query returns the envelope `{ success, message, data }`.
Pagination is supported on list endpoints. An optional `X-Time-Zone`
header overrides the app time zone for a single request.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,

        crate::api::guard::create_guard,
        crate::api::guard::get_guard,
        crate::api::guard::list_guards,
        crate::api::guard::update_guard,

        crate::api::site::create_site,
        crate::api::site::get_site,
        crate::api::site::list_sites,
        crate::api::site::update_site,
        crate::api::site::deactivate_site,

        crate::api::assignment::create_assignment,
        crate::api::assignment::list_assignments,
        crate::api::assignment::end_assignment,

        crate::api::menu::my_menus,
        crate::api::menu::create_menu,
        crate::api::menu::create_sub_menu,
        crate::api::menu::list_menus,
        crate::api::menu::deactivate_menu,

        crate::api::role::create_role,
        crate::api::role::list_roles,
        crate::api::role::list_permissions,
        crate::api::role::grant_permissions,
        crate::api::role::grant_menus,
        crate::api::role::assign_roles,

        crate::api::visitor::log_visitor_entry,
        crate::api::visitor::mark_visitor_exit,
        crate::api::visitor::list_visitors,
        crate::api::visitor::log_vehicle_entry,
        crate::api::visitor::mark_vehicle_exit,
        crate::api::visitor::list_vehicles
    ),
    components(
        schemas(
            Guard,
            CreateGuard,
            GuardQuery,
            GuardListResponse,
            Site,
            CreateSite,
            GuardAssignment,
            CreateAssignment,
            AssignmentQuery,
            AssignmentListResponse,
            GuardAttendance,
            CheckInReq,
            CheckOutReq,
            MarkAttendanceReq,
            AttendanceQuery,
            AttendanceListResponse,
            Menu,
            SubMenu,
            MenuNode,
            CreateMenu,
            CreateSubMenu,
            Role,
            Permission,
            CreateRole,
            GrantPermissions,
            GrantMenus,
            AssignRoles,
            VisitorLog,
            VehicleLog,
            VisitorEntryReq,
            VehicleEntryReq,
            LogQuery,
            VisitorListResponse,
            VehicleListResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Geofenced attendance APIs"),
        (name = "Guard", description = "Guard workforce APIs"),
        (name = "Site", description = "Site and geofence APIs"),
        (name = "Assignment", description = "Guard assignment APIs"),
        (name = "Menu", description = "Data-driven menu APIs"),
        (name = "Role", description = "Role and permission APIs"),
        (name = "Visitor", description = "Visitor and vehicle log APIs"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
