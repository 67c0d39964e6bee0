use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Role {
    #[schema(example = 2)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = "Field Supervisor")]
    pub name: String,

    #[schema(example = "Supervises guards across assigned sites", nullable = true)]
    pub description: Option<String>,

    #[schema(example = true)]
    pub is_active: bool,
}

/// A (resource, action) pair. Granted to roles, independent of menu
/// visibility.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Permission {
    #[schema(example = 14)]
    pub id: u64,

    #[schema(example = "attendance")]
    pub resource: String,

    #[schema(example = "check_out")]
    pub action: String,
}
