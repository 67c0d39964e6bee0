use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "tenant_id": 1,
        "guard_code": "GRD-001",
        "first_name": "Ravi",
        "last_name": "Kumar",
        "email": "ravi.kumar@agency.com",
        "phone": "+919812345678",
        "joining_date": "2024-01-01",
        "status": "active"
    })
)]
pub struct Guard {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub tenant_id: u64,

    #[schema(example = "GRD-001")]
    pub guard_code: String,

    #[schema(example = "Ravi")]
    pub first_name: String,

    #[schema(example = "Kumar")]
    pub last_name: String,

    #[schema(example = "ravi.kumar@agency.com")]
    pub email: Option<String>,

    #[schema(example = "+919812345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(
        example = "2024-01-01",
        value_type = String,
        format = "date"
    )]
    pub joining_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}
