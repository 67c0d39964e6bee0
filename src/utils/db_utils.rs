use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// SQL bindable value enum
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Comma-separated "?, ?, ?" for IN (...) clauses.
pub fn in_placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Build a dynamic UPDATE from a JSON payload, always guarded by the
/// current tenant. Clients cannot move a row between tenants or rewrite
/// its id through this path.
pub fn build_tenant_update_sql(
    table: &str,
    payload: &Value,
    id_value: u64,
    tenant_id: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if obj.contains_key("id") || obj.contains_key("tenant_id") {
        return Err(ErrorBadRequest("id and tenant_id cannot be updated"));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ? AND tenant_id = ?",
        table, set_clause
    );

    let mut values = Vec::with_capacity(obj.len() + 2);

    // Convert JSON values → SqlValue
    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ? AND tenant_id = ?
    values.push(SqlValue::I64(id_value as i64));
    values.push(SqlValue::I64(tenant_id as i64));

    Ok(SqlUpdate { sql, values })
}

pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_sql_carries_tenant_guard() {
        let update =
            build_tenant_update_sql("sites", &json!({"name": "North Gate"}), 7, 1).unwrap();
        assert_eq!(
            update.sql,
            "UPDATE sites SET name = ? WHERE id = ? AND tenant_id = ?"
        );
        assert_eq!(update.values.len(), 3);
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(build_tenant_update_sql("sites", &json!({}), 7, 1).is_err());
    }

    #[test]
    fn rejects_tenant_and_id_rewrites() {
        assert!(build_tenant_update_sql("sites", &json!({"tenant_id": 2}), 7, 1).is_err());
        assert!(build_tenant_update_sql("sites", &json!({"id": 99}), 7, 1).is_err());
    }

    #[test]
    fn date_strings_become_dates() {
        let update =
            build_tenant_update_sql("guards", &json!({"joining_date": "2026-01-01"}), 1, 1)
                .unwrap();
        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }

    #[test]
    fn in_placeholders_joins_question_marks() {
        assert_eq!(in_placeholders(1), "?");
        assert_eq!(in_placeholders(3), "?, ?, ?");
    }
}
