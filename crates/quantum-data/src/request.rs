//! Request envelope builder.

use serde::Serialize;
use serde_json::Value;

/// CRUD operations understood by the `execute` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Comparison operators for where conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
}

/// A single `column op value` filter. Conditions are ANDed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub column: String,
    pub op: Comparison,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// The JSON body posted to `/execute`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub operation: Operation,
    pub table: String,
    /// Rows to insert, or the single patch to apply on update.
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub where_conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub return_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl ApiRequest {
    fn new(operation: Operation, table: impl Into<String>) -> Self {
        Self {
            operation,
            table: table.into(),
            data: Vec::new(),
            where_conditions: Vec::new(),
            return_columns: Vec::new(),
            limit: None,
            offset: None,
            order_by: Vec::new(),
        }
    }

    pub fn select(table: impl Into<String>) -> Self {
        Self::new(Operation::Select, table)
    }

    /// Insert `rows`, each already serialized to a JSON object.
    pub fn insert(table: impl Into<String>, rows: Vec<Value>) -> Self {
        let mut request = Self::new(Operation::Insert, table);
        request.data = rows;
        request
    }

    /// Apply `patch` to every row matching the where conditions.
    pub fn update(table: impl Into<String>, patch: Value) -> Self {
        let mut request = Self::new(Operation::Update, table);
        request.data = vec![patch];
        request
    }

    pub fn delete(table: impl Into<String>) -> Self {
        Self::new(Operation::Delete, table)
    }

    /// Add a where condition.
    pub fn filter(mut self, column: impl Into<String>, op: Comparison, value: impl Into<Value>) -> Self {
        self.where_conditions.push(Condition {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Shorthand for an equality filter.
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Comparison::Eq, value)
    }

    pub fn returning(mut self, columns: &[&str]) -> Self {
        self.return_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_envelope_shape() {
        let request = ApiRequest::select("products")
            .eq("is_published", true)
            .eq("availability_status", "IN_STOCK")
            .order_by("created_at", Direction::Desc);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "operation": "select",
                "table": "products",
                "data": [],
                "where_conditions": [
                    {"column": "is_published", "op": "eq", "value": true},
                    {"column": "availability_status", "op": "eq", "value": "IN_STOCK"}
                ],
                "order_by": [{"column": "created_at", "direction": "DESC"}]
            })
        );
    }

    #[test]
    fn test_update_carries_single_patch() {
        let request = ApiRequest::update("orders", json!({"status": "COMPLETED"}))
            .eq("id", "o1")
            .returning(&["id", "status"]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["operation"], "update");
        assert_eq!(value["data"], json!([{"status": "COMPLETED"}]));
        assert_eq!(value["return_columns"], json!(["id", "status"]));
    }

    #[test]
    fn test_comparison_wire_names() {
        let request = ApiRequest::select("orders")
            .filter("status", Comparison::NotEq, "ARCHIVED")
            .filter("email", Comparison::Ilike, "%@kepler%")
            .limit(10)
            .offset(20);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["where_conditions"][0]["op"], "not_eq");
        assert_eq!(value["where_conditions"][1]["op"], "ilike");
        assert_eq!(value["limit"], 10);
        assert_eq!(value["offset"], 20);
    }
}
