//! HTTP and API response handling.

use crate::DataError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// A raw HTTP response from the transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, DataError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| DataError::Decode(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DataError> {
        serde_json::from_slice(&self.body).map_err(|e| DataError::Json(e.to_string()))
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, DataError> {
        if self.is_success() {
            Ok(self)
        } else {
            let message = self.text().unwrap_or_else(|_| "Unknown error".to_string());
            Err(DataError::Http {
                status: self.status,
                message,
            })
        }
    }
}

/// The body returned by `/execute`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub affected_rows: u64,
    #[serde(default)]
    pub execution_time_ms: f64,
    #[serde(default)]
    pub returned_data: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Turn `success: false` into [`DataError::Rejected`].
    pub fn into_result(self) -> Result<Self, DataError> {
        if self.success {
            Ok(self)
        } else {
            Err(DataError::Rejected(
                self.error
                    .unwrap_or_else(|| format!("{} on {} failed", self.operation, self.table)),
            ))
        }
    }

    pub fn returned(&self) -> &[Value] {
        self.returned_data.as_deref().unwrap_or(&[])
    }

    /// Decode every returned row.
    pub fn rows<T: DeserializeOwned>(&self) -> Result<Vec<T>, DataError> {
        self.returned()
            .iter()
            .map(|row| decode_row(row.clone()))
            .collect()
    }

    /// Decode the first returned row, if any.
    pub fn first<T: DeserializeOwned>(&self) -> Result<Option<T>, DataError> {
        self.returned()
            .first()
            .map(|row| decode_row(row.clone()))
            .transpose()
    }
}

fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T, DataError> {
    serde_json::from_value(row).map_err(|e| DataError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> RawResponse {
        RawResponse::new(status, body.to_vec())
    }

    #[test]
    fn test_raw_response_status_classes() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(299, b"").is_success());
        assert!(!make_response(300, b"").is_success());
        assert!(make_response(404, b"").is_client_error());
        assert!(make_response(503, b"").is_server_error());
    }

    #[test]
    fn test_error_for_status_keeps_body() {
        let err = make_response(500, b"db down").error_for_status().unwrap_err();
        assert_eq!(
            err,
            DataError::Http {
                status: 500,
                message: "db down".into()
            }
        );
        assert!(make_response(201, b"").error_for_status().is_ok());
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = br#"{
            "success": true,
            "operation": "select",
            "table": "carts",
            "affected_rows": 1,
            "execution_time_ms": 3.5,
            "returned_data": [{"id": "c1", "status": "OPEN"}]
        }"#;
        let response: ApiResponse = make_response(200, body).json().unwrap();
        let response = response.into_result().unwrap();
        assert_eq!(response.affected_rows, 1);

        #[derive(Deserialize, Debug, PartialEq)]
        struct Row {
            id: String,
            status: String,
        }
        let first: Option<Row> = response.first().unwrap();
        assert_eq!(
            first,
            Some(Row {
                id: "c1".into(),
                status: "OPEN".into()
            })
        );
    }

    #[test]
    fn test_failure_envelope_is_rejected() {
        let body = br#"{"success": false, "operation": "insert", "table": "orders", "error": "null value in column \"email\""}"#;
        let response: ApiResponse = make_response(200, body).json().unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(
            err,
            DataError::Rejected("null value in column \"email\"".into())
        );
    }

    #[test]
    fn test_missing_and_null_returned_data() {
        let response: ApiResponse =
            make_response(200, br#"{"success": true, "returned_data": null}"#)
                .json()
                .unwrap();
        assert!(response.returned().is_empty());
        let rows: Vec<Value> = response.rows().unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_bad_row_is_decode_error() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Row {
            quantity: i64,
        }
        let response: ApiResponse = make_response(
            200,
            br#"{"success": true, "returned_data": [{"quantity": "lots"}]}"#,
        )
        .json()
        .unwrap();
        assert!(matches!(
            response.rows::<Row>(),
            Err(DataError::Decode(_))
        ));
    }
}
