//! Transports that carry envelopes to the API.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use serde_json::Value;

use crate::{DataError, RawResponse};

/// Posts a JSON body and hands back the raw response.
pub trait Transport {
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, DataError>;
}

/// Blocking HTTP transport over reqwest.
///
/// Must not be driven from inside an async runtime thread; wrap calls in
/// `spawn_blocking` when used from async code.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, DataError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    DataError::Timeout
                } else {
                    DataError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| DataError::Transport(e.to_string()))?
            .to_vec();
        Ok(RawResponse::new(status, body))
    }
}

/// A request seen by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub body: Value,
}

/// Replays queued responses in order and records every request.
///
/// Used to drive the store without a live API. When the queue runs dry it
/// answers with an empty successful envelope.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: RefCell<VecDeque<Result<RawResponse, DataError>>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful envelope returning `rows`.
    pub fn push_rows(&self, rows: Vec<Value>) -> &Self {
        let body = serde_json::json!({
            "success": true,
            "affected_rows": rows.len(),
            "returned_data": rows,
        });
        self.push_raw(RawResponse::new(200, body.to_string().into_bytes()))
    }

    /// Queue an envelope reporting `affected_rows` with no returned data.
    pub fn push_affected(&self, affected_rows: u64) -> &Self {
        let body = serde_json::json!({ "success": true, "affected_rows": affected_rows });
        self.push_raw(RawResponse::new(200, body.to_string().into_bytes()))
    }

    pub fn push_raw(&self, response: RawResponse) -> &Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: DataError) -> &Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    /// Bodies of every request, in order.
    pub fn bodies(&self) -> Vec<Value> {
        self.requests.borrow().iter().map(|r| r.body.clone()).collect()
    }
}

impl Transport for RecordingTransport {
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, DataError> {
        let body: Value = serde_json::from_slice(&body)?;
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            body,
        });
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(RawResponse::new(
                200,
                br#"{"success": true, "affected_rows": 0, "returned_data": []}"#.to_vec(),
            ))
        })
    }
}
