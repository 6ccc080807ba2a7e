//! Tabular API client for the Quantum storefront.
//!
//! Every read and write is a JSON envelope posted to
//! `{base_url}/tenants/{tenant_id}/databases/{database}/execute`.
//! [`TabularStore`] implements the storefront's
//! [`CatalogOrderStore`](quantum_commerce::store::CatalogOrderStore) on top of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use quantum_data::{ApiConfig, TabularClient, TabularStore};
//! use quantum_commerce::prelude::*;
//!
//! let config = ApiConfig { tenant_id: "acme".into(), ..Default::default() };
//! let store = TabularStore::new(TabularClient::connect(&config)?);
//! let shop = Storefront::new(store);
//! for product in shop.products()? {
//!     println!("{}", product.name);
//! }
//! ```

mod config;
mod error;
mod request;
mod response;
pub mod rows;
mod store;
mod transport;

pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use error::DataError;
pub use request::{ApiRequest, Comparison, Condition, Direction, Operation, OrderBy};
pub use response::{ApiResponse, RawResponse};
pub use store::TabularStore;
pub use transport::{HttpTransport, RecordedRequest, RecordingTransport, Transport};

use tracing::debug;

/// Client bound to one tenant database.
#[derive(Debug, Clone)]
pub struct TabularClient<T = HttpTransport> {
    transport: T,
    base_url: String,
    tenant_id: String,
    database: String,
}

impl TabularClient<HttpTransport> {
    /// Validate `config` and open an HTTP client for it.
    pub fn connect(config: &ApiConfig) -> Result<Self, DataError> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout())?;
        Ok(TabularClient::new(transport, &config.base_url, &config.tenant_id)
            .with_database(&config.database))
    }
}

impl<T: Transport> TabularClient<T> {
    /// A client for the `default` database of `tenant_id`.
    pub fn new(transport: T, base_url: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
            database: "default".to_string(),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/tenants/{}/databases/{}/execute",
            self.base_url.trim_end_matches('/'),
            self.tenant_id,
            self.database
        )
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Post `request` and decode the envelope.
    ///
    /// Non-2xx statuses and `success: false` bodies both come back as errors.
    pub fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, DataError> {
        let body = serde_json::to_vec(request)?;
        let response: ApiResponse = self
            .transport
            .post_json(&self.endpoint(), body)?
            .error_for_status()?
            .json()?;
        let response = response.into_result()?;
        debug!(
            operation = request.operation.as_str(),
            table = %request.table,
            affected_rows = response.affected_rows,
            execution_time_ms = response.execution_time_ms,
            "tabular request"
        );
        Ok(response)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ApiConfig, ApiRequest, DataError, Direction, TabularClient, TabularStore, Transport,
    };
}
