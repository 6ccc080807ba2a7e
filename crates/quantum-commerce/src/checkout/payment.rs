//! Payment step.
//!
//! There is no real gateway. The stub approves every authorization and
//! hands back a test token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CommerceError;
use crate::money::Money;

/// Proof that a payment was authorized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentConfirmation {
    pub token: String,
    pub amount: Money,
    pub authorized_at: DateTime<Utc>,
}

/// Something that can authorize a charge.
pub trait PaymentGateway {
    fn authorize(&self, amount: &Money) -> Result<PaymentConfirmation, CommerceError>;
}

/// Approves everything with a `pi_test_<millis>` token.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubPaymentGateway;

impl PaymentGateway for StubPaymentGateway {
    fn authorize(&self, amount: &Money) -> Result<PaymentConfirmation, CommerceError> {
        if amount.is_negative() {
            return Err(CommerceError::NegativePrice(*amount));
        }
        let now = Utc::now();
        let token = format!("pi_test_{}", now.timestamp_millis());
        debug!(%token, amount = %amount, "authorized stub payment");
        Ok(PaymentConfirmation {
            token,
            amount: *amount,
            authorized_at: now,
        })
    }
}
