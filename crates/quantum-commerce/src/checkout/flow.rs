//! Checkout flow state machine.
//!
//! `Information -> Payment -> Processing -> Complete`. Each step gates on the
//! data the next one needs; placing the order happens while `Processing`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checkout::{Address, CheckoutRequest, CustomerDetails, PaymentConfirmation};
use crate::error::CommerceError;
use crate::ids::{CartId, OrderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Contact details and addresses.
    Information,
    Payment,
    /// Order is being written.
    Processing,
    Complete,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Information => "information",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Processing => "processing",
            CheckoutStep::Complete => "complete",
        }
    }

    /// 1-indexed position, for "step 2 of 4" displays.
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Information => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Processing => 3,
            CheckoutStep::Complete => 4,
        }
    }
}

/// In-progress checkout for one cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutFlow {
    pub cart_id: CartId,
    pub step: CheckoutStep,
    pub customer: Option<CustomerDetails>,
    pub shipping_address: Option<Address>,
    /// Ignored while `billing_same_as_shipping` is set.
    pub billing_address: Option<Address>,
    pub billing_same_as_shipping: bool,
    pub notes: Option<String>,
    pub payment: Option<PaymentConfirmation>,
    /// Set once the order has been placed.
    pub order_id: Option<OrderId>,
    pub updated_at: DateTime<Utc>,
}

impl CheckoutFlow {
    pub fn new(cart_id: CartId) -> Self {
        Self {
            cart_id,
            step: CheckoutStep::Information,
            customer: None,
            shipping_address: None,
            billing_address: None,
            billing_same_as_shipping: true,
            notes: None,
            payment: None,
            order_id: None,
            updated_at: Utc::now(),
        }
    }

    pub fn set_customer(&mut self, customer: CustomerDetails) {
        self.customer = Some(customer);
        self.touch();
    }

    pub fn set_shipping_address(&mut self, address: Address) {
        self.shipping_address = Some(address);
        self.touch();
    }

    pub fn set_billing_address(&mut self, address: Address) {
        self.billing_address = Some(address);
        self.billing_same_as_shipping = false;
        self.touch();
    }

    pub fn use_shipping_for_billing(&mut self) {
        self.billing_same_as_shipping = true;
        self.touch();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = Some(notes.into());
        self.touch();
    }

    pub fn record_payment(&mut self, payment: PaymentConfirmation) {
        self.payment = Some(payment);
        self.touch();
    }

    /// What still blocks moving to `step`.
    pub fn missing_for_step(&self, step: CheckoutStep) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match step {
            CheckoutStep::Information => {}
            CheckoutStep::Payment => {
                match &self.customer {
                    None => missing.push("customer details"),
                    Some(customer) => missing.extend(customer.missing_fields()),
                }
                match &self.shipping_address {
                    None => missing.push("shipping address"),
                    Some(addr) if !addr.is_complete() => missing.push("complete shipping address"),
                    Some(_) => {}
                }
                if !self.billing_same_as_shipping
                    && !self.billing_address.as_ref().map(Address::is_complete).unwrap_or(false)
                {
                    missing.push("complete billing address");
                }
            }
            CheckoutStep::Processing => {
                missing.extend(self.missing_for_step(CheckoutStep::Payment));
                if self.payment.is_none() {
                    missing.push("payment");
                }
            }
            CheckoutStep::Complete => {
                missing.extend(self.missing_for_step(CheckoutStep::Processing));
                if self.order_id.is_none() {
                    missing.push("placed order");
                }
            }
        }
        missing
    }

    pub fn can_advance_to(&self, step: CheckoutStep) -> bool {
        self.missing_for_step(step).is_empty()
    }

    /// Move to the next step.
    pub fn advance(&mut self) -> Result<CheckoutStep, CommerceError> {
        let next = match self.step {
            CheckoutStep::Information => CheckoutStep::Payment,
            CheckoutStep::Payment => CheckoutStep::Processing,
            CheckoutStep::Processing => CheckoutStep::Complete,
            CheckoutStep::Complete => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: CheckoutStep::Complete.as_str().to_string(),
                    to: "none".to_string(),
                })
            }
        };

        let missing = self.missing_for_step(next);
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }

        self.step = next;
        self.touch();
        Ok(next)
    }

    /// Step back. Not possible once the order is being placed.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = match self.step {
            CheckoutStep::Payment => CheckoutStep::Information,
            step => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: step.as_str().to_string(),
                    to: "previous".to_string(),
                })
            }
        };
        self.step = prev;
        self.touch();
        Ok(prev)
    }

    /// Assemble the placement request from the collected details.
    pub fn to_request(&self) -> Result<CheckoutRequest, CommerceError> {
        let missing = self.missing_for_step(CheckoutStep::Processing);
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }
        let (Some(customer), Some(shipping_address)) = (&self.customer, &self.shipping_address)
        else {
            return Err(CommerceError::CheckoutIncomplete(
                "customer details, shipping address".to_string(),
            ));
        };
        Ok(CheckoutRequest {
            cart_id: self.cart_id.clone(),
            customer: customer.clone(),
            shipping_address: shipping_address.clone(),
            billing_address: if self.billing_same_as_shipping {
                None
            } else {
                self.billing_address.clone()
            },
            notes: self.notes.clone(),
        })
    }

    /// Record the placed order and finish.
    pub fn complete(&mut self, order_id: OrderId) -> Result<(), CommerceError> {
        if self.step != CheckoutStep::Processing {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: CheckoutStep::Complete.as_str().to_string(),
            });
        }
        self.order_id = Some(order_id);
        self.advance()?;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
