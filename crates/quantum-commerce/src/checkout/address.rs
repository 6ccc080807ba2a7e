//! Address types.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{AddressId, OrderId};

/// Whether an order address is used for shipping or billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressKind {
    Shipping,
    Billing,
}

impl AddressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressKind::Shipping => "SHIPPING",
            AddressKind::Billing => "BILLING",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "SHIPPING" => Some(AddressKind::Shipping),
            "BILLING" => Some(AddressKind::Billing),
            _ => None,
        }
    }
}

fn default_country_code() -> String {
    "US".to_string()
}

/// A postal address as entered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub line1: String,
    /// Apartment, suite, etc.
    pub line2: Option<String>,
    pub city: String,
    /// State or province.
    pub region: String,
    pub postal_code: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Address {
    pub fn new(
        line1: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: None,
            last_name: None,
            company: None,
            phone: None,
            line1: line1.into(),
            line2: None,
            city: city.into(),
            region: region.into(),
            postal_code: postal_code.into(),
            country_code: default_country_code(),
        }
    }

    /// Required fields that are blank, by name.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.line1.trim().is_empty() {
            missing.push("address line 1");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.region.trim().is_empty() {
            missing.push("region");
        }
        if self.postal_code.trim().is_empty() {
            missing.push("postal code");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn validate(&self, kind: AddressKind) -> Result<(), CommerceError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        Err(CommerceError::validation(format!(
            "{} address is missing {}",
            kind.as_str().to_lowercase(),
            missing.join(", ")
        )))
    }

    /// Single-line form, e.g. "1 Crater Way, Apt 4, Roswell, NM 88201, US".
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.line1.clone()];
        if let Some(line2) = self.line2.as_deref().filter(|l| !l.is_empty()) {
            parts.push(line2.to_string());
        }
        parts.push(self.city.clone());
        parts.push(format!("{} {}", self.region, self.postal_code));
        parts.push(self.country_code.clone());
        parts.join(", ")
    }
}

/// An address attached to a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderAddress {
    pub id: AddressId,
    pub order_id: OrderId,
    pub kind: AddressKind,
    #[serde(flatten)]
    pub address: Address,
}

impl OrderAddress {
    pub fn new(order_id: OrderId, kind: AddressKind, address: Address) -> Self {
        Self {
            id: AddressId::generate(),
            order_id,
            kind,
            address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_address() {
        let addr = Address::new("1 Crater Way", "Roswell", "NM", "88201");
        assert!(addr.is_complete());
        assert!(addr.validate(AddressKind::Shipping).is_ok());
        assert_eq!(addr.one_line(), "1 Crater Way, Roswell, NM 88201, US");
    }

    #[test]
    fn test_missing_fields_are_named() {
        let addr = Address::new("", "Roswell", " ", "88201");
        assert_eq!(addr.missing_fields(), vec!["address line 1", "region"]);

        let err = addr.validate(AddressKind::Billing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: billing address is missing address line 1, region"
        );
    }

    #[test]
    fn test_country_defaults_to_us() {
        let json = r#"{"line1":"1 Crater Way","city":"Roswell","region":"NM","postal_code":"88201"}"#;
        let addr: Address = serde_json::from_str(json).unwrap();
        assert_eq!(addr.country_code, "US");
        assert_eq!(addr.first_name, None);
    }
}
