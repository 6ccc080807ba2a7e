//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::CustomerId;

/// Contact details collected on the information step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerDetails {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl CustomerDetails {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.first_name.trim().is_empty() {
            missing.push("first name");
        }
        if self.last_name.trim().is_empty() {
            missing.push("last name");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CommerceError::validation(format!(
                "customer is missing {}",
                missing.join(", ")
            )));
        }
        if !self.email.contains('@') {
            return Err(CommerceError::validation(format!(
                "invalid email address: {}",
                self.email.trim()
            )));
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// A customer record for these details.
    pub fn to_customer(&self, now: DateTime<Utc>) -> Customer {
        Customer {
            id: CustomerId::generate(),
            email: self.email.trim().to_lowercase(),
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            phone: self
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A stored customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CustomerDetails {
        CustomerDetails {
            email: " Zed@Andromeda.example ".into(),
            first_name: "Zed".into(),
            last_name: "Quorx".into(),
            phone: Some("  ".into()),
        }
    }

    #[test]
    fn test_valid_details() {
        assert!(details().validate().is_ok());
        let customer = details().to_customer(Utc::now());
        assert_eq!(customer.email, "zed@andromeda.example");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.display_name(), "Zed Quorx");
    }

    #[test]
    fn test_missing_names() {
        let d = CustomerDetails {
            first_name: "".into(),
            last_name: " ".into(),
            ..details()
        };
        assert_eq!(d.missing_fields(), vec!["first name", "last name"]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_email_needs_at_sign() {
        let d = CustomerDetails {
            email: "zed".into(),
            ..details()
        };
        assert!(matches!(d.validate(), Err(CommerceError::Validation(_))));
    }
}
