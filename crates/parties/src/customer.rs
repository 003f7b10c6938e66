use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizap_core::{BusinessProfileId, CustomerId, DomainError, DomainResult, Entity};

/// Customer record.
///
/// Created on save, updated in place. Invoices reference customers by id and
/// carry their own copy of the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub business_profile_id: BusinessProfileId,
    pub name: String,
    pub business_name: Option<String>,
    pub business_number: Option<String>,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        business_profile_id: BusinessProfileId,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            business_profile_id,
            name: name.into(),
            business_name: None,
            business_number: None,
            address: String::new(),
            phone: String::new(),
            email: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_business(mut self, name: impl Into<String>, number: Option<String>) -> Self {
        self.business_name = Some(name.into());
        self.business_number = number;
        self
    }

    /// Name shown on documents: the business name when one is set.
    pub fn display_name(&self) -> &str {
        match self.business_name.as_deref() {
            Some(b) if !b.trim().is_empty() => b,
            _ => &self.name,
        }
    }

    /// Validate the record before it is persisted.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("customer name must not be blank"));
        }

        if let Some(email) = self.email.as_deref() {
            if !email.is_empty() && !is_valid_email(email) {
                return Err(DomainError::validation(format!(
                    "customer email is malformed: {email}"
                )));
            }
        }

        Ok(())
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Basic address-format check: `local@domain.tld`.
///
/// Exactly one `@`, no whitespace, non-empty local part, and a domain made of
/// at least two non-empty dot-separated labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(name: &str) -> Customer {
        Customer::new(CustomerId::new(), BusinessProfileId::new(), name, Utc::now())
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = customer("   ").validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn missing_email_is_fine() {
        assert!(customer("Acme").validate().is_ok());
        assert!(customer("Acme").with_email("").validate().is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["acme", "@acme.com", "a@b", "a@@b.com", "a b@c.com", "a@b..com", "a@.com"] {
            let err = customer("Acme").with_email(bad).validate().unwrap_err();
            assert!(err.is_validation(), "{bad} should be rejected");
        }
    }

    #[test]
    fn well_formed_email_passes() {
        assert!(customer("Acme").with_email("billing@acme.co.uk").validate().is_ok());
    }

    #[test]
    fn display_name_prefers_business_name() {
        let c = customer("Jane Doe").with_business("Acme Corp", None);
        assert_eq!(c.display_name(), "Acme Corp");

        let c = customer("Jane Doe").with_business("  ", None);
        assert_eq!(c.display_name(), "Jane Doe");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any generated `local@label.label` address passes the check.
            #[test]
            fn generated_addresses_are_valid(
                local in "[a-z0-9._+-]{1,20}",
                host in "[a-z0-9-]{1,15}",
                tld in "[a-z]{2,6}"
            ) {
                let email = format!("{local}@{host}.{tld}");
                prop_assert!(is_valid_email(&email));
            }

            /// Property: strings without an `@` are never valid.
            #[test]
            fn missing_at_is_invalid(s in "[a-z0-9.]{0,30}") {
                prop_assert!(!is_valid_email(&s));
            }
        }
    }
}
