use std::sync::Arc;

use bizap_core::{BusinessProfileId, CustomerId, StoreError};

use crate::customer::Customer;

/// Persistence collaborator for customers, scoped per business profile.
pub trait CustomerRepository: Send + Sync {
    fn save(&self, customer: Customer) -> Result<(), StoreError>;
    fn get(&self, profile: BusinessProfileId, id: &CustomerId) -> Option<Customer>;
    /// Customers of a profile ordered by display name.
    fn list(&self, profile: BusinessProfileId) -> Vec<Customer>;
    /// Invoices referencing the customer are left untouched.
    fn delete(&self, profile: BusinessProfileId, id: &CustomerId) -> Result<(), StoreError>;
}

impl<R> CustomerRepository for Arc<R>
where
    R: CustomerRepository + ?Sized,
{
    fn save(&self, customer: Customer) -> Result<(), StoreError> {
        (**self).save(customer)
    }

    fn get(&self, profile: BusinessProfileId, id: &CustomerId) -> Option<Customer> {
        (**self).get(profile, id)
    }

    fn list(&self, profile: BusinessProfileId) -> Vec<Customer> {
        (**self).list(profile)
    }

    fn delete(&self, profile: BusinessProfileId, id: &CustomerId) -> Result<(), StoreError> {
        (**self).delete(profile, id)
    }
}
