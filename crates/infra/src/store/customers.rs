use std::collections::HashMap;
use std::sync::RwLock;

use bizap_core::{BusinessProfileId, CustomerId, StoreError};
use bizap_parties::{Customer, CustomerRepository};

use super::poisoned;

#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    inner: RwLock<HashMap<(BusinessProfileId, CustomerId), Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn save(&self, customer: Customer) -> Result<(), StoreError> {
        customer.validate()?;
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert((customer.business_profile_id, customer.id), customer);
        Ok(())
    }

    fn get(&self, profile: BusinessProfileId, id: &CustomerId) -> Option<Customer> {
        let map = self.inner.read().ok()?;
        map.get(&(profile, *id)).cloned()
    }

    fn list(&self, profile: BusinessProfileId) -> Vec<Customer> {
        let Ok(map) = self.inner.read() else {
            return vec![];
        };
        let mut customers: Vec<Customer> = map
            .iter()
            .filter_map(|((p, _), c)| (*p == profile).then(|| c.clone()))
            .collect();
        customers.sort_by(|a, b| a.display_name().cmp(b.display_name()));
        customers
    }

    fn delete(&self, profile: BusinessProfileId, id: &CustomerId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(&(profile, *id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("customer {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn scoped_by_profile_and_sorted() {
        let repo = InMemoryCustomerRepository::new();
        let mine = BusinessProfileId::new();
        let other = BusinessProfileId::new();

        repo.save(Customer::new(CustomerId::new(), mine, "Zed", Utc::now())).unwrap();
        repo.save(Customer::new(CustomerId::new(), mine, "Amy", Utc::now())).unwrap();
        repo.save(Customer::new(CustomerId::new(), other, "Bob", Utc::now())).unwrap();

        let names: Vec<String> = repo.list(mine).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }

    #[test]
    fn rejects_invalid_customers() {
        let repo = InMemoryCustomerRepository::new();
        let customer = Customer::new(CustomerId::new(), BusinessProfileId::new(), "  ", Utc::now());
        assert!(repo.save(customer).is_err());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let repo = InMemoryCustomerRepository::new();
        let err = repo.delete(BusinessProfileId::new(), &CustomerId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
