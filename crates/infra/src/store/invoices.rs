use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};

use bizap_core::{BusinessProfileId, CustomerId, InvoiceId, StoreError};
use bizap_invoicing::{Invoice, InvoiceRepository, InvoiceStatus};

use super::poisoned;

/// Invoices keyed by id; line items live inside their invoice.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    inner: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn live<F>(&self, profile: BusinessProfileId, keep: F) -> Vec<Invoice>
    where
        F: Fn(&Invoice) -> bool,
    {
        let Ok(map) = self.inner.read() else {
            return vec![];
        };
        let mut invoices: Vec<Invoice> = map
            .values()
            .filter(|i| i.business_profile_id == profile && !i.is_deleted() && keep(i))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.invoice_sequence.cmp(&b.invoice_sequence))
        });
        invoices
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn save(&self, invoice: Invoice) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(invoice.id, invoice);
        Ok(())
    }

    fn get(&self, id: &InvoiceId) -> Option<Invoice> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn list(&self, profile: BusinessProfileId) -> Vec<Invoice> {
        self.live(profile, |_| true)
    }

    fn list_by_customer(&self, profile: BusinessProfileId, customer_id: &CustomerId) -> Vec<Invoice> {
        self.live(profile, |i| i.customer_id.as_ref() == Some(customer_id))
    }

    fn list_in_range(&self, profile: BusinessProfileId, from: NaiveDate, to: NaiveDate) -> Vec<Invoice> {
        self.live(profile, |i| i.date >= from && i.date <= to)
    }

    fn list_by_status(&self, profile: BusinessProfileId, status: InvoiceStatus) -> Vec<Invoice> {
        self.live(profile, |i| i.status == status)
    }

    fn soft_delete(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<Invoice, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let invoice = map
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("invoice {id}")))?;
        invoice.soft_delete(at)?;
        Ok(invoice.clone())
    }

    fn next_sequence(&self, profile: BusinessProfileId, year: i32) -> u32 {
        let Ok(map) = self.inner.read() else {
            return 1;
        };
        map.values()
            .filter(|i| i.business_profile_id == profile && i.invoice_year == year)
            .map(|i| i.invoice_sequence)
            .max()
            .unwrap_or(0)
            + 1
    }
}
