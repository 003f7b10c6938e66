use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use bizap_core::{BusinessProfileId, CustomerId, InvoiceId, StoreError};

use crate::invoice::Invoice;
use crate::status::InvoiceStatus;

/// Persistence collaborator for invoices and quotes.
///
/// Line items are owned by their invoice and stored with it. List queries
/// skip soft-deleted rows; `get` still returns them so documents can resolve
/// their parent.
pub trait InvoiceRepository: Send + Sync {
    fn save(&self, invoice: Invoice) -> Result<(), StoreError>;
    fn get(&self, id: &InvoiceId) -> Option<Invoice>;
    fn list(&self, profile: BusinessProfileId) -> Vec<Invoice>;
    fn list_by_customer(&self, profile: BusinessProfileId, customer_id: &CustomerId) -> Vec<Invoice>;
    /// Invoices dated within `from..=to`.
    fn list_in_range(&self, profile: BusinessProfileId, from: NaiveDate, to: NaiveDate) -> Vec<Invoice>;
    fn list_by_status(&self, profile: BusinessProfileId, status: InvoiceStatus) -> Vec<Invoice>;
    fn soft_delete(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<Invoice, StoreError>;
    /// Next free sequence number for `year`, counting deleted rows too.
    fn next_sequence(&self, profile: BusinessProfileId, year: i32) -> u32;
}

impl<R> InvoiceRepository for Arc<R>
where
    R: InvoiceRepository + ?Sized,
{
    fn save(&self, invoice: Invoice) -> Result<(), StoreError> {
        (**self).save(invoice)
    }

    fn get(&self, id: &InvoiceId) -> Option<Invoice> {
        (**self).get(id)
    }

    fn list(&self, profile: BusinessProfileId) -> Vec<Invoice> {
        (**self).list(profile)
    }

    fn list_by_customer(&self, profile: BusinessProfileId, customer_id: &CustomerId) -> Vec<Invoice> {
        (**self).list_by_customer(profile, customer_id)
    }

    fn list_in_range(&self, profile: BusinessProfileId, from: NaiveDate, to: NaiveDate) -> Vec<Invoice> {
        (**self).list_in_range(profile, from, to)
    }

    fn list_by_status(&self, profile: BusinessProfileId, status: InvoiceStatus) -> Vec<Invoice> {
        (**self).list_by_status(profile, status)
    }

    fn soft_delete(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<Invoice, StoreError> {
        (**self).soft_delete(id, at)
    }

    fn next_sequence(&self, profile: BusinessProfileId, year: i32) -> u32 {
        (**self).next_sequence(profile, year)
    }
}
