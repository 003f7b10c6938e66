use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use bizap_core::{CustomerId, InvoiceId, ValueObject};
use bizap_invoicing::Invoice;

/// Immutable projection of the analytics-relevant fields of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    pub invoice_id: InvoiceId,
    pub total_amount: f64,
    pub is_paid: bool,
    pub is_overdue: bool,
    pub invoice_date_ms: i64,
    pub paid_at_ms: Option<i64>,
}

impl ValueObject for InvoiceSnapshot {}

impl InvoiceSnapshot {
    pub fn from_invoice(invoice: &Invoice, today: NaiveDate) -> Self {
        Self {
            invoice_id: invoice.id,
            total_amount: invoice.total_amount,
            is_paid: invoice.is_paid(),
            is_overdue: invoice.is_overdue(today),
            invoice_date_ms: date_to_ms(invoice.date),
            paid_at_ms: invoice.paid_at.map(|t| t.timestamp_millis()),
        }
    }
}

/// Midnight UTC of `date`, in epoch milliseconds.
pub fn date_to_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Groups invoices by debtor.
///
/// Invoices linked to a customer record group by id; walk-in invoices without
/// one fall back to the denormalized name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomerKey {
    Id(CustomerId),
    Name(String),
}

impl CustomerKey {
    pub fn of(invoice: &Invoice) -> Self {
        match invoice.customer_id {
            Some(id) => CustomerKey::Id(id),
            None => CustomerKey::Name(invoice.customer_name.trim().to_string()),
        }
    }
}
