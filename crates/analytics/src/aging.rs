//! Accounts-receivable ageing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bizap_invoicing::Invoice;

/// Ageing bucket by days past the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgingBucket {
    /// Not yet due.
    Current,
    /// 1–30 days overdue.
    #[serde(rename = "PAST_30")]
    Past30,
    /// 31–60 days overdue.
    #[serde(rename = "PAST_60")]
    Past60,
    /// 61+ days overdue.
    #[serde(rename = "PAST_90")]
    Past90,
}

impl AgingBucket {
    pub fn for_days_past_due(days: i64) -> Self {
        match days {
            d if d <= 0 => AgingBucket::Current,
            1..=30 => AgingBucket::Past30,
            31..=60 => AgingBucket::Past60,
            _ => AgingBucket::Past90,
        }
    }
}

/// Outstanding totals per ageing bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutstandingByAging {
    pub current: f64,
    pub past_30: f64,
    pub past_60: f64,
    pub past_90: f64,
    pub invoice_count: usize,
}

impl OutstandingByAging {
    pub fn total(&self) -> f64 {
        self.current + self.past_30 + self.past_60 + self.past_90
    }

    pub fn amount(&self, bucket: AgingBucket) -> f64 {
        match bucket {
            AgingBucket::Current => self.current,
            AgingBucket::Past30 => self.past_30,
            AgingBucket::Past60 => self.past_60,
            AgingBucket::Past90 => self.past_90,
        }
    }

    fn add(&mut self, bucket: AgingBucket, amount: f64) {
        let slot = match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Past30 => &mut self.past_30,
            AgingBucket::Past60 => &mut self.past_60,
            AgingBucket::Past90 => &mut self.past_90,
        };
        *slot += amount;
        self.invoice_count += 1;
    }
}

/// Days between the due date and `today` (negative when not yet due).
///
/// Invoices without a due date are treated as due today.
pub fn days_past_due(invoice: &Invoice, today: NaiveDate) -> i64 {
    invoice
        .due_date
        .map(|due| today.signed_duration_since(due).num_days())
        .unwrap_or(0)
}

/// An invoice still expecting money: sent (or partially paid / overdue),
/// not a quote, not deleted, with a positive balance.
pub(crate) fn is_receivable(invoice: &Invoice) -> bool {
    !invoice.is_quote
        && !invoice.is_deleted()
        && invoice.status.is_collectible()
        && invoice.outstanding_amount() > 0.0
}

/// Sum outstanding balances (total minus paid) per ageing bucket.
pub fn outstanding_by_aging(invoices: &[Invoice], today: NaiveDate) -> OutstandingByAging {
    let mut out = OutstandingByAging::default();
    for invoice in invoices.iter().filter(|i| is_receivable(i)) {
        let bucket = AgingBucket::for_days_past_due(days_past_due(invoice, today));
        out.add(bucket, invoice.outstanding_amount());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizap_core::{BusinessProfileId, InvoiceId};
    use bizap_invoicing::{InvoiceStatus, LineItem};
    use chrono::{Duration, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn sent(total: f64, days_overdue: i64) -> Invoice {
        let mut inv = Invoice::draft(
            InvoiceId::new(),
            BusinessProfileId::new(),
            "Acme",
            today() - Duration::days(90),
            "USD",
        )
        .with_item(LineItem::new("Work", 1.0, total))
        .with_due_date(today() - Duration::days(days_overdue));
        inv.transition_to(InvoiceStatus::Sent).unwrap();
        inv
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(AgingBucket::for_days_past_due(-5), AgingBucket::Current);
        assert_eq!(AgingBucket::for_days_past_due(0), AgingBucket::Current);
        assert_eq!(AgingBucket::for_days_past_due(1), AgingBucket::Past30);
        assert_eq!(AgingBucket::for_days_past_due(30), AgingBucket::Past30);
        assert_eq!(AgingBucket::for_days_past_due(31), AgingBucket::Past60);
        assert_eq!(AgingBucket::for_days_past_due(60), AgingBucket::Past60);
        assert_eq!(AgingBucket::for_days_past_due(61), AgingBucket::Past90);
    }

    #[test]
    fn sums_outstanding_per_bucket() {
        let mut partial = sent(300.0, 45);
        partial.record_payment(100.0, Utc::now()).unwrap();

        let invoices = vec![
            sent(100.0, -3),
            sent(50.0, 10),
            partial,
            sent(80.0, 90),
        ];

        let aging = outstanding_by_aging(&invoices, today());
        assert_eq!(aging.current, 100.0);
        assert_eq!(aging.past_30, 50.0);
        assert_eq!(aging.past_60, 200.0);
        assert_eq!(aging.past_90, 80.0);
        assert_eq!(aging.total(), 430.0);
        assert_eq!(aging.invoice_count, 4);
    }

    #[test]
    fn settled_drafts_and_quotes_are_excluded() {
        let mut paid = sent(100.0, 10);
        paid.record_payment(100.0, Utc::now()).unwrap();

        let draft = Invoice::draft(InvoiceId::new(), BusinessProfileId::new(), "A", today(), "USD")
            .with_item(LineItem::new("x", 1.0, 10.0));

        let mut quote = sent(10.0, 5);
        quote.is_quote = true;

        let mut deleted = sent(10.0, 5);
        deleted.soft_delete(Utc::now()).unwrap();

        let aging = outstanding_by_aging(&[paid, draft, quote, deleted], today());
        assert_eq!(aging, OutstandingByAging::default());
    }
}
