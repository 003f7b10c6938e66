use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bizap_core::{
    AggregateRoot, BusinessProfileId, CustomerId, DomainError, DomainResult, InvoiceId, LineItemId,
};

use crate::line_item::LineItem;
use crate::status::InvoiceStatus;

/// Amounts closer than this are treated as equal (half a minor unit).
const AMOUNT_EPSILON: f64 = 0.005;

/// Aggregate root: Invoice (or quote).
///
/// Owns its line items exclusively. `customer_name` is denormalized so the
/// invoice stays accurate after the customer record changes or disappears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub business_profile_id: BusinessProfileId,
    pub customer_id: Option<CustomerId>,
    pub customer_name: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub currency_code: String,
    pub status: InvoiceStatus,
    pub is_quote: bool,
    pub items: Vec<LineItem>,
    pub photo_uris: Vec<String>,
    pub header: String,
    pub subheader: String,
    pub notes: String,
    pub footer: String,
    pub pdf_uri: Option<String>,
    pub amount_paid: f64,
    /// Quote this invoice was converted from.
    pub parent_invoice_id: Option<InvoiceId>,
    pub version: u64,
    pub invoice_year: i32,
    pub invoice_sequence: u32,
    pub paid_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Create an empty draft. Items and totals are added afterwards.
    pub fn draft(
        id: InvoiceId,
        business_profile_id: BusinessProfileId,
        customer_name: impl Into<String>,
        date: NaiveDate,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            id,
            business_profile_id,
            customer_id: None,
            customer_name: customer_name.into(),
            date,
            due_date: None,
            total_amount: 0.0,
            currency_code: currency_code.into(),
            status: InvoiceStatus::Draft,
            is_quote: false,
            items: Vec::new(),
            photo_uris: Vec::new(),
            header: String::new(),
            subheader: String::new(),
            notes: String::new(),
            footer: String::new(),
            pdf_uri: None,
            amount_paid: 0.0,
            parent_invoice_id: None,
            version: 0,
            invoice_year: date.year(),
            invoice_sequence: 0,
            paid_at: None,
            deleted_at: None,
        }
    }

    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn as_quote(mut self) -> Self {
        self.is_quote = true;
        self
    }

    /// Append a line item and keep the total in step with the items.
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self.recalculate_total();
        self
    }

    pub fn items_total(&self) -> f64 {
        self.items.iter().map(LineItem::total).sum()
    }

    pub fn recalculate_total(&mut self) {
        self.total_amount = self.items_total();
    }

    pub fn outstanding_amount(&self) -> f64 {
        (self.total_amount - self.amount_paid).max(0.0)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Human-facing number, e.g. `2024-0007`.
    pub fn document_number(&self) -> String {
        format!("{}-{:04}", self.invoice_year, self.invoice_sequence)
    }

    /// Whether the invoice is past due and still expects money on `today`.
    ///
    /// Drafts and quotes are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.is_quote || self.is_deleted() || !self.status.is_collectible() {
            return false;
        }
        if self.outstanding_amount() <= AMOUNT_EPSILON {
            return false;
        }
        if self.status == InvoiceStatus::Overdue {
            return true;
        }
        matches!(self.due_date, Some(due) if due < today)
    }

    /// Validate before persisting.
    pub fn validate(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "invoice must contain at least one line item",
            ));
        }
        if self.customer_name.trim().is_empty() {
            return Err(DomainError::validation("customer name must not be blank"));
        }
        if !(self.total_amount.is_finite() && self.total_amount > 0.0) {
            return Err(DomainError::validation("invoice total must be positive"));
        }
        Ok(())
    }

    /// Move to `next` if the lifecycle allows it.
    pub fn transition_to(&mut self, next: InvoiceStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot move invoice from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        self.version += 1;
        Ok(())
    }

    /// Flag a sent invoice as overdue once its due date has passed.
    ///
    /// Returns whether the status changed.
    pub fn mark_overdue_if_due(&mut self, today: NaiveDate) -> bool {
        let due = matches!(
            self.status,
            InvoiceStatus::Sent | InvoiceStatus::PartiallyPaid
        ) && self.is_overdue(today);

        if due {
            self.status = InvoiceStatus::Overdue;
            self.version += 1;
        }
        due
    }

    /// Record a (partial) payment.
    ///
    /// A payment settles the invoice as `Paid` once nothing is outstanding,
    /// otherwise it becomes `PartiallyPaid`. Drafts may be paid directly and
    /// are treated as sent first; the move still obeys
    /// [`InvoiceStatus::can_transition_to`].
    pub fn record_payment(&mut self, amount: f64, at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_quote {
            return Err(DomainError::invariant("cannot record payment on a quote"));
        }
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "cannot record payment on {} invoice",
                self.status
            )));
        }
        if !(amount.is_finite() && amount > 0.0) {
            return Err(DomainError::validation("payment amount must be positive"));
        }

        let new_paid = self.amount_paid + amount;
        if new_paid > self.total_amount + AMOUNT_EPSILON {
            return Err(DomainError::invariant("cannot overpay invoice"));
        }

        let settled = self.total_amount - new_paid <= AMOUNT_EPSILON;
        let next = if settled {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };
        // Paying a draft sends it implicitly.
        let from = match self.status {
            InvoiceStatus::Draft => InvoiceStatus::Sent,
            other => other,
        };
        if from != next && !from.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot record payment on {} invoice",
                self.status
            )));
        }

        if settled {
            self.amount_paid = self.total_amount;
            self.paid_at = Some(at);
        } else {
            self.amount_paid = new_paid;
        }
        self.status = next;

        self.version += 1;
        Ok(())
    }

    /// Build a fresh draft invoice from this quote.
    ///
    /// Line items get new ids since they are owned by the new invoice.
    pub fn convert_quote_to_invoice(
        &self,
        new_id: InvoiceId,
        date: NaiveDate,
        sequence: u32,
    ) -> DomainResult<Invoice> {
        if !self.is_quote {
            return Err(DomainError::invariant("only quotes can be converted"));
        }
        if self.is_deleted() {
            return Err(DomainError::invariant("cannot convert a deleted quote"));
        }

        let mut invoice = Invoice::draft(
            new_id,
            self.business_profile_id,
            self.customer_name.clone(),
            date,
            self.currency_code.clone(),
        );
        invoice.customer_id = self.customer_id;
        invoice.items = self
            .items
            .iter()
            .map(|item| LineItem {
                id: LineItemId::new(),
                ..item.clone()
            })
            .collect();
        invoice.recalculate_total();
        invoice.photo_uris = self.photo_uris.clone();
        invoice.header = self.header.clone();
        invoice.subheader = self.subheader.clone();
        invoice.notes = self.notes.clone();
        invoice.footer = self.footer.clone();
        invoice.parent_invoice_id = Some(self.id);
        invoice.invoice_sequence = sequence;
        Ok(invoice)
    }

    /// Soft-delete: the row stays so documents keep a valid parent.
    pub fn soft_delete(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::conflict("invoice is already deleted"));
        }
        self.deleted_at = Some(at);
        self.version += 1;
        Ok(())
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(customer: &str) -> Invoice {
        Invoice::draft(
            InvoiceId::new(),
            BusinessProfileId::new(),
            customer,
            day(2024, 1, 1),
            "USD",
        )
    }

    fn sent_invoice(total: f64) -> Invoice {
        let mut inv = invoice("Acme").with_item(LineItem::new("Work", 1.0, total));
        inv.transition_to(InvoiceStatus::Sent).unwrap();
        inv
    }

    #[test]
    fn validate_rejects_empty_items() {
        let err = invoice("Acme").validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("line item")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_blank_customer_name() {
        let inv = invoice("  ").with_item(LineItem::new("Work", 1.0, 10.0));
        let err = inv.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("customer name")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_non_positive_total() {
        let inv = invoice("Acme").with_item(LineItem::new("Freebie", 1.0, 0.0));
        assert!(inv.validate().unwrap_err().is_validation());
    }

    #[test]
    fn validate_passes_with_items_and_name() {
        let inv = invoice("Acme").with_item(LineItem::new("Work", 2.0, 50.0));
        assert!(inv.validate().is_ok());
        assert_eq!(inv.total_amount, 100.0);
    }

    #[test]
    fn partial_then_full_payment_settles_invoice() {
        let mut inv = sent_invoice(200.0);
        let v0 = inv.version;

        inv.record_payment(50.0, Utc::now()).unwrap();
        assert_eq!(inv.status, InvoiceStatus::PartiallyPaid);
        assert_eq!(inv.outstanding_amount(), 150.0);

        inv.record_payment(150.0, Utc::now()).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert!(inv.paid_at.is_some());
        assert_eq!(inv.version, v0 + 2);
    }

    #[test]
    fn paying_a_draft_goes_through_sent() {
        let mut inv = invoice("Acme").with_item(LineItem::new("Work", 1.0, 100.0));
        assert!(!InvoiceStatus::Draft.can_transition_to(InvoiceStatus::Paid));

        inv.record_payment(40.0, Utc::now()).unwrap();
        assert_eq!(inv.status, InvoiceStatus::PartiallyPaid);
        assert!(InvoiceStatus::Sent.can_transition_to(inv.status));

        inv.record_payment(60.0, Utc::now()).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[test]
    fn cannot_overpay_invoice() {
        let mut inv = sent_invoice(200.0);
        let err = inv.record_payment(201.0, Utc::now()).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("overpay") => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn cannot_pay_void_invoice() {
        let mut inv = sent_invoice(200.0);
        inv.transition_to(InvoiceStatus::Void).unwrap();
        assert!(inv.record_payment(10.0, Utc::now()).is_err());
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let mut inv = sent_invoice(10.0);
        inv.transition_to(InvoiceStatus::Cancelled).unwrap();
        let err = inv.transition_to(InvoiceStatus::Sent).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn overdue_requires_past_due_date_and_balance() {
        let mut inv = sent_invoice(100.0).with_due_date(day(2024, 1, 31));
        assert!(!inv.is_overdue(day(2024, 1, 31)));
        assert!(inv.is_overdue(day(2024, 2, 1)));

        assert!(inv.mark_overdue_if_due(day(2024, 2, 1)));
        assert_eq!(inv.status, InvoiceStatus::Overdue);
        assert!(!inv.mark_overdue_if_due(day(2024, 2, 2)));

        inv.record_payment(100.0, Utc::now()).unwrap();
        assert!(!inv.is_overdue(day(2024, 3, 1)));
    }

    #[test]
    fn drafts_are_never_overdue() {
        let inv = invoice("Acme")
            .with_item(LineItem::new("Work", 1.0, 10.0))
            .with_due_date(day(2023, 1, 1));
        assert!(!inv.is_overdue(day(2024, 1, 1)));
    }

    #[test]
    fn quote_conversion_keeps_lineage_and_copies_items() {
        let quote = invoice("Acme")
            .as_quote()
            .with_item(LineItem::new("Design", 3.0, 100.0));

        let converted = quote
            .convert_quote_to_invoice(InvoiceId::new(), day(2024, 2, 1), 7)
            .unwrap();

        assert!(!converted.is_quote);
        assert_eq!(converted.parent_invoice_id, Some(quote.id));
        assert_eq!(converted.total_amount, 300.0);
        assert_eq!(converted.status, InvoiceStatus::Draft);
        assert_ne!(converted.items[0].id, quote.items[0].id);
        assert_eq!(converted.document_number(), "2024-0007");
    }

    #[test]
    fn only_quotes_convert() {
        let inv = sent_invoice(10.0);
        assert!(
            inv.convert_quote_to_invoice(InvoiceId::new(), day(2024, 1, 2), 1)
                .is_err()
        );
    }

    #[test]
    fn soft_delete_is_not_repeatable() {
        let mut inv = sent_invoice(10.0);
        inv.soft_delete(Utc::now()).unwrap();
        assert!(inv.is_deleted());
        assert!(matches!(
            inv.soft_delete(Utc::now()),
            Err(DomainError::Conflict(_))
        ));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any invoice with a non-blank name and a positive line validates.
            #[test]
            fn non_empty_invoice_validates(
                name in "[A-Za-z][A-Za-z0-9 ]{0,30}",
                qty in 1u32..1000,
                price in 1u32..100_000
            ) {
                let inv = invoice(&name).with_item(LineItem::new("x", qty as f64, price as f64 / 100.0));
                prop_assert!(inv.validate().is_ok());
            }

            /// Property: payments never push amount_paid above the total.
            #[test]
            fn payments_never_exceed_total(payments in proptest::collection::vec(1u32..500, 1..10)) {
                let mut inv = sent_invoice(1000.0);
                for p in payments {
                    let _ = inv.record_payment(p as f64, Utc::now());
                    prop_assert!(inv.amount_paid <= inv.total_amount + AMOUNT_EPSILON);
                }
            }
        }
    }
}
