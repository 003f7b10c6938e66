use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::json;
use tracing::info;

use bizap_core::{ExpectedVersion, InvoiceId};
use bizap_invoicing::{Invoice, InvoiceRepository};
use bizap_sync::{OperationType, PendingOperation, PendingOperationQueue};

use super::error::ServiceError;

const ENTITY_TYPE: &str = "invoice";

/// Invoice use cases. Every mutation is also queued for sync.
pub struct InvoiceService<I, Q> {
    invoices: I,
    queue: Q,
}

impl<I, Q> InvoiceService<I, Q>
where
    I: InvoiceRepository,
    Q: PendingOperationQueue,
{
    pub fn new(invoices: I, queue: Q) -> Self {
        Self { invoices, queue }
    }

    pub fn invoices(&self) -> &I {
        &self.invoices
    }

    /// Validate and persist an invoice or quote.
    ///
    /// A zero total is recomputed from the line items first. New invoices
    /// without a sequence get the next free one for their year. Updating a
    /// stale copy fails with [`DomainError::Conflict`](bizap_core::DomainError::Conflict).
    pub fn save_invoice(&self, mut invoice: Invoice, now: DateTime<Utc>) -> Result<Invoice, ServiceError> {
        if invoice.total_amount == 0.0 {
            invoice.recalculate_total();
        }
        invoice.validate()?;

        if invoice.invoice_sequence == 0 {
            invoice.invoice_year = invoice.date.year();
            invoice.invoice_sequence = self
                .invoices
                .next_sequence(invoice.business_profile_id, invoice.invoice_year);
        }

        // Edits must start from the stored revision.
        let operation_type = match self.invoices.get(&invoice.id) {
            Some(stored) => {
                ExpectedVersion::Exact(stored.version).check(invoice.version)?;
                invoice.version += 1;
                OperationType::Update
            }
            None => OperationType::Create,
        };

        self.invoices.save(invoice.clone())?;
        self.enqueue(operation_type, &invoice, now)?;

        info!(
            invoice_id = %invoice.id,
            number = %invoice.document_number(),
            operation = operation_type.as_str(),
            "saved invoice"
        );
        Ok(invoice)
    }

    pub fn record_payment(
        &self,
        id: &InvoiceId,
        amount: f64,
        at: DateTime<Utc>,
    ) -> Result<Invoice, ServiceError> {
        let mut invoice = self.load(id)?;
        invoice.record_payment(amount, at)?;
        self.invoices.save(invoice.clone())?;
        self.enqueue(OperationType::Update, &invoice, at)?;
        info!(invoice_id = %id, amount, status = %invoice.status, "recorded payment");
        Ok(invoice)
    }

    /// Turn a quote into a new draft invoice dated `date`.
    pub fn convert_quote(
        &self,
        quote_id: &InvoiceId,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Invoice, ServiceError> {
        let quote = self.load(quote_id)?;
        let sequence = self
            .invoices
            .next_sequence(quote.business_profile_id, date.year());
        let invoice = quote.convert_quote_to_invoice(InvoiceId::new(), date, sequence)?;

        self.invoices.save(invoice.clone())?;
        self.enqueue(OperationType::Create, &invoice, now)?;
        info!(quote_id = %quote_id, invoice_id = %invoice.id, "converted quote");
        Ok(invoice)
    }

    /// Soft-delete; the row stays for any documents that reference it.
    pub fn delete_invoice(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<Invoice, ServiceError> {
        let invoice = self.invoices.soft_delete(id, at)?;
        let operation = PendingOperation::new(
            OperationType::Delete,
            ENTITY_TYPE,
            id.to_string(),
            invoice.business_profile_id,
            json!({ "id": id.to_string() }),
            at,
        );
        self.queue.enqueue(operation)?;
        info!(invoice_id = %id, "deleted invoice");
        Ok(invoice)
    }

    fn load(&self, id: &InvoiceId) -> Result<Invoice, ServiceError> {
        self.invoices
            .get(id)
            .filter(|i| !i.is_deleted())
            .ok_or_else(|| ServiceError::NotFound(format!("invoice {id}")))
    }

    fn enqueue(
        &self,
        operation_type: OperationType,
        invoice: &Invoice,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let operation = PendingOperation::new(
            operation_type,
            ENTITY_TYPE,
            invoice.id.to_string(),
            invoice.business_profile_id,
            serde_json::to_value(invoice)?,
            now,
        );
        self.queue.enqueue(operation)?;
        Ok(())
    }
}
