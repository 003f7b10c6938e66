//! Dunning notices: escalating reminders for overdue customers.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bizap_core::{CustomerId, InvoiceId};
use bizap_invoicing::Invoice;

use crate::aging::{days_past_due, is_receivable};
use crate::snapshot::CustomerKey;

/// Escalation level of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// 1–30 days overdue.
    Reminder = 1,
    /// 31–60 days overdue.
    Warning = 2,
    /// 61+ days overdue.
    Final = 3,
}

impl NoticeLevel {
    /// Level for a positive number of days overdue.
    pub fn for_days_overdue(days: i64) -> Self {
        match days {
            d if d <= 30 => NoticeLevel::Reminder,
            31..=60 => NoticeLevel::Warning,
            _ => NoticeLevel::Final,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

/// One notice per customer with at least one overdue invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DunningNotice {
    pub customer_id: Option<CustomerId>,
    pub customer_name: String,
    pub invoice_ids: Vec<InvoiceId>,
    /// Outstanding balance summed across the customer's overdue invoices.
    pub total_due: f64,
    /// Days since the earliest due date among the overdue invoices.
    pub days_overdue: i64,
    pub notice_level: NoticeLevel,
}

/// Group overdue invoices by customer and emit one notice each.
///
/// Notices are ordered most severe first, then by amount due.
pub fn generate_dunning_notices(invoices: &[Invoice], today: NaiveDate) -> Vec<DunningNotice> {
    let mut by_customer: HashMap<CustomerKey, DunningNotice> = HashMap::new();

    for invoice in invoices.iter().filter(|i| is_receivable(i)) {
        let days = days_past_due(invoice, today);
        if days <= 0 {
            continue;
        }

        let notice = by_customer
            .entry(CustomerKey::of(invoice))
            .or_insert_with(|| DunningNotice {
                customer_id: invoice.customer_id,
                customer_name: invoice.customer_name.clone(),
                invoice_ids: Vec::new(),
                total_due: 0.0,
                days_overdue: 0,
                notice_level: NoticeLevel::Reminder,
            });

        notice.invoice_ids.push(invoice.id);
        notice.total_due += invoice.outstanding_amount();
        notice.days_overdue = notice.days_overdue.max(days);
    }

    let mut notices: Vec<DunningNotice> = by_customer
        .into_values()
        .map(|mut n| {
            n.notice_level = NoticeLevel::for_days_overdue(n.days_overdue);
            n
        })
        .collect();

    notices.sort_by(|a, b| {
        b.notice_level
            .cmp(&a.notice_level)
            .then(b.total_due.total_cmp(&a.total_due))
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });
    notices
}
