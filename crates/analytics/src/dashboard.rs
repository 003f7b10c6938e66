//! Dashboard and per-customer insight views.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use bizap_invoicing::{Invoice, InvoiceStatus};

use crate::aging::is_receivable;
use crate::calculator::{
    ChurnRisk, HealthInputs, HealthStatus, average_days_to_payment, churn_risk,
    customer_lifetime_value, health_score, health_status, month_over_month_growth,
    overdue_percentage, payment_rate,
};
use crate::snapshot::{CustomerKey, InvoiceSnapshot, date_to_ms};

/// A customer counts as active with an invoice in this many trailing days.
const ACTIVE_WINDOW_DAYS: i64 = 90;

/// Invoices that count towards analytics: real (non-quote), live, and issued.
fn counts_for_analytics(invoice: &Invoice) -> bool {
    !invoice.is_quote
        && !invoice.is_deleted()
        && !matches!(
            invoice.status,
            InvoiceStatus::Draft | InvoiceStatus::Void | InvoiceStatus::Cancelled
        )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Revenue collected (paid invoices).
    pub total_revenue: f64,
    pub total_outstanding: f64,
    pub paid_rate: f64,
    pub overdue_percentage: f64,
    pub mom_growth: f64,
    pub active_customer_count: usize,
    pub health_score: i32,
    pub health_status: HealthStatus,
}

/// Build the dashboard summary as of `today`.
///
/// Month-over-month growth compares amounts invoiced in the calendar month of
/// `today` against the previous calendar month.
pub fn build_dashboard(invoices: &[Invoice], today: NaiveDate) -> DashboardSummary {
    let live: Vec<&Invoice> = invoices.iter().filter(|i| counts_for_analytics(i)).collect();
    let snapshots: Vec<InvoiceSnapshot> = live
        .iter()
        .map(|i| InvoiceSnapshot::from_invoice(i, today))
        .collect();

    let total_revenue = customer_lifetime_value(&snapshots, true);
    let total_outstanding: f64 = live
        .iter()
        .filter(|i| is_receivable(i))
        .map(|i| i.outstanding_amount())
        .sum();
    let paid_rate = payment_rate(&snapshots);
    let overdue = overdue_percentage(&snapshots);

    let this_month = month_start(today);
    let last_month = month_start(this_month - Duration::days(1));
    let invoiced_in = |start: NaiveDate, end: NaiveDate| -> f64 {
        live.iter()
            .filter(|i| i.date >= start && i.date < end)
            .map(|i| i.total_amount)
            .sum()
    };
    let mom_growth = month_over_month_growth(
        invoiced_in(this_month, today + Duration::days(1)),
        invoiced_in(last_month, this_month),
    );

    let active_since = today - Duration::days(ACTIVE_WINDOW_DAYS);
    let active_customer_count = live
        .iter()
        .filter(|i| i.date >= active_since)
        .map(|i| CustomerKey::of(i))
        .collect::<HashSet<_>>()
        .len();

    let inputs = HealthInputs {
        total_revenue,
        paid_rate,
        overdue_percentage: overdue,
        mom_growth,
        active_customer_count,
    };
    let score = health_score(&inputs);

    DashboardSummary {
        total_revenue,
        total_outstanding,
        paid_rate,
        overdue_percentage: overdue,
        mom_growth,
        active_customer_count,
        health_score: score,
        health_status: health_status(score),
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Per-customer payment behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInsight {
    pub customer: CustomerKey,
    pub customer_name: String,
    pub invoice_count: usize,
    pub lifetime_value: f64,
    pub average_days_to_payment: i64,
    pub payment_rate: f64,
    pub churn_risk: ChurnRisk,
}

/// Compute insights for every customer that has issued invoices.
pub fn customer_insights(invoices: &[Invoice], today: NaiveDate) -> Vec<CustomerInsight> {
    let mut grouped: HashMap<CustomerKey, Vec<&Invoice>> = HashMap::new();
    for invoice in invoices.iter().filter(|i| counts_for_analytics(i)) {
        grouped.entry(CustomerKey::of(invoice)).or_default().push(invoice);
    }

    let today_ms = date_to_ms(today);
    let mut insights: Vec<CustomerInsight> = grouped
        .into_iter()
        .map(|(customer, group)| {
            let snapshots: Vec<InvoiceSnapshot> = group
                .iter()
                .map(|i| InvoiceSnapshot::from_invoice(i, today))
                .collect();
            // Most recent invoice carries the current spelling of the name.
            let latest = group.iter().max_by_key(|i| i.date);
            let last_ms = snapshots.iter().map(|s| s.invoice_date_ms).max();

            CustomerInsight {
                customer,
                customer_name: latest.map(|i| i.customer_name.clone()).unwrap_or_default(),
                invoice_count: group.len(),
                lifetime_value: customer_lifetime_value(&snapshots, true),
                average_days_to_payment: average_days_to_payment(&snapshots),
                payment_rate: payment_rate(&snapshots),
                churn_risk: churn_risk(last_ms, today_ms),
            }
        })
        .collect();

    insights.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));
    insights
}

/// Top customers by lifetime value; ties broken by name.
pub fn rank_customers_by_value(
    mut insights: Vec<CustomerInsight>,
    limit: usize,
) -> Vec<CustomerInsight> {
    insights.sort_by(|a, b| {
        b.lifetime_value
            .total_cmp(&a.lifetime_value)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });
    insights.truncate(limit);
    insights
}
