//! `bizap-analytics`
//!
//! **Responsibility:** reporting over already-loaded invoices.
//!
//! Everything here is a pure function of its inputs: no IO, no clocks (callers
//! pass `today`), no shared state. Functions are safe to call from any thread.
//! Empty inputs and zero denominators yield neutral defaults (`0` / `0.0`)
//! instead of errors.

pub mod aging;
pub mod calculator;
pub mod dashboard;
pub mod dunning;
pub mod forecast;
pub mod snapshot;

pub use aging::{AgingBucket, OutstandingByAging, days_past_due, outstanding_by_aging};
pub use calculator::{
    ChurnRisk, HealthInputs, HealthStatus, average_days_to_payment, churn_risk,
    customer_lifetime_value, health_score, health_status, month_over_month_growth,
    overdue_percentage, payment_rate,
};
pub use dashboard::{
    CustomerInsight, DashboardSummary, build_dashboard, customer_insights, rank_customers_by_value,
};
pub use dunning::{DunningNotice, NoticeLevel, generate_dunning_notices};
pub use forecast::{CashFlowEntry, ConfidenceDecay, forecast_cash_flow};
pub use snapshot::{CustomerKey, InvoiceSnapshot};
