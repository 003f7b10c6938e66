//! Revenue and payment-behaviour metrics over invoice snapshots.

use serde::{Deserialize, Serialize};

use crate::snapshot::InvoiceSnapshot;

const MS_PER_DAY: i64 = 86_400_000;

/// Days without a new invoice before a customer is considered at medium risk.
const CHURN_MEDIUM_AFTER_DAYS: i64 = 60;
/// Days without a new invoice before a customer is considered at high risk.
const CHURN_HIGH_AFTER_DAYS: i64 = 120;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum of invoice totals, optionally restricted to paid invoices.
pub fn customer_lifetime_value(snapshots: &[InvoiceSnapshot], paid_only: bool) -> f64 {
    snapshots
        .iter()
        .filter(|s| !paid_only || s.is_paid)
        .map(|s| s.total_amount)
        .sum()
}

/// Mean whole days between invoice date and payment, over paid snapshots.
///
/// Each interval is truncated to whole days before averaging; the mean is
/// truncated too. No paid snapshots → `0`.
pub fn average_days_to_payment(snapshots: &[InvoiceSnapshot]) -> i64 {
    let days: Vec<i64> = snapshots
        .iter()
        .filter(|s| s.is_paid)
        .filter_map(|s| s.paid_at_ms.map(|paid| (paid - s.invoice_date_ms) / MS_PER_DAY))
        .collect();

    if days.is_empty() {
        return 0;
    }
    days.iter().sum::<i64>() / days.len() as i64
}

/// Share of paid invoices, rounded to two decimals.
pub fn payment_rate(snapshots: &[InvoiceSnapshot]) -> f64 {
    ratio(snapshots, |s| s.is_paid)
}

/// Share of overdue invoices, rounded to two decimals.
pub fn overdue_percentage(snapshots: &[InvoiceSnapshot]) -> f64 {
    ratio(snapshots, |s| s.is_overdue)
}

fn ratio(snapshots: &[InvoiceSnapshot], pred: impl Fn(&InvoiceSnapshot) -> bool) -> f64 {
    if snapshots.is_empty() {
        return 0.0;
    }
    let hits = snapshots.iter().filter(|s| pred(s)).count();
    round2(hits as f64 / snapshots.len() as f64)
}

/// Relative change between two periods, rounded to two decimals.
///
/// A previous period of zero yields `0.0`.
pub fn month_over_month_growth(this_month: f64, last_month: f64) -> f64 {
    if last_month == 0.0 {
        return 0.0;
    }
    round2((this_month - last_month) / last_month)
}

/// Inputs of the business health score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthInputs {
    pub total_revenue: f64,
    pub paid_rate: f64,
    pub overdue_percentage: f64,
    pub mom_growth: f64,
    pub active_customer_count: usize,
}

/// Business health score in `[0, 100]`.
///
/// Starts at 50, rewards the paid rate (up to +40), penalizes the overdue share
/// (up to -20), and adds 10 each for growth above 5% and more than ten active
/// customers. Revenue is reported alongside but does not move the score.
pub fn health_score(inputs: &HealthInputs) -> i32 {
    let mut score: i32 = 50;
    score += (inputs.paid_rate * 40.0) as i32;
    score -= (inputs.overdue_percentage * 20.0) as i32;
    if inputs.mom_growth > 0.05 {
        score += 10;
    }
    if inputs.active_customer_count > 10 {
        score += 10;
    }
    score.clamp(0, 100)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Critical,
    Caution,
    Normal,
    Excellent,
}

/// Band a health score. Each band includes its lower bound.
pub fn health_status(score: i32) -> HealthStatus {
    match score {
        s if s < 30 => HealthStatus::Critical,
        s if s < 60 => HealthStatus::Caution,
        s if s < 80 => HealthStatus::Normal,
        _ => HealthStatus::Excellent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChurnRisk {
    Low,
    Medium,
    High,
}

/// Churn risk from the time since the customer's most recent invoice.
///
/// Up to 60 days is low, up to 120 medium, beyond that (or no history) high.
pub fn churn_risk(last_invoice_date_ms: Option<i64>, today_ms: i64) -> ChurnRisk {
    let Some(last) = last_invoice_date_ms else {
        return ChurnRisk::High;
    };
    let idle_days = (today_ms - last).max(0) / MS_PER_DAY;
    if idle_days <= CHURN_MEDIUM_AFTER_DAYS {
        ChurnRisk::Low
    } else if idle_days <= CHURN_HIGH_AFTER_DAYS {
        ChurnRisk::Medium
    } else {
        ChurnRisk::High
    }
}
