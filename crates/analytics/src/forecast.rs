//! Cash-flow forecast from open receivables.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use bizap_core::{DomainError, DomainResult};
use bizap_invoicing::Invoice;

use crate::aging::{days_past_due, is_receivable};

/// Collection confidence as a function of days overdue.
///
/// Linear decay: `1.0` for invoices that are not overdue, minus `per_day` for
/// each day overdue, never below `floor`. Non-increasing in days overdue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceDecay {
    per_day: f64,
    floor: f64,
}

impl ConfidenceDecay {
    pub fn new(per_day: f64, floor: f64) -> DomainResult<Self> {
        if !(per_day.is_finite() && per_day >= 0.0) {
            return Err(DomainError::validation("decay per day must be non-negative"));
        }
        if !(0.0..=1.0).contains(&floor) {
            return Err(DomainError::validation("confidence floor must be within [0, 1]"));
        }
        Ok(Self { per_day, floor })
    }

    pub fn confidence(&self, days_overdue: i64) -> f64 {
        if days_overdue <= 0 {
            return 1.0;
        }
        (1.0 - self.per_day * days_overdue as f64).max(self.floor)
    }
}

impl Default for ConfidenceDecay {
    /// 1% per day down to 25%: reached after 75 days overdue.
    fn default() -> Self {
        Self {
            per_day: 0.01,
            floor: 0.25,
        }
    }
}

/// One day of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub date: NaiveDate,
    /// Outstanding amounts attributed to this day, weighted by confidence.
    pub expected_inflow: f64,
    /// Outstanding amounts attributed to this day, unweighted.
    pub outstanding: f64,
    /// Running sum of `expected_inflow` up to and including this day.
    pub cumulative: f64,
}

/// Forecast expected collections for `horizon_days` days starting at `today`.
///
/// Each open invoice lands on its due date; overdue invoices and invoices
/// without a due date land on `today` (assumed collectible immediately) at a
/// confidence given by `decay`. Invoices due beyond the horizon are left out.
pub fn forecast_cash_flow(
    invoices: &[Invoice],
    today: NaiveDate,
    horizon_days: u32,
    decay: &ConfidenceDecay,
) -> Vec<CashFlowEntry> {
    let horizon = horizon_days as usize;
    let mut weighted = vec![0.0; horizon];
    let mut raw = vec![0.0; horizon];

    for invoice in invoices.iter().filter(|i| is_receivable(i)) {
        let overdue_days = days_past_due(invoice, today);
        let offset = (-overdue_days).max(0) as usize;
        if offset >= horizon {
            continue;
        }
        let amount = invoice.outstanding_amount();
        weighted[offset] += amount * decay.confidence(overdue_days);
        raw[offset] += amount;
    }

    let mut cumulative = 0.0;
    let mut entries = Vec::with_capacity(horizon);
    for (offset, (inflow, outstanding)) in weighted.into_iter().zip(raw).enumerate() {
        cumulative += inflow;
        entries.push(CashFlowEntry {
            date: today + Duration::days(offset as i64),
            expected_inflow: inflow,
            outstanding,
            cumulative,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizap_core::{BusinessProfileId, InvoiceId};
    use bizap_invoicing::{InvoiceStatus, LineItem};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn sent(total: f64, due_in_days: i64) -> Invoice {
        let mut inv = Invoice::draft(
            InvoiceId::new(),
            BusinessProfileId::new(),
            "Acme",
            today() - Duration::days(60),
            "USD",
        )
        .with_item(LineItem::new("Work", 1.0, total))
        .with_due_date(today() + Duration::days(due_in_days));
        inv.transition_to(InvoiceStatus::Sent).unwrap();
        inv
    }

    #[test]
    fn zero_horizon_is_empty() {
        assert!(forecast_cash_flow(&[sent(10.0, 0)], today(), 0, &ConfidenceDecay::default()).is_empty());
    }

    #[test]
    fn attributes_to_due_date_and_accumulates() {
        let invoices = vec![sent(100.0, 2), sent(50.0, 5), sent(999.0, 30)];
        let entries = forecast_cash_flow(&invoices, today(), 7, &ConfidenceDecay::default());

        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].date, today());
        assert_eq!(entries[2].expected_inflow, 100.0);
        assert_eq!(entries[5].expected_inflow, 50.0);
        assert_eq!(entries[4].cumulative, 100.0);
        assert_eq!(entries[6].cumulative, 150.0);
    }

    #[test]
    fn overdue_lands_today_with_decayed_confidence() {
        let invoices = vec![sent(100.0, -10), sent(100.0, -500)];
        let entries = forecast_cash_flow(&invoices, today(), 3, &ConfidenceDecay::default());

        assert_eq!(entries[0].outstanding, 200.0);
        let expected = 100.0 * 0.9 + 100.0 * 0.25;
        assert!((entries[0].expected_inflow - expected).abs() < 1e-9);
        assert!((entries[2].cumulative - expected).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_decay_parameters() {
        assert!(ConfidenceDecay::new(-0.1, 0.2).is_err());
        assert!(ConfidenceDecay::new(0.1, 1.5).is_err());
        assert!(ConfidenceDecay::new(0.02, 0.1).is_ok());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: confidence never increases as an invoice ages.
            #[test]
            fn decay_is_monotonic(per_day in 0.0f64..0.2, floor in 0.0f64..1.0, days in 0i64..400) {
                let decay = ConfidenceDecay::new(per_day, floor).unwrap();
                prop_assert!(decay.confidence(days + 1) <= decay.confidence(days));
                prop_assert!(decay.confidence(days) >= floor.min(1.0));
            }

            /// Property: the cumulative column never decreases.
            #[test]
            fn cumulative_is_non_decreasing(
                dues in proptest::collection::vec(-100i64..100, 0..20),
                horizon in 1u32..60
            ) {
                let invoices: Vec<_> = dues.iter().map(|d| sent(10.0, *d)).collect();
                let entries = forecast_cash_flow(&invoices, today(), horizon, &ConfidenceDecay::default());
                prop_assert_eq!(entries.len(), horizon as usize);
                for pair in entries.windows(2) {
                    prop_assert!(pair[1].cumulative >= pair[0].cumulative);
                }
            }
        }
    }
}
