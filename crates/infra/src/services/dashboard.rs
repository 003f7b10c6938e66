use chrono::NaiveDate;

use bizap_analytics::{
    CashFlowEntry, ConfidenceDecay, CustomerInsight, DashboardSummary, DunningNotice,
    OutstandingByAging, build_dashboard, customer_insights, forecast_cash_flow,
    generate_dunning_notices, outstanding_by_aging, rank_customers_by_value,
};
use bizap_core::BusinessProfileId;
use bizap_invoicing::InvoiceRepository;

/// Read-only reporting over a business profile's invoices.
pub struct DashboardService<I> {
    invoices: I,
    decay: ConfidenceDecay,
}

impl<I: InvoiceRepository> DashboardService<I> {
    pub fn new(invoices: I) -> Self {
        Self {
            invoices,
            decay: ConfidenceDecay::default(),
        }
    }

    pub fn with_decay(mut self, decay: ConfidenceDecay) -> Self {
        self.decay = decay;
        self
    }

    pub fn summary(&self, profile: BusinessProfileId, today: NaiveDate) -> DashboardSummary {
        build_dashboard(&self.invoices.list(profile), today)
    }

    pub fn aging(&self, profile: BusinessProfileId, today: NaiveDate) -> OutstandingByAging {
        outstanding_by_aging(&self.invoices.list(profile), today)
    }

    pub fn dunning(&self, profile: BusinessProfileId, today: NaiveDate) -> Vec<DunningNotice> {
        generate_dunning_notices(&self.invoices.list(profile), today)
    }

    pub fn forecast(
        &self,
        profile: BusinessProfileId,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Vec<CashFlowEntry> {
        forecast_cash_flow(&self.invoices.list(profile), today, horizon_days, &self.decay)
    }

    pub fn insights(&self, profile: BusinessProfileId, today: NaiveDate) -> Vec<CustomerInsight> {
        customer_insights(&self.invoices.list(profile), today)
    }

    pub fn top_customers(
        &self,
        profile: BusinessProfileId,
        today: NaiveDate,
        limit: usize,
    ) -> Vec<CustomerInsight> {
        rank_customers_by_value(self.insights(profile, today), limit)
    }
}
