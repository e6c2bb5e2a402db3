//! Convenience facade binding the configured preferences to a clock.

use std::sync::Arc;

use crate::{
    config::Config,
    errors::HorizonError,
    filter::{apply_filters, FilterableRecord, TransactionFilter},
    period::{
        financial_period, financial_period_by_tag, financial_period_by_type, FinancialPeriod,
        PeriodType,
    },
    recurring::{
        combine_with_virtual_occurrences, filter_by_financial_period, generate_virtual_occurrences,
        Obligation, ScheduledObligation, VirtualOccurrence,
    },
    time::{Clock, SystemClock},
};

/// Answers period, filter, and projection queries relative to "now".
pub struct Planner {
    config: Config,
    clock: Arc<dyn Clock>,
}

impl Planner {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn with_system_clock(config: Config) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn current_period(&self) -> FinancialPeriod {
        financial_period(self.config.month_start_day, self.clock.today())
    }

    /// Period of the configured default type.
    pub fn default_period(&self) -> FinancialPeriod {
        self.period_by_type(self.config.default_period)
    }

    pub fn period_by_type(&self, kind: PeriodType) -> FinancialPeriod {
        financial_period_by_type(kind, self.config.month_start_day, self.clock.today())
    }

    pub fn period_by_tag(&self, tag: &str) -> FinancialPeriod {
        financial_period_by_tag(tag, self.config.month_start_day, self.clock.today())
    }

    /// Empty filter narrowed to the configured default date range.
    pub fn default_filter(&self) -> TransactionFilter {
        TransactionFilter::new().with_date_range(self.config.default_date_range)
    }

    pub fn filter_transactions<T>(
        &self,
        records: &[T],
        filter: &TransactionFilter,
    ) -> Result<Vec<T>, HorizonError>
    where
        T: FilterableRecord + Clone,
    {
        apply_filters(records, filter, self.clock.now())
    }

    /// Virtual occurrences of one obligation over the configured horizon.
    pub fn project(&self, obligation: &Obligation) -> Vec<VirtualOccurrence> {
        generate_virtual_occurrences(obligation, self.config.months_ahead, self.clock.today())
    }

    /// Stored obligations plus projections, limited to the current period.
    pub fn schedule(&self, obligations: &[Obligation]) -> Vec<ScheduledObligation> {
        let combined = combine_with_virtual_occurrences(
            obligations,
            self.config.months_ahead,
            self.clock.today(),
        );
        filter_by_financial_period(&combined, &self.current_period())
    }
}
