//! Append-only record of the months entered during a session

use std::fmt;

use crate::util::{
    entry::{Amount, Expense, MonthEntry},
    summary::AnnualSummary,
};

/// Fewest months for which an annual report is produced
pub const MIN_MONTHS: usize = 2;

/// Months in the order they were entered
///
/// Entries are never sorted, edited or removed.
#[derive(Debug, Default)]
pub struct History {
    months: Vec<MonthEntry>,
}

/// Why an annual report could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// fewer than `MIN_MONTHS` months are recorded
    NotEnoughMonths(usize),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::NotEnoughMonths(_) => write!(
                f,
                "Add at least {} months of data to generate an annual report.",
                MIN_MONTHS
            ),
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the entry for a month and append it
    pub fn record<S>(&mut self, label: S, salary: Amount, expenses: Vec<Expense>) -> &MonthEntry
    where
        S: ToString,
    {
        let entry = MonthEntry::new(label, salary, expenses);
        tracing::info!(
            label = entry.label(),
            salary = %entry.salary(),
            expenses = %entry.total_expenses(),
            savings = %entry.savings(),
            "recorded month #{}",
            self.months.len() + 1,
        );
        self.months.push(entry);
        &self.months[self.months.len() - 1]
    }

    pub fn months(&self) -> &[MonthEntry] {
        &self.months
    }

    pub fn latest(&self) -> Option<&MonthEntry> {
        self.months.last()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Aggregate all months, refusing when there are too few of them
    ///
    /// Nothing is computed on refusal.
    pub fn annual_report(&self) -> Result<AnnualSummary, ReportError> {
        if self.months.len() < MIN_MONTHS {
            tracing::debug!(recorded = self.months.len(), "annual report refused");
            Err(ReportError::NotEnoughMonths(self.months.len()))
        } else {
            Ok(AnnualSummary::from_months(&self.months))
        }
    }
}
