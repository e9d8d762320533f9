use crate::util::entry::{Amount, MonthEntry};

/// Totals over several months
///
/// Derived on demand from a history, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualSummary {
    months: usize,
    total_salary: Amount,
    total_expenses: Amount,
    total_savings: Amount,
}

impl AnnualSummary {
    /// Sum every column of `months`
    ///
    /// Callers must not pass an empty slice, `History::annual_report`
    /// guarantees at least two months.
    pub fn from_months(months: &[MonthEntry]) -> Self {
        debug_assert!(!months.is_empty());
        Self {
            months: months.len(),
            total_salary: months.iter().map(|m| m.salary()).sum(),
            total_expenses: months.iter().map(|m| m.total_expenses()).sum(),
            total_savings: months.iter().map(|m| m.savings()).sum(),
        }
    }

    pub fn months(&self) -> usize {
        self.months
    }

    pub fn total_salary(&self) -> Amount {
        self.total_salary
    }

    pub fn total_expenses(&self) -> Amount {
        self.total_expenses
    }

    pub fn total_savings(&self) -> Amount {
        self.total_savings
    }

    /// Mean savings per month, to the nearest hundredth
    pub fn average_monthly_savings(&self) -> Amount {
        Amount((self.total_savings.0 as f64 / self.months as f64).round() as isize)
    }

    /// Total savings over total salary, in percentage points
    pub fn savings_rate(&self) -> f64 {
        self.total_savings.percent_of(self.total_salary)
    }
}
