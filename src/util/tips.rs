//! Rule-based advice for a month or for a whole report
//!
//! Monthly rules, in order, each contributing at most one tip:
//! - savings below 20% of the salary
//! - first expense above 30% of the salary (in list order, not the largest)
//! - otherwise a single congratulation
//!
//! The annual rule looks only at the savings rate.
//!
//! A salary of zero is not special-cased: ratios become infinite or NaN
//! and go through the same comparisons.

use std::fmt;

use crate::util::entry::{Amount, MonthEntry};

/// Savings under this share of the salary call for more savings
pub const MIN_SAVINGS_SHARE: f64 = 0.20;
/// An expense above this share of the salary should be reduced
pub const MAX_EXPENSE_SHARE: f64 = 0.30;
/// Annual savings rate (percentage points) under which savings are low
pub const LOW_RATE: f64 = 15.0;
/// Annual savings rate (percentage points) over which savings are excellent
pub const EXCELLENT_RATE: f64 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Tip {
    IncreaseSavings,
    /// `share` is the unrounded `amount / salary`
    Reduce { category: String, share: f64 },
    WellBalanced,
    LowRate,
    GoodRate,
    ExcellentRate,
}

impl Tip {
    /// Heading of the tip, without the advice text
    pub fn title(&self) -> String {
        use Tip::*;
        match self {
            IncreaseSavings => "Increase Savings".to_string(),
            Reduce { category, .. } => format!("Reduce {}", category),
            WellBalanced => "Great job!".to_string(),
            LowRate => "Low Savings Rate".to_string(),
            GoodRate => "Good Savings Rate".to_string(),
            ExcellentRate => "Excellent Savings Rate".to_string(),
        }
    }

    /// Whether the tip is a warning rather than praise
    pub fn is_warning(&self) -> bool {
        matches!(self, Tip::IncreaseSavings | Tip::Reduce { .. } | Tip::LowRate)
    }
}

impl fmt::Display for Tip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Tip::*;
        let sep = if let WellBalanced = self { " " } else { ": " };
        write!(f, "{}{}", self.title(), sep)?;
        match self {
            IncreaseSavings => write!(f, "Try to save at least 20% of your income."),
            Reduce { share, .. } => write!(
                f,
                "This category takes {}% of your income.",
                (share * 100.0).round()
            ),
            WellBalanced => write!(f, "Your budget looks well-balanced."),
            LowRate => write!(
                f,
                "You're saving less than 15% of your income. Consider reducing discretionary spending."
            ),
            GoodRate => write!(
                f,
                "You're saving a healthy portion of your income. Keep it up!"
            ),
            ExcellentRate => write!(
                f,
                "You're saving more than 25% of your income! Consider investing some of these savings."
            ),
        }
    }
}

/// Advice for a single month
pub fn classify_month(entry: &MonthEntry) -> Vec<Tip> {
    let salary = entry.salary().0 as f64;
    let mut tips = Vec::new();
    if (entry.savings().0 as f64) < salary * MIN_SAVINGS_SHARE {
        tips.push(Tip::IncreaseSavings);
    }
    if let Some(high) = entry
        .expenses()
        .iter()
        .find(|e| e.amount.0 as f64 > salary * MAX_EXPENSE_SHARE)
    {
        tips.push(Tip::Reduce {
            category: high.name.clone(),
            share: high.amount.ratio(entry.salary()),
        });
    }
    if tips.is_empty() {
        tips.push(Tip::WellBalanced);
    }
    tips
}

/// Advice for a whole report from its totals
///
/// Boundaries 15 and 25 both fall in the middle band.
pub fn classify_annual(total_salary: Amount, total_savings: Amount) -> Tip {
    let rate = total_savings.percent_of(total_salary);
    if rate < LOW_RATE {
        Tip::LowRate
    } else if rate > EXCELLENT_RATE {
        Tip::ExcellentRate
    } else {
        Tip::GoodRate
    }
}
