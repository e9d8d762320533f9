//! Textual views: a month, its tips, and the annual report

use std::fmt;

use crate::cli::table::Table;
use crate::util::{
    entry::{Amount, MonthEntry},
    summary::AnnualSummary,
    tips::{self, Tip},
};

/// An amount prefixed with a currency symbol
pub struct Money<'c>(pub Amount, pub &'c str);

impl fmt::Display for Money<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.1, self.0)
    }
}

/// Aligned `label: value` lines
struct Lines {
    items: Vec<(String, String)>,
}

impl Lines {
    fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn push<L, V>(&mut self, label: L, value: V)
    where
        L: ToString,
        V: ToString,
    {
        self.items.push((label.to_string(), value.to_string()));
    }
}

impl fmt::Display for Lines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .items
            .iter()
            .map(|(l, _)| l.chars().count() + 1)
            .max()
            .unwrap_or(0);
        for (label, value) in &self.items {
            writeln!(f, "{:<width$} {}", format!("{}:", label), value, width = width)?;
        }
        Ok(())
    }
}

/// Summary of a single month, with each expense as a share of the salary
pub struct MonthReport<'d> {
    entry: &'d MonthEntry,
    currency: &'d str,
}

impl<'d> MonthReport<'d> {
    pub fn new(entry: &'d MonthEntry, currency: &'d str) -> Self {
        Self { entry, currency }
    }

    fn lines(&self) -> Lines {
        let e = self.entry;
        let share = |a: Amount| {
            format!("{} ({:.2}%)", Money(a, self.currency), a.percent_of(e.salary()))
        };
        let mut lines = Lines::new();
        lines.push("Month", e.label());
        lines.push("Total Salary", Money(e.salary(), self.currency));
        for expense in e.expenses() {
            lines.push(&expense.name, share(expense.amount));
        }
        lines.push("Savings", share(e.savings()));
        lines
    }
}

impl fmt::Display for MonthReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines())
    }
}

/// Bulleted list of tips
///
/// Bullets are plain unless `colored` is set, callers enable it only
/// when writing to a terminal.
pub struct TipList<'t> {
    title: &'t str,
    tips: &'t [Tip],
    color: bool,
}

impl<'t> TipList<'t> {
    pub fn from(tips: &'t [Tip]) -> Self {
        Self {
            title: "Tips",
            tips,
            color: false,
        }
    }

    pub fn with_title(mut self, title: &'t str) -> Self {
        self.title = title;
        self
    }

    pub fn colored(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

const WARN: &str = "\x1b[0;93;1m";
const GOOD: &str = "\x1b[0;92;1m";
const NONE: &str = "\x1b[0m";

impl fmt::Display for TipList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for tip in self.tips {
            if self.color {
                let color = if tip.is_warning() { WARN } else { GOOD };
                writeln!(f, "  {}*{} {}", color, NONE, tip)?;
            } else {
                writeln!(f, "  * {}", tip)?;
            }
        }
        Ok(())
    }
}

/// Totals, per-month breakdown and the annual tip
pub struct AnnualReport<'d> {
    summary: AnnualSummary,
    months: &'d [MonthEntry],
    currency: &'d str,
    color: bool,
}

impl<'d> AnnualReport<'d> {
    pub fn new(summary: AnnualSummary, months: &'d [MonthEntry], currency: &'d str) -> Self {
        Self {
            summary,
            months,
            currency,
            color: false,
        }
    }

    pub fn colored(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn tip(&self) -> Tip {
        tips::classify_annual(self.summary.total_salary(), self.summary.total_savings())
    }
}

impl fmt::Display for AnnualReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        let mut lines = Lines::new();
        lines.push("Months Recorded", s.months());
        lines.push("Total Salary (Year)", Money(s.total_salary(), self.currency));
        lines.push("Total Expenses (Year)", Money(s.total_expenses(), self.currency));
        lines.push("Total Savings (Year)", Money(s.total_savings(), self.currency));
        lines.push(
            "Average Monthly Savings",
            Money(s.average_monthly_savings(), self.currency),
        );
        lines.push("Savings Rate", format!("{:.2}%", s.savings_rate()));
        writeln!(f, "{}", lines)?;
        writeln!(
            f,
            "{}",
            Table::breakdown(self.months, self.currency).with_title("Monthly Breakdown")
        )?;
        let tip = [self.tip()];
        write!(
            f,
            "{}",
            TipList::from(&tip)
                .with_title("Annual Insights")
                .colored(self.color)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::{entry::Expense, history::History};

    #[test]
    fn month_lines() {
        let entry = MonthEntry::new(
            "2024-Jan",
            Amount::units(50000),
            vec![Expense::new("Rent", Amount::units(16000))],
        );
        let out = format!("{}", MonthReport::new(&entry, "₹"));
        let expected = "\
Month:        2024-Jan
Total Salary: ₹50000.00
Rent:         ₹16000.00 (32.00%)
Savings:      ₹34000.00 (68.00%)
";
        assert_eq!(&out, expected);
    }

    #[test]
    fn tips_are_listed() {
        let tips = vec![Tip::IncreaseSavings, Tip::WellBalanced];
        let out = format!("{}", TipList::from(&tips));
        assert!(out.starts_with("Tips\n"));
        assert!(out.contains("Increase Savings: Try to save at least 20% of your income."));
        assert!(out.contains("Great job! Your budget looks well-balanced."));
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains('\x1b'));
        assert!(out.contains("  * Increase Savings"));
    }

    #[test]
    fn colored_tips() {
        let tips = vec![Tip::LowRate, Tip::GoodRate];
        let out = format!("{}", TipList::from(&tips).colored(true));
        assert!(out.contains(&format!("{}*{} Low Savings Rate", WARN, NONE)));
        assert!(out.contains(&format!("{}*{} Good Savings Rate", GOOD, NONE)));
    }

    #[test]
    fn annual_report() {
        let mut history = History::new();
        history.record("Jan", Amount::units(60000), vec![Expense::new("Rent", Amount::units(55000))]);
        history.record("Feb", Amount::units(60000), vec![Expense::new("Rent", Amount::units(50000))]);
        let summary = history.annual_report().unwrap();
        let report = AnnualReport::new(summary, history.months(), "$");
        assert_eq!(report.tip(), Tip::LowRate);
        let out = format!("{}", report);
        assert!(out.contains("Total Salary (Year):     $120000.00"));
        assert!(out.contains("Total Savings (Year):    $15000.00"));
        assert!(out.contains("Average Monthly Savings: $7500.00"));
        assert!(out.contains("Months Recorded:         2\n"));
        assert!(out.contains("Savings Rate:            12.50%"));
        assert!(!out.contains('\x1b'));
        assert!(out.contains("Monthly Breakdown"));
        assert!(out.contains("Annual Insights"));
        assert!(out.contains("Low Savings Rate"));
    }
}
