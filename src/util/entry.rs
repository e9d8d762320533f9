//! Monetary amounts, expenses and the immutable record of a month

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;
use std::ops;

/// Fixed-point amount of money, in hundredths
///
/// Arithmetic saturates instead of overflowing. Amounts read from user
/// input are bounded by `Amount::MAX`, so saturation takes tens of
/// thousands of maximal amounts before it affects a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(pub isize);

impl Amount {
    pub const ZERO: Self = Self(0);
    /// Largest magnitude accepted from user input, a trillion units
    pub const MAX: Self = Self(100_000_000_000_000);

    /// Build from a whole number of units
    #[cfg(test)]
    pub fn units(n: isize) -> Self {
        Self(n * 100)
    }

    /// Round a float to the nearest hundredth
    ///
    /// Fails on NaN and infinities, and on values whose magnitude
    /// exceeds `Amount::MAX`.
    pub fn from_f64(x: f64) -> Result<Self, AmountError> {
        if !x.is_finite() {
            return Err(AmountError::NotFinite);
        }
        let cents = (x * 100.0).round();
        if cents.abs() > Self::MAX.0 as f64 {
            Err(AmountError::OutOfRange)
        } else {
            Ok(Self(cents as isize))
        }
    }

    /// Parse user input such as `"1600"`, `" 42.5 "` or `"-3.25"`
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        match s.parse::<f64>() {
            Ok(x) => Self::from_f64(x),
            Err(_) => Err(AmountError::NotANumber(s.to_string())),
        }
    }

    /// Ratio `self / whole`
    ///
    /// A zero `whole` yields an infinite ratio (or NaN for `0 / 0`).
    pub fn ratio(self, whole: Amount) -> f64 {
        self.0 as f64 / whole.0 as f64
    }

    /// Share of `whole` in percentage points, unrounded
    pub fn percent_of(self, whole: Amount) -> f64 {
        self.ratio(whole) * 100.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl ops::Add for Amount {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl ops::Sub for Amount {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl<'a> std::iter::Sum<&'a Amount> for Amount {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Self>,
    {
        iter.copied().sum()
    }
}

/// Reasons for which some text is not an amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// nothing was provided
    Empty,
    /// text is not a decimal number
    NotANumber(String),
    /// NaN or infinite
    NotFinite,
    /// larger than `Amount::MAX` in magnitude
    OutOfRange,
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AmountError::*;
        match self {
            Empty => write!(f, "no amount was provided"),
            NotANumber(s) => write!(f, "'{}' is not a number", s),
            NotFinite => write!(f, "amount is not a finite number"),
            OutOfRange => write!(f, "amount is larger than {}", Amount::MAX),
        }
    }
}

/// A named expense for a single month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub name: String,
    pub amount: Amount,
}

impl Expense {
    pub fn new<S>(name: S, amount: Amount) -> Self
    where
        S: ToString,
    {
        Self {
            name: name.to_string(),
            amount,
        }
    }

    /// Turn raw form fields into an expense
    ///
    /// Rows with an empty name or an amount that does not parse are
    /// treated as absent.
    pub fn from_fields(name: &str, amount: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Amount::parse(amount).ok().map(|amount| Self::new(name, amount))
    }
}

/// Salary and expenses of one period, with derived totals
///
/// Totals are computed once at construction and never again,
/// there is no way to mutate an entry after it was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthEntry {
    label: String,
    salary: Amount,
    expenses: Vec<Expense>,
    total_expenses: Amount,
    savings: Amount,
}

impl MonthEntry {
    pub fn new<S>(label: S, salary: Amount, expenses: Vec<Expense>) -> Self
    where
        S: ToString,
    {
        let total_expenses = expenses.iter().map(|e| e.amount).sum::<Amount>();
        Self {
            label: label.to_string(),
            salary,
            savings: salary - total_expenses,
            total_expenses,
            expenses,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn salary(&self) -> Amount {
        self.salary
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn total_expenses(&self) -> Amount {
        self.total_expenses
    }

    /// May be negative, it is not clamped
    pub fn savings(&self) -> Amount {
        self.savings
    }
}

/// Usual expense categories, offered as suggestions
///
/// Expense names are free text, these are only hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Category {
    Rent = 0,
    Groceries,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Education,
    Travel,
}

impl Category {
    pub const COUNT: usize = 8;

    /// All suggestions in their canonical order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).filter_map(Self::from_usize)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::str::FromStr for Category {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        Self::all()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}
