//! Convert the contents of a budget file into month submissions

#![allow(clippy::upper_case_acronyms)]

use pest::Parser;
use pest_derive::*;

/// Wrapper around Pest's `Pair`
type Pair<'i> = pest::iterators::Pair<'i, Rule>;
/// Wrapper around Pest's `Pairs`
type Pairs<'i> = pest::iterators::Pairs<'i, Rule>;

use crate::load::error;
use crate::util::entry::{Amount, Expense};

/// Pest-generated parser
#[derive(Parser)]
#[grammar = "load/stipend.pest"]
pub struct StipendParser;

/// A month as it was written in the file, before aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub label: String,
    pub salary: Amount,
    pub expenses: Vec<Expense>,
}

/// Get the months described by `contents`
///
/// The return value may be non-empty even if some errors occured, caller
/// should check `errs.is_fatal()` rather than the length of the result.
pub fn extract(path: &str, errs: &mut error::Record, contents: &str) -> Vec<Submission> {
    match StipendParser::parse(Rule::program, contents) {
        Ok(pairs) => validate(path, errs, pairs),
        Err(e) => {
            errs.make("Parsing failure").from(e.with_path(path));
            Vec::new()
        }
    }
}

// extract contents of wrapper rule
macro_rules! subrule {
    ( $node:expr ) => {{
        let mut items = $node.into_inner();
        let fst = items.next().unwrap_or_else(|| panic!("No subrule"));
        assert!(items.next().is_none(), "Several subrules");
        fst
    }};
}

// extract three-element inner
macro_rules! triplet {
    ( $node:expr ) => {{
        let mut items = $node.into_inner();
        let fst = items.next().unwrap_or_else(|| panic!("No 1st"));
        let snd = items.next().unwrap_or_else(|| panic!("No 2nd"));
        (fst, snd, items)
    }};
}

/// Check all months
pub fn validate(path: &str, errs: &mut error::Record, pairs: Pairs) -> Vec<Submission> {
    let mut months = Vec::new();
    for pair in pairs {
        match pair.as_rule() {
            Rule::month => months.push(validate_month(path, errs, pair)),
            Rule::EOI => break,
            _ => unreachable!(),
        }
    }
    months
}

fn validate_month(path: &str, errs: &mut error::Record, pair: Pair) -> Submission {
    let (label, salary, body) = triplet!(pair);
    assert_eq!(label.as_rule(), Rule::label);
    assert_eq!(salary.as_rule(), Rule::salary);
    let label = read_text(subrule!(label));
    let salary = read_amount(path, errs, subrule!(salary));
    let mut expenses = Vec::new();
    for item in body {
        assert_eq!(item.as_rule(), Rule::expense);
        if let Some(expense) = validate_expense(path, errs, item) {
            expenses.push(expense);
        }
    }
    Submission {
        label,
        salary,
        expenses,
    }
}

/// Read one expense line
///
/// Lines with an empty name, a missing amount or an amount that is not
/// a number are dropped without a diagnostic.
fn validate_expense(path: &str, errs: &mut error::Record, pair: Pair) -> Option<Expense> {
    let loc = (path, pair.as_span());
    let mut items = pair.into_inner();
    let name = read_text(subrule!(items.next().unwrap_or_else(|| panic!("No name"))));
    let value = match items.next() {
        Some(value) => subrule!(value),
        None => {
            tracing::debug!(name = %name, "expense without amount dropped");
            return None;
        }
    };
    if name.is_empty() {
        tracing::debug!(amount = value.as_str(), "expense without name dropped");
        return None;
    }
    match value.as_rule() {
        Rule::money_amount => {
            let amount = read_amount(path, errs, value);
            if amount.is_negative() {
                errs.make("Negative expense")
                    .nonfatal()
                    .span(&loc, "amount is below zero")
                    .text(format!("'{}' lowers the total expenses by {}", name, Amount(-amount.0)))
                    .hint("move refunds into the salary instead");
            }
            Some(Expense::new(name, amount))
        }
        Rule::junk => {
            tracing::debug!(name = %name, amount = value.as_str(), "non-numeric expense dropped");
            None
        }
        _ => unreachable!(),
    }
}

/// Text of a word or of a quoted string, without the quotes
fn read_text(pair: Pair) -> String {
    match pair.as_rule() {
        Rule::word => pair.as_str().to_string(),
        Rule::quoted => pair
            .into_inner()
            .next()
            .map(|s| s.as_str().trim().to_string())
            .unwrap_or_default(),
        _ => unreachable!(),
    }
}

/// Parse an amount of money
///
/// Grammar ensures the text is a number with at most two decimals,
/// only its magnitude can be rejected.
fn read_amount(path: &str, errs: &mut error::Record, pair: Pair) -> Amount {
    assert_eq!(pair.as_rule(), Rule::money_amount);
    let loc = (path, pair.as_span());
    match Amount::parse(pair.as_str()) {
        Ok(amount) => amount,
        Err(e) => {
            errs.make("Amount out of range")
                .span(&loc, e)
                .hint(format!("amounts are limited to {} in magnitude", Amount::MAX));
            Amount::ZERO
        }
    }
}
