//! Pretty-printing facility for diagnostics on budget files
//!
//! Wraps `pest::error::Error::new_from_span` for the source excerpts,
//! and adds aggregation of messages, severity and colored output.
//!
//! # Example
//!
//! ```rust
//! errs.make("Negative expense")
//!     .nonfatal()
//!     .span(&loc, "amount is below zero")
//!     .text("Expenses are expected to be positive")
//!     .hint("move refunds into the salary instead");
//! ```
//!
//! ```txt
//! --> Warning: Negative expense
//!  |     --> budget.stp:4:10
//!  |      |
//!  |    4 |     Refund -200;
//!  |      |            ^--^
//!  |      |
//!  |      = amount is below zero
//!  |  Expenses are expected to be positive
//!  |      ? hint: move refunds into the salary instead
//! ```

use std::fmt;

use crate::load::parse::Rule;

/// Location of a diagnostic: file name and span within that file
pub type Loc<'i> = (&'i str, pest::Span<'i>);

/// A single diagnostic
///
/// Every message should fit on one line, add several `text` or `hint`
/// items rather than embedding newlines.
#[must_use]
#[derive(Debug)]
pub struct Error {
    fatal: bool,
    label: String,
    items: Vec<Item>,
}

#[derive(Debug)]
enum Item {
    /// source excerpt
    Block(pest::error::Error<Rule>),
    /// explanation
    Text(String),
    /// suggested fix
    Hint(String),
}

/// All diagnostics emitted while loading one or more files
#[must_use]
#[derive(Debug, Default)]
pub struct Record {
    contents: Vec<Error>,
}

impl Error {
    fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: true,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Wrap a parsing failure reported by pest
    pub fn from(&mut self, err: pest::error::Error<Rule>) -> &mut Self {
        self.items.push(Item::Block(err.renamed_rules(rule_rename)));
        self
    }

    /// Downgrade to a warning
    pub fn nonfatal(&mut self) -> &mut Self {
        self.fatal = false;
        self
    }

    /// Point at a region of the source
    pub fn span<S>(&mut self, loc: &Loc, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Block(
            pest::error::Error::new_from_span(
                pest::error::ErrorVariant::CustomError {
                    message: msg.to_string(),
                },
                loc.1.clone(),
            )
            .with_path(loc.0),
        ));
        self
    }

    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new diagnostic, fatal unless downgraded with `nonfatal`
    pub fn make<S>(&mut self, msg: S) -> &mut Error
    where
        S: ToString,
    {
        self.contents.push(Error::new(msg));
        let idx = self.contents.len() - 1;
        &mut self.contents[idx]
    }

    pub fn is_fatal(&self) -> bool {
        self.contents.iter().any(|e| e.fatal)
    }

    pub fn count_errors(&self) -> usize {
        self.contents.iter().filter(|e| e.fatal).count()
    }

    pub fn count_warnings(&self) -> usize {
        self.contents.len() - self.count_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

const RED: &str = "\x1b[0;91;1m";
const YELLOW: &str = "\x1b[0;93;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

/// Most diagnostics printed before the rest is summarized
const TRUNCATE: usize = 10;

impl Error {
    fn color(&self) -> &'static str {
        if self.fatal {
            RED
        } else {
            YELLOW
        }
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, err: &pest::error::Error<Rule>) -> fmt::Result {
        let color = self.color();
        for line in format!("{}", err).lines() {
            write!(f, " {}|  {}", color, BLUE)?;
            for c in line.chars() {
                match c {
                    '|' => write!(f, "|{}", NONE)?,
                    '=' => write!(f, "={}", NONE)?,
                    '^' => write!(f, "{}^", color)?,
                    '␊' => (),
                    _ => write!(f, "{}", c)?,
                }
            }
            writeln!(f, "{}", NONE)?;
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.color();
        let header = if self.fatal { "Error" } else { "Warning" };
        writeln!(f, "{}--> {}:{} {}{}", color, header, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Block(err) => self.write_block(f, err)?,
                Item::Text(txt) => writeln!(f, " {}|  {}{}{}", color, WHITE, txt, NONE)?,
                Item::Hint(txt) => writeln!(f, " {}|      {}? hint: {}{}", color, BLUE, NONE, txt)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contents.is_empty() {
            return Ok(());
        }
        // only the most severe class is shown
        let fatal = self.is_fatal();
        let (color, count, kind) = if fatal {
            (RED, self.count_errors(), "error")
        } else {
            (YELLOW, self.count_warnings(), "warning")
        };
        for err in self.contents.iter().filter(|e| e.fatal == fatal).take(TRUNCATE) {
            writeln!(f, "{}", err)?;
        }
        if count > TRUNCATE {
            writeln!(f, "{} And {} more.{}", color, count - TRUNCATE, NONE)?;
        }
        writeln!(
            f,
            "{}{}: {}{} {}{} emitted{}",
            color,
            if fatal { "Fatal" } else { "Nonfatal" },
            WHITE,
            count,
            kind,
            if count > 1 { "s" } else { "" },
            NONE,
        )
    }
}

fn rule_rename(r: &Rule) -> String {
    String::from(match r {
        Rule::EOI => "EOF",
        Rule::money_amount => "a monetary value ('XXX.XX')",
        Rule::string => "a string of non-'\"' characters",
        Rule::quoted => "a quoted string ('\"foo\"')",
        Rule::word => "a word composed of a..zA..Z0..9-_/.",
        Rule::label => "a month label ('2024-Jan' or '\"March 2024\"')",
        Rule::name => "an expense name",
        Rule::junk => "an expense amount",
        Rule::value => "an expense amount",
        Rule::salary => "a salary ('salary 1234.56')",
        Rule::expense => "an expense ('Rent 1600;')",
        Rule::month => "a month block ('label: salary X { ... }')",
        _ => return format!("{:?}", r),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn severity_counts() {
        let mut errs = Record::new();
        assert!(!errs.is_fatal());
        errs.make("first").nonfatal().text("a warning");
        assert!(!errs.is_fatal());
        errs.make("second").hint("an error");
        errs.make("third").nonfatal();
        assert!(errs.is_fatal());
        assert_eq!(errs.count_errors(), 1);
        assert_eq!(errs.count_warnings(), 2);
    }

    #[test]
    fn only_most_severe_is_printed() {
        let mut errs = Record::new();
        errs.make("Quiet warning").nonfatal();
        errs.make("Loud error").text("explanation");
        let out = format!("{}", errs);
        assert!(out.contains("Loud error"));
        assert!(out.contains("explanation"));
        assert!(!out.contains("Quiet warning"));
        assert!(out.contains("1"));
        assert!(out.contains("error emitted"));
    }

    #[test]
    fn truncation() {
        let mut errs = Record::new();
        for i in 0..13 {
            errs.make(format!("warning #{}", i)).nonfatal();
        }
        let out = format!("{}", errs);
        assert!(out.contains("warning #9"));
        assert!(!out.contains("warning #10"));
        assert!(out.contains("And 3 more."));
        assert!(out.contains("warnings emitted"));
    }

    #[test]
    fn empty_prints_nothing() {
        assert_eq!(&format!("{}", Record::new()), "");
    }
}
