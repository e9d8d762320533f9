//! Interactive budget form
//!
//! The session owns the history of the months submitted so far and a form
//! that is kept between submissions. Commands are parsed from single lines
//! of text and produce an `Outcome` that the caller renders.

use std::str::FromStr;

use crate::util::{
    entry::{Amount, Category, Expense},
    history::History,
    summary::AnnualSummary,
};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// set the period label, empty means the current month
    Month(String),
    /// set the raw salary field
    Salary(String),
    /// append a row with raw fields
    Add { name: String, amount: String },
    /// remove a row, 1-based
    Remove(usize),
    List,
    Submit,
    Annual,
    Back,
    Categories,
    Help,
    Quit,
    /// blank line
    Nothing,
    Unknown(String),
}

impl FromStr for Command {
    type Err = std::convert::Infallible;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let cmd = match words.next() {
            Some(cmd) => cmd.to_lowercase(),
            None => return Ok(Command::Nothing),
        };
        let rest = words.collect::<Vec<_>>();
        Ok(match cmd.as_str() {
            "month" => Command::Month(rest.join(" ")),
            "salary" => Command::Salary(rest.join(" ")),
            "add" => {
                let (name, amount) = split_row(&rest);
                Command::Add { name, amount }
            }
            "remove" | "rm" => match rest.as_slice() {
                [n] => match n.parse::<usize>() {
                    Ok(n) if n > 0 => Command::Remove(n),
                    _ => Command::Unknown(line.trim().to_string()),
                },
                _ => Command::Unknown(line.trim().to_string()),
            },
            "list" | "ls" => Command::List,
            "submit" => Command::Submit,
            "annual" => Command::Annual,
            "back" => Command::Back,
            "categories" => Command::Categories,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        })
    }
}

/// Name and amount of `add` arguments
///
/// The last word is the amount when it looks like a number, names may
/// contain spaces.
fn split_row(words: &[&str]) -> (String, String) {
    match words.split_last() {
        Some((last, init)) if !init.is_empty() && Amount::parse(last).is_ok() => {
            (init.join(" "), last.to_string())
        }
        _ => (words.join(" "), String::new()),
    }
}

/// Raw content of a form row, validated only on submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub amount: String,
}

/// Period label, salary and expense rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    label: String,
    salary: String,
    rows: Vec<Row>,
}

impl Default for Form {
    /// Starts with a single blank row
    fn default() -> Self {
        Self {
            label: String::new(),
            salary: String::new(),
            rows: vec![Row::default()],
        }
    }
}

impl Form {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn salary(&self) -> &str {
        &self.salary
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Suggested categories are written in their canonical case
    pub fn add_row(&mut self, name: &str, amount: &str) {
        let name = match name.parse::<Category>() {
            Ok(cat) => cat.to_string(),
            Err(()) => name.trim().to_string(),
        };
        self.rows.push(Row {
            name,
            amount: amount.trim().to_string(),
        });
    }

    /// Remove the `n`-th row, counting from 1
    pub fn remove_row(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.rows.len() {
            self.rows.remove(n - 1);
            true
        } else {
            false
        }
    }

    /// Rows that form a valid expense, the others are ignored
    pub fn expenses(&self) -> Vec<Expense> {
        self.rows
            .iter()
            .filter_map(|row| {
                let expense = Expense::from_fields(&row.name, &row.amount);
                if expense.is_none() {
                    tracing::debug!(name = %row.name, amount = %row.amount, "row ignored");
                }
                expense
            })
            .collect()
    }
}

/// Result of a command, to be rendered by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// the form changed or was requested
    Form,
    /// a month was recorded at this index of the history
    Recorded(usize),
    /// show an existing month
    Month(usize),
    Annual(AnnualSummary),
    /// blocking message, nothing changed
    Alert(String),
    Categories,
    Help,
    Quit,
    Nothing,
}

#[derive(Debug)]
pub struct Session {
    form: Form,
    history: History,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            form: Form::default(),
            history: History::new(),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn handle(&mut self, cmd: Command) -> Outcome {
        match cmd {
            Command::Month(label) => {
                self.form.label = if label.trim().is_empty() {
                    current_period()
                } else {
                    label.trim().to_string()
                };
                Outcome::Form
            }
            Command::Salary(raw) => {
                self.form.salary = raw.trim().to_string();
                Outcome::Form
            }
            Command::Add { name, amount } => {
                self.form.add_row(&name, &amount);
                Outcome::Form
            }
            Command::Remove(n) => {
                if self.form.remove_row(n) {
                    Outcome::Form
                } else {
                    Outcome::Alert(format!("There is no row {}.", n))
                }
            }
            Command::List => Outcome::Form,
            Command::Submit => self.submit(),
            Command::Annual => match self.history.annual_report() {
                Ok(summary) => Outcome::Annual(summary),
                Err(e) => Outcome::Alert(e.to_string()),
            },
            Command::Back => match self.history.latest() {
                None => Outcome::Alert("No month was submitted yet.".to_string()),
                Some(_) => Outcome::Month(self.history.len() - 1),
            },
            Command::Categories => Outcome::Categories,
            Command::Help => Outcome::Help,
            Command::Quit => Outcome::Quit,
            Command::Nothing => Outcome::Nothing,
            Command::Unknown(line) => {
                Outcome::Alert(format!("Unknown command '{}', try 'help'.", line))
            }
        }
    }

    fn submit(&mut self) -> Outcome {
        let salary = match Amount::parse(&self.form.salary) {
            Ok(salary) => salary,
            Err(e) => return Outcome::Alert(format!("Salary is required: {}.", e)),
        };
        if self.form.label.is_empty() {
            self.form.label = current_period();
        }
        let expenses = self.form.expenses();
        self.history.record(&self.form.label, salary, expenses);
        Outcome::Recorded(self.history.len() - 1)
    }
}

/// Label of the current month, e.g. `2024-03`
pub fn current_period() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! cmd {
        ( $line:expr ) => {
            $line.parse::<Command>().unwrap()
        };
    }

    macro_rules! add {
        ( $name:expr, $amount:expr ) => {
            Command::Add { name: $name.to_string(), amount: $amount.to_string() }
        };
    }

    #[test]
    fn parse_commands() {
        assert_eq!(cmd!(""), Command::Nothing);
        assert_eq!(cmd!("   "), Command::Nothing);
        assert_eq!(cmd!("month March 2024"), Command::Month("March 2024".to_string()));
        assert_eq!(cmd!("month"), Command::Month(String::new()));
        assert_eq!(cmd!("SALARY 50000"), Command::Salary("50000".to_string()));
        assert_eq!(cmd!("add"), add!("", ""));
        assert_eq!(cmd!("add Rent"), add!("Rent", ""));
        assert_eq!(cmd!("add Rent 16000"), add!("Rent", "16000"));
        assert_eq!(cmd!("add Eating out 1800.5"), add!("Eating out", "1800.5"));
        assert_eq!(cmd!("add Travel abc"), add!("Travel abc", ""));
        assert_eq!(cmd!("add 300"), add!("300", ""));
        assert_eq!(cmd!("remove 2"), Command::Remove(2));
        assert_eq!(cmd!("rm 0"), Command::Unknown("rm 0".to_string()));
        assert_eq!(cmd!("remove"), Command::Unknown("remove".to_string()));
        assert_eq!(cmd!("submit"), Command::Submit);
        assert_eq!(cmd!("annual"), Command::Annual);
        assert_eq!(cmd!("back"), Command::Back);
        assert_eq!(cmd!("quit"), Command::Quit);
        assert_eq!(cmd!("frobnicate"), Command::Unknown("frobnicate".to_string()));
    }

    #[test]
    fn form_rows() {
        let mut form = Form::default();
        assert_eq!(form.rows().len(), 1);
        form.add_row("rent", "16000");
        form.add_row("Pets", "300");
        assert_eq!(form.rows()[1].name, "Rent");
        assert_eq!(form.rows()[2].name, "Pets");
        assert!(form.remove_row(1));
        assert!(!form.remove_row(3));
        assert!(!form.remove_row(0));
        assert_eq!(form.rows().len(), 2);
        assert_eq!(
            form.expenses(),
            vec![
                Expense::new("Rent", Amount::units(16000)),
                Expense::new("Pets", Amount::units(300)),
            ]
        );
    }

    fn fill(session: &mut Session, lines: &[&str]) -> Vec<Outcome> {
        lines.iter().map(|l| session.handle(cmd!(l))).collect()
    }

    #[test]
    fn submit_month() {
        let mut session = Session::new();
        let outcomes = fill(
            &mut session,
            &["month 2024-Jan", "salary 50000", "add Rent 16000", "add Travel abc", "submit"],
        );
        assert_eq!(outcomes.last(), Some(&Outcome::Recorded(0)));
        let entry = session.history().latest().unwrap();
        assert_eq!(entry.label(), "2024-Jan");
        assert_eq!(entry.expenses(), &[Expense::new("Rent", Amount::units(16000))]);
        assert_eq!(entry.savings(), Amount::units(34000));
    }

    #[test]
    fn salary_is_required() {
        let mut session = Session::new();
        match session.handle(Command::Submit) {
            Outcome::Alert(msg) => assert!(msg.contains("Salary is required")),
            other => panic!("{:?} instead of an alert", other),
        }
        session.handle(cmd!("salary lots"));
        assert!(matches!(session.handle(Command::Submit), Outcome::Alert(_)));
        assert!(session.history().is_empty());
    }

    #[test]
    fn huge_salary_is_refused() {
        let mut session = Session::new();
        fill(&mut session, &["salary 1e20"]);
        match session.handle(Command::Submit) {
            Outcome::Alert(msg) => assert!(msg.contains("larger than")),
            other => panic!("{:?} instead of an alert", other),
        }
        assert!(session.history().is_empty());
    }

    #[test]
    fn default_label() {
        let mut session = Session::new();
        fill(&mut session, &["salary 100", "submit"]);
        let label = session.history().latest().unwrap().label().to_string();
        assert_eq!(label.len(), 7);
        assert_eq!(&label[4..5], "-");
    }

    #[test]
    fn form_is_kept_after_submit() {
        let mut session = Session::new();
        fill(&mut session, &["month Jan", "salary 1000", "add Rent 400", "submit", "submit"]);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().months()[0], session.history().months()[1]);
    }

    #[test]
    fn annual_gate() {
        let mut session = Session::new();
        assert_eq!(
            session.handle(Command::Annual),
            Outcome::Alert("Add at least 2 months of data to generate an annual report.".to_string())
        );
        fill(&mut session, &["month Jan", "salary 1000", "add Rent 400", "submit"]);
        assert!(matches!(session.handle(Command::Annual), Outcome::Alert(_)));
        fill(&mut session, &["month Feb", "salary 2000", "submit"]);
        match session.handle(Command::Annual) {
            Outcome::Annual(summary) => {
                assert_eq!(summary.months(), 2);
                assert_eq!(summary.total_savings(), Amount::units(2600));
            }
            other => panic!("{:?} instead of a report", other),
        }
        assert_eq!(session.handle(Command::Back), Outcome::Month(1));
    }

    #[test]
    fn back_without_months() {
        let mut session = Session::new();
        assert!(matches!(session.handle(Command::Back), Outcome::Alert(_)));
    }

    #[test]
    fn bad_row_removal() {
        let mut session = Session::new();
        assert_eq!(
            session.handle(Command::Remove(5)),
            Outcome::Alert("There is no row 5.".to_string())
        );
    }
}
