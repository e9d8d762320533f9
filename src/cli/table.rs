use std::fmt;

use crate::util::entry::{Amount, MonthEntry};

/// Box-drawn table with a label column and right-aligned cells
pub struct Table {
    title: Option<String>,
    labels: ColFmt,
    columns: Vec<ColFmt>,
}

struct BoxFmt {
    width: usize,
    text: String,
}

struct ColFmt {
    width: usize,
    label: BoxFmt,
    boxes: Vec<BoxFmt>,
}

impl Table {
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            title: None,
            labels: ColFmt::with_label(BoxFmt::from(String::new())),
            columns: headers
                .into_iter()
                .map(|h| ColFmt::with_label(BoxFmt::from(h.to_string())))
                .collect(),
        }
    }

    pub fn with_title<S>(mut self, title: S) -> Self
    where
        S: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    /// Add a line, missing cells are left blank and extra ones dropped
    pub fn push_line<S>(&mut self, label: S, cells: Vec<String>)
    where
        S: ToString,
    {
        self.labels.push(BoxFmt::from(label.to_string()));
        let mut cells = cells.into_iter();
        for col in &mut self.columns {
            col.push(BoxFmt::from(cells.next().unwrap_or_default()));
        }
    }

    /// One line per month: salary, expenses, savings and savings share
    pub fn breakdown(months: &[MonthEntry], currency: &str) -> Self {
        let mut table = Self::with_headers(vec!["Salary", "Expenses", "Savings", "Saved"]);
        let money = |a: Amount| format!("{}{}", currency, a);
        for m in months {
            table.push_line(
                m.label(),
                vec![
                    money(m.salary()),
                    money(m.total_expenses()),
                    money(m.savings()),
                    format!("{:.1}%", m.savings().percent_of(m.salary())),
                ],
            );
        }
        table
    }

    fn len(&self) -> usize {
        self.labels.boxes.len()
    }
}

impl BoxFmt {
    fn from(text: String) -> Self {
        Self {
            width: text.chars().count(),
            text,
        }
    }

    fn write(&self, f: &mut fmt::Formatter, width: usize, right: bool) -> fmt::Result {
        let pad = PADDING.repeat(width.saturating_sub(self.width));
        if right {
            write!(f, " {}{} ", pad, self.text)
        } else {
            write!(f, " {}{} ", self.text, pad)
        }
    }
}

impl ColFmt {
    fn with_label(label: BoxFmt) -> Self {
        Self {
            width: label.width,
            label,
            boxes: Vec::new(),
        }
    }

    fn push(&mut self, b: BoxFmt) {
        self.width = self.width.max(b.width);
        self.boxes.push(b);
    }

    fn hline(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HLINE.repeat(self.width + 2))
    }
}

impl Table {
    fn border(&self, f: &mut fmt::Formatter, left: &str, join: &str, right: &str) -> fmt::Result {
        write!(f, "{}", left)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", join)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", right)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{}", title)?;
        }
        self.border(f, ULCORNER, LOJOIN, URCORNER)?;
        // header
        write!(f, "{}", VLINE)?;
        self.labels.label.write(f, self.labels.width, false)?;
        for c in &self.columns {
            write!(f, "{}", VLINE)?;
            c.label.write(f, c.width, true)?;
        }
        writeln!(f, "{}", VLINE)?;
        self.border(f, RTJOIN, CROSS, LTJOIN)?;
        // body
        for idx in 0..self.len() {
            write!(f, "{}", VLINE)?;
            self.labels.boxes[idx].write(f, self.labels.width, false)?;
            for c in &self.columns {
                write!(f, "{}", VLINE)?;
                c.boxes[idx].write(f, c.width, true)?;
            }
            writeln!(f, "{}", VLINE)?;
        }
        self.border(f, DLCORNER, HIJOIN, DRCORNER)
    }
}

const PADDING: &str = " ";
const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::entry::Expense;

    #[test]
    fn layout() {
        let mut table = Table::with_headers(vec!["A", "Long"]);
        table.push_line("x", vec!["1".to_string(), "22".to_string()]);
        table.push_line("yy", vec!["333".to_string()]);
        let expected = "\
┌────┬─────┬──────┐
│    │   A │ Long │
├────┼─────┼──────┤
│ x  │   1 │   22 │
│ yy │ 333 │      │
└────┴─────┴──────┘
";
        assert_eq!(&format!("{}", table), expected);
    }

    #[test]
    fn breakdown_uses_currency() {
        let months = vec![
            MonthEntry::new("Jan", Amount::units(1000), vec![Expense::new("Rent", Amount::units(250))]),
            MonthEntry::new("Feb", Amount::units(1000), Vec::new()),
        ];
        let table = Table::breakdown(&months, "₹").with_title("Monthly Breakdown");
        let out = format!("{}", table);
        assert_eq!(table.len(), 2);
        assert!(out.starts_with("Monthly Breakdown\n"));
        assert!(out.contains("₹1000.00"));
        assert!(out.contains("₹750.00"));
        assert!(out.contains("75.0%"));
        assert!(out.contains("100.0%"));
    }
}
