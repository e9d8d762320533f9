//! Everything the user sees: arguments, text reports, charts, the interactive form

pub mod config;
pub mod delay;
pub mod interactive;
pub mod plot;
pub mod report;
pub mod session;
pub mod table;

use std::io::Write;

use crate::load::{self, error};
use crate::util::tips;
use config::Config;
use report::{AnnualReport, MonthReport, TipList};

/// Print every month of a budget file, optionally the annual report
///
/// Returns `false` if the file could not be loaded, diagnostics have then
/// already been printed to stderr.
pub fn report_file<W: Write>(filename: &str, out: &mut W, config: &Config) -> anyhow::Result<bool> {
    let mut errs = error::Record::new();
    let history = load::read_history(filename, &mut errs);
    if !errs.is_empty() {
        eprint!("{}", errs);
    }
    let history = match history {
        Some(history) => history,
        None => return Ok(false),
    };
    if history.is_empty() {
        writeln!(out, "No month in {}.", filename)?;
    }
    for (idx, entry) in history.months().iter().enumerate() {
        writeln!(out, "{}", MonthReport::new(entry, &config.currency))?;
        writeln!(
            out,
            "{}",
            TipList::from(&tips::classify_month(entry)).colored(config.color)
        )?;
        if let Some(dir) = &config.chart_dir {
            plot::write_chart(dir, idx, entry, &config.currency)?;
        }
    }
    if config.annual {
        match history.annual_report() {
            Ok(summary) => writeln!(
                out,
                "{}",
                AnnualReport::new(summary, history.months(), &config.currency)
                    .colored(config.color)
            )?,
            Err(e) => writeln!(out, "! {}", e)?,
        }
    }
    Ok(true)
}
