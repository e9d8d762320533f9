use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;

use crate::cli::{
    config::Config,
    delay::Deferred,
    plot,
    report::{AnnualReport, MonthReport, TipList},
    session::{Command, Outcome, Session},
};
use crate::util::{
    entry::Category,
    tips::{self, Tip},
};

const HELP: &str = "\
Commands:
  month [LABEL]          set the period (default: current month)
  salary AMOUNT          set the monthly salary
  add [NAME [AMOUNT]]    add an expense row
  remove N               remove expense row N
  list                   show the form
  submit                 record the month
  annual                 annual report (needs 2 months)
  back                   show the latest month again
  categories             suggested expense names
  quit";

/// Read commands from `input` until it ends or the user quits
///
/// Tips of a submitted month appear after the configured delay, a new
/// submission replaces tips that are still pending. The writer is shared
/// with the thread that displays tips, it is only locked while something
/// is being written.
pub fn run<R, W>(input: R, out: Arc<Mutex<W>>, config: &Config) -> anyhow::Result<Session>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    let mut session = Session::new();
    let mut tips_display = Deferred::new(config.tip_delay);
    writeln!(lock(&out)?, "Type 'help' for the list of commands.")?;
    for line in input.lines() {
        let line = line.context("cannot read command")?;
        let cmd = line.parse::<Command>().unwrap_or(Command::Nothing);
        tracing::trace!(?cmd, "command");
        let outcome = session.handle(cmd);
        if let Outcome::Quit = outcome {
            break;
        }
        // released before scheduling, the replaced display may be waiting for it
        let tips = {
            let mut out = lock(&out)?;
            let tips = render(&mut *out, &session, outcome, config)?;
            out.flush()?;
            tips
        };
        if let Some((label, tips)) = tips {
            let out = Arc::clone(&out);
            let color = config.color;
            tips_display.schedule(move || {
                let title = format!("Tips for {}", label);
                let list = TipList::from(&tips).with_title(&title).colored(color);
                match out.lock() {
                    Ok(mut out) => {
                        if let Err(e) = writeln!(out, "{}", list).and_then(|_| out.flush()) {
                            tracing::warn!("cannot display tips: {}", e);
                        }
                    }
                    Err(_) => tracing::warn!("output is poisoned, tips dropped"),
                }
            });
        }
    }
    if tips_display.is_pending() {
        tracing::debug!("waiting for the last tips");
    }
    tips_display.finish();
    Ok(session)
}

fn lock<W>(out: &Mutex<W>) -> anyhow::Result<MutexGuard<'_, W>> {
    out.lock().map_err(|_| anyhow::anyhow!("output is poisoned"))
}

/// Write the result of a command
///
/// Returns the label and tips of a newly recorded month, which are
/// displayed later.
fn render<W: Write>(
    out: &mut W,
    session: &Session,
    outcome: Outcome,
    config: &Config,
) -> anyhow::Result<Option<(String, Vec<Tip>)>> {
    match outcome {
        Outcome::Form => write_form(out, session)?,
        Outcome::Recorded(idx) => {
            let entry = &session.history().months()[idx];
            writeln!(out, "{}", MonthReport::new(entry, &config.currency))?;
            if let Some(dir) = &config.chart_dir {
                let file = plot::write_chart(dir, idx, entry, &config.currency)?;
                writeln!(out, "Chart saved to {}", file.display())?;
            }
            return Ok(Some((entry.label().to_string(), tips::classify_month(entry))));
        }
        Outcome::Month(idx) => {
            let entry = &session.history().months()[idx];
            writeln!(out, "{}", MonthReport::new(entry, &config.currency))?;
        }
        Outcome::Annual(summary) => {
            let report = AnnualReport::new(summary, session.history().months(), &config.currency)
                .colored(config.color);
            writeln!(out, "{}", report)?;
        }
        Outcome::Alert(msg) => writeln!(out, "! {}", msg)?,
        Outcome::Categories => write_categories(out)?,
        Outcome::Help => writeln!(out, "{}", HELP)?,
        Outcome::Quit | Outcome::Nothing => (),
    }
    Ok(None)
}

fn write_form<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    let form = session.form();
    let or_blank = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    writeln!(out, "Month:  {}", or_blank(form.label()))?;
    writeln!(out, "Salary: {}", or_blank(form.salary()))?;
    for (i, row) in form.rows().iter().enumerate() {
        writeln!(out, "  {:>2}. {} {}", i + 1, or_blank(&row.name), or_blank(&row.amount))?;
    }
    Ok(())
}

pub fn write_categories<W: Write>(out: &mut W) -> std::io::Result<()> {
    let names = Category::all().map(|c| c.to_string()).collect::<Vec<_>>();
    writeln!(out, "{}", names.join(", "))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            currency: "$".to_string(),
            tip_delay: Duration::from_millis(1),
            chart_dir: None,
            annual: false,
            color: false,
        }
    }

    fn play_with(script: &str, config: &Config) -> (Session, String) {
        let out = Arc::new(Mutex::new(Vec::new()));
        let session = run(script.as_bytes(), Arc::clone(&out), config).unwrap();
        let out = out.lock().unwrap().clone();
        (session, String::from_utf8(out).unwrap())
    }

    fn play(script: &str) -> (Session, String) {
        play_with(script, &config())
    }

    #[test]
    fn full_session() {
        let (session, out) = play(
            "month Jan\nsalary 1000\nadd Rent 400\nsubmit\nannual\nmonth Feb\nsubmit\nannual\nback\nquit\nsubmit\n",
        );
        assert_eq!(session.history().len(), 2);
        assert!(out.contains("Rent:         $400.00 (40.00%)"));
        assert!(out.contains("! Add at least 2 months"));
        assert!(out.contains("Total Salary (Year):     $2000.00"));
        assert!(out.contains("Excellent Savings Rate"));
    }

    #[test]
    fn tips_follow_the_month() {
        let (_, out) = play("month Jan\nsalary 100\nadd Rent 90\nsubmit\n");
        let report = out.find("Rent:").unwrap();
        let tips = out.find("Tips for Jan").unwrap();
        assert!(report < tips);
        assert!(out.contains("  * Increase Savings: Try to save at least 20% of your income."));
        assert!(out.contains("  * Reduce Rent: This category takes 90% of your income."));
    }

    #[test]
    fn last_tips_shown_before_quitting() {
        let (_, out) = play("month Jan\nsalary 100\nsubmit\nmonth Feb\nsubmit\nquit\n");
        // a 1ms delay may or may not let Jan through, Feb always shows
        assert!(out.contains("Tips for Feb"));
        assert!(out.contains("Great job! Your budget looks well-balanced."));
    }

    #[test]
    fn quick_resubmission_replaces_tips() {
        let slow = Config {
            tip_delay: Duration::from_millis(500),
            ..config()
        };
        let (session, out) = play_with("month Jan\nsalary 100\nsubmit\nmonth Feb\nsubmit\n", &slow);
        assert_eq!(session.history().len(), 2);
        assert!(!out.contains("Tips for Jan"));
        assert_eq!(out.matches("Tips for Feb").count(), 1);
    }

    #[test]
    fn form_listing() {
        let (_, out) = play("add Rent 12\nlist\n");
        assert!(out.contains("   1. - -"));
        assert!(out.contains("   2. Rent 12"));
    }

    #[test]
    fn unknown_command() {
        let (session, out) = play("dance\n");
        assert!(session.history().is_empty());
        assert!(out.contains("! Unknown command 'dance'"));
    }

    #[test]
    fn categories_listing() {
        let mut out = Vec::new();
        write_categories(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Rent, Groceries, Transport, Utilities, Entertainment, Health, Education, Travel\n"
        );
    }
}
