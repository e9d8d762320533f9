//! Command-line arguments and logging setup

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

/// Settings shared by all subcommands
#[derive(Debug, Clone)]
pub struct Config {
    /// symbol printed before every amount
    pub currency: String,
    /// how long the tips of a month wait before they are shown
    pub tip_delay: Duration,
    /// where to write one pie chart per month
    pub chart_dir: Option<PathBuf>,
    /// print the annual report after the months
    pub annual: bool,
    /// color tips, only when stdout is a terminal
    pub color: bool,
}

pub const DEFAULT_CURRENCY: &str = "₹";
pub const DEFAULT_TIP_DELAY_MS: &str = "1000";

pub fn app() -> App<'static, 'static> {
    let chart = Arg::with_name("chart")
        .long("chart")
        .value_name("DIR")
        .takes_value(true)
        .help("Write an SVG pie chart of each month into DIR");
    App::new("stipend")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Log more (repeat for more detail)"),
        )
        .arg(
            Arg::with_name("currency")
                .long("currency")
                .value_name("SYM")
                .takes_value(true)
                .global(true)
                .env("STIPEND_CURRENCY")
                .help("Currency symbol printed before amounts"),
        )
        .subcommand(
            SubCommand::with_name("report")
                .about("Report on the months of a budget file")
                .arg(
                    Arg::with_name("FILE")
                        .required(true)
                        .index(1)
                        .help("Budget file to read"),
                )
                .arg(chart.clone())
                .arg(
                    Arg::with_name("annual")
                        .long("annual")
                        .help("Append the annual report"),
                ),
        )
        .subcommand(
            SubCommand::with_name("interactive")
                .about("Enter months one command at a time")
                .arg(chart)
                .arg(
                    Arg::with_name("tip-delay")
                        .long("tip-delay")
                        .value_name("MS")
                        .takes_value(true)
                        .default_value(DEFAULT_TIP_DELAY_MS)
                        .help("Delay before the tips of a month are shown"),
                ),
        )
        .subcommand(SubCommand::with_name("categories").about("List suggested expense categories"))
}

impl Config {
    /// Gather settings from the top-level and subcommand arguments
    pub fn from_matches(top: &ArgMatches, sub: Option<&ArgMatches>) -> anyhow::Result<Self> {
        let currency = sub
            .and_then(|s| s.value_of("currency"))
            .or_else(|| top.value_of("currency"))
            .unwrap_or(DEFAULT_CURRENCY)
            .to_string();
        let delay = sub
            .and_then(|s| s.value_of("tip-delay"))
            .unwrap_or(DEFAULT_TIP_DELAY_MS);
        let tip_delay = delay
            .parse::<u64>()
            .map(Duration::from_millis)
            .with_context(|| format!("'{}' is not a delay in milliseconds", delay))?;
        Ok(Self {
            currency,
            tip_delay,
            chart_dir: sub.and_then(|s| s.value_of("chart")).map(PathBuf::from),
            annual: sub.map(|s| s.is_present("annual")).unwrap_or(false),
            color: atty::is(atty::Stream::Stdout),
        })
    }
}

/// Default log filter for a number of `-v` flags
pub fn log_filter(verbosity: u64) -> &'static str {
    match verbosity {
        0 => "stipend=warn",
        1 => "stipend=info",
        2 => "stipend=debug",
        _ => "stipend=trace",
    }
}

/// Log to stderr, `RUST_LOG` takes precedence over `-v`
pub fn init_logging(verbosity: u64) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(verbosity).into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
