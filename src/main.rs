mod cli;
mod load;
mod util;

use std::sync::{Arc, Mutex};

use anyhow::Context;

use cli::config::{self, Config};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = config::app().get_matches();
    config::init_logging(matches.occurrences_of("verbose"));
    let (name, sub) = matches.subcommand();
    let config = Config::from_matches(&matches, sub)?;
    tracing::debug!(?config, "starting {}", name);
    let stdout = std::io::stdout();
    match (name, sub) {
        ("report", Some(sub)) => {
            let filename = sub.value_of("FILE").context("no budget file given")?;
            if !cli::report_file(filename, &mut stdout.lock(), &config)? {
                std::process::exit(2);
            }
        }
        ("interactive", Some(_)) => {
            let stdin = std::io::stdin();
            let out = Arc::new(Mutex::new(stdout));
            let session = cli::interactive::run(stdin.lock(), out, &config)?;
            tracing::info!(months = session.history().len(), "session closed");
        }
        ("categories", _) => cli::interactive::write_categories(&mut stdout.lock())?,
        _ => unreachable!("a subcommand is required"),
    }
    Ok(())
}
