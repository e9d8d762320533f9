pub mod error;
pub mod parse;

use crate::util::history::History;

/// Read a budget file and record all its months, in file order
///
/// Returns `None` if the file could not be read or contains fatal errors,
/// the reasons are in `errs`.
pub fn read_history(filename: &str, errs: &mut error::Record) -> Option<History> {
    let contents = match std::fs::read_to_string(filename) {
        Ok(contents) => contents,
        Err(e) => {
            errs.make("File not readable")
                .text(format!("Budget file is '{}'", filename))
                .text(e)
                .hint("check the path or create the file");
            return None;
        }
    };
    from_contents(filename, errs, &contents)
}

/// Same as `read_history` for text that is already in memory
pub fn from_contents(filename: &str, errs: &mut error::Record, contents: &str) -> Option<History> {
    let submissions = parse::extract(filename, errs, contents);
    if errs.is_fatal() {
        return None;
    }
    tracing::debug!(file = filename, months = submissions.len(), "budget file parsed");
    let mut history = History::new();
    for sub in submissions {
        history.record(sub.label, sub.salary, sub.expenses);
    }
    Some(history)
}
