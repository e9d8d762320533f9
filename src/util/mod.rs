//! Implementations that are useful accross the whole project
//!
//! Amounts, month entries, the session history and their aggregation

pub mod entry;
pub mod history;
pub mod summary;
pub mod tips;
