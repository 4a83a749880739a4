//! Time buckets
//!
//! Pure functions from a timestamp to a discrete category.

mod season;
mod time_of_day;

pub use season::season;
pub use time_of_day::{classify, classify_datetime, DAYTIME_END_SECS, DAYTIME_START_SECS};
