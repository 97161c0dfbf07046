//! Terminal tracker for what you got done during each hour of the day.
//! Pick a day and a range of hours, write a note per hour, and the notes come back the next time
//! the same day is opened. Everything is kept in a single local file.
//!

pub mod cli;
pub mod error;
pub mod fs;
pub mod slots;
pub mod storage;
pub mod tracker;
pub mod utils;
