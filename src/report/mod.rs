//! Batch reporting: the CSV log and the console summary.

mod console;
mod csv_log;

pub use console::{result_line, write_console_report};
pub use csv_log::{append_batch, CSV_HEADER};
