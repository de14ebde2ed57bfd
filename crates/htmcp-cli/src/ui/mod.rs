//! Terminal output.

mod output;
mod reporter;
pub mod theme;

pub use output::Output;
pub use reporter::{ConsoleReporter, format_progress};
