//! Console progress for creation runs

use console::style;

use crate::core::executor::ProgressObserver;

/// Prints one line per ticket to stderr as it is resolved
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn notify(&mut self, current: usize, total: usize, summary: &str) {
        eprintln!(
            "{} {}",
            style(format!("Creating ticket {}/{}:", current, total)).cyan(),
            summary
        );
    }
}
