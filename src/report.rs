//! Progress and warning output.
//!
//! Library code never prints directly; it reports through a [`Reporter`]
//! supplied by the caller.

use colored::*;
use std::sync::Mutex;

pub trait Reporter {
    /// Progress detail (schema location, model counts, ...).
    fn info(&self, msg: &str);
    /// Recoverable problem, e.g. an unreadable model file.
    fn warn(&self, msg: &str);
}

/// Terminal reporter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, msg: &str) {
        if self.verbose {
            println!("{} {}", "→".cyan(), msg.dimmed());
        }
    }

    fn warn(&self, msg: &str) {
        eprintln!("{} {}", "⚠ Warning:".yellow().bold(), msg);
    }
}

/// Reporter that records messages, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, msg: &str) {
        if let Ok(mut infos) = self.infos.lock() {
            infos.push(msg.to_string());
        }
    }

    fn warn(&self, msg: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(msg.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records() {
        let reporter = MemoryReporter::default();
        reporter.info("found schema");
        reporter.warn("cannot read app/models/x.rb");
        assert_eq!(reporter.infos(), vec!["found schema"]);
        assert_eq!(reporter.warnings(), vec!["cannot read app/models/x.rb"]);
    }
}
