//! Sinks for user-facing status lines
//!
//! The migration steps report progress through [`MessageDisplayer`] instead
//! of printing directly, so tests can assert on what the user would see.

use std::sync::{Arc, Mutex};

use colored::*;

use crate::utils::print_warning;

/// Receives status lines meant for the user.
pub trait MessageDisplayer {
    fn show(&self, message: &str);

    /// A message that needs the user's attention. Defaults to [`show`](Self::show).
    fn warn(&self, message: &str) {
        self.show(message);
    }
}

/// Prints status lines to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDisplayer;

impl MessageDisplayer for ConsoleDisplayer {
    fn show(&self, message: &str) {
        println!("{}", message.bright_white());
    }

    fn warn(&self, message: &str) {
        print_warning(message);
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplayer {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingDisplayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of recorded messages containing `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages()
            .iter()
            .filter(|m| m.contains(needle))
            .count()
    }
}

impl MessageDisplayer for RecordingDisplayer {
    fn show(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
