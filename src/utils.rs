//! Utility functions for terminal output formatting
//!
//! This module provides consistent, colored output functions for displaying
//! success, warning and error messages in the terminal.

use colored::*;

/// Displays a success message with a green checkmark
///
/// Uses a carriage return so it starts at the beginning of the line even
/// after output that did not end in a newline.
pub fn print_success(message: &str) {
    println!("\r{} {}", "✓".green(), message);
}

/// Displays a warning in yellow on stderr
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

/// Displays an error message with a red X mark on stderr
///
/// # Example
///
/// ```no_run
/// use svn2git::utils::print_error;
///
/// print_error("Fail to execute command 'git svn fetch'");
/// ```
pub fn print_error(message: &str) {
    eprintln!("\r{} {}", "✗".red(), message);
}
