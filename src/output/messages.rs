//! Basic message output functions.
//!
//! Provides simple error and warning message display, plus the
//! glyph-prefixed `✓`/`✗` result lines.

use super::colors::*;

/// Print an error message.
pub fn print_error(msg: &str) {
    println!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    println!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print a `✓` success line.
pub fn print_success(msg: &str) {
    println!("{GREEN}✓{RESET} {}", msg);
}

/// Format a single `✗` failure line.
pub fn format_failure(msg: &str) -> String {
    format!("{RED}✗{RESET} {}", msg)
}

/// Print a `✗` failure line.
pub fn print_failure(msg: &str) {
    println!("{}", format_failure(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_failure_is_one_line() {
        let line = format_failure("Error fetching processes: connection refused");
        assert_eq!(line.lines().count(), 1);
        assert!(line.contains('✗'));
        assert!(line.ends_with("Error fetching processes: connection refused"));
    }
}
