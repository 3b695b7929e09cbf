//! Shared helper functions for CLI commands
//!
//! Tickets are numbered from 1 on screen and from 0 in the batch; the
//! conversions live here so every command agrees.

use crate::core::ticket::{Ticket, TicketBatch};

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Parse a 1-based ticket number typed by the user into a batch index
pub fn parse_ticket_number(input: &str, len: usize) -> Option<usize> {
    let number: usize = input.trim().trim_start_matches('#').parse().ok()?;
    (1..=len).contains(&number).then(|| number - 1)
}

/// "#3" for index 2
pub fn ticket_label(index: usize) -> String {
    format!("#{}", index + 1)
}

/// Describe a ticket's parent for display
pub fn parent_label(batch: &TicketBatch, ticket: &Ticket) -> Option<String> {
    let parent = ticket.parent_index?;
    Some(match batch.get(parent) {
        Some(p) => format!("{} {}", ticket_label(parent), p.summary),
        None => format!("{} (missing)", ticket_label(parent)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ééééé", 4), "é...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_parse_ticket_number() {
        assert_eq!(parse_ticket_number("1", 3), Some(0));
        assert_eq!(parse_ticket_number(" #3 ", 3), Some(2));
        assert_eq!(parse_ticket_number("0", 3), None);
        assert_eq!(parse_ticket_number("4", 3), None);
        assert_eq!(parse_ticket_number("two", 3), None);
    }

    #[test]
    fn test_parent_label() {
        let batch = TicketBatch::new(vec![
            Ticket::new(0, "Epic", "Checkout"),
            Ticket::new(1, "Story", "Pay").with_parent(0),
            Ticket::new(2, "Subtask", "Orphan").with_parent(7),
        ]);
        assert_eq!(parent_label(&batch, batch.get(0).unwrap()), None);
        assert_eq!(
            parent_label(&batch, batch.get(1).unwrap()).as_deref(),
            Some("#1 Checkout")
        );
        assert_eq!(
            parent_label(&batch, batch.get(2).unwrap()).as_deref(),
            Some("#8 (missing)")
        );
    }
}
