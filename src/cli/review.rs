//! Interactive batch review - preview, edit and delete tickets before creation

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{parent_label, parse_ticket_number, ticket_label};
use crate::core::issue_type::IssueType;
use crate::core::ticket::{parse_criteria, Ticket, TicketBatch, TicketEdit};

/// What the reviewer chose at the action prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Edit,
    Delete,
    Continue,
    Quit,
}

impl std::str::FromStr for ReviewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "edit" => Ok(ReviewAction::Edit),
            "d" | "delete" => Ok(ReviewAction::Delete),
            "c" | "continue" => Ok(ReviewAction::Continue),
            "q" | "quit" => Ok(ReviewAction::Quit),
            other => Err(format!("Unknown action: {}", other)),
        }
    }
}

/// How the review ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Accepted,
    Abandoned,
}

/// Parse the parent prompt: empty keeps, "none" clears, a number sets
pub fn parse_parent_input(input: &str, len: usize) -> Result<Option<Option<usize>>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if input.eq_ignore_ascii_case("none") || input == "-" {
        return Ok(Some(None));
    }
    parse_ticket_number(input, len)
        .map(|index| Some(Some(index)))
        .ok_or_else(|| format!("Enter a ticket number between 1 and {}", len))
}

fn print_ticket(batch: &TicketBatch, ticket: &Ticket) {
    let kind = ticket.kind();
    let type_note = if IssueType::is_recognized(&ticket.issue_type) {
        String::new()
    } else {
        format!(" {}", style(format!("(created as {})", kind)).yellow())
    };

    println!(
        "{} {}",
        style(format!("Ticket {}", ticket_label(ticket.index))).bold().blue(),
        style("─".repeat(40)).dim()
    );
    println!("  {} {}{}", style("Type:").bold(), ticket.issue_type, type_note);
    match parent_label(batch, ticket) {
        Some(parent) => println!(
            "  {} {}  {} {}",
            style("Summary:").bold(),
            ticket.summary,
            style("Parent:").dim(),
            parent
        ),
        None => println!("  {} {}", style("Summary:").bold(), ticket.summary),
    }
    if ticket.description.is_empty() {
        println!("  {} {}", style("Description:").bold(), style("No description").dim());
    } else {
        println!("  {}", style("Description:").bold());
        for line in ticket.description.lines() {
            println!("    {}", line);
        }
    }
    println!("  {}", style("Acceptance Criteria:").bold());
    if ticket.acceptance_criteria.is_empty() {
        println!("    {}", style("None specified").dim());
    } else {
        for criterion in &ticket.acceptance_criteria {
            println!("    • {}", criterion);
        }
    }
    println!();
}

/// Print every ticket in the batch
pub fn print_preview(batch: &TicketBatch) {
    println!();
    println!("{}", style("Ticket Preview").bold().cyan());
    println!();
    for ticket in batch.tickets() {
        print_ticket(batch, ticket);
    }
}

fn prompt_ticket_number(theme: &ColorfulTheme, prompt: &str, len: usize) -> Result<Option<usize>> {
    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    let index = parse_ticket_number(&input, len);
    if index.is_none() {
        println!("{} Invalid ticket number", style("✗").red());
    }
    Ok(index)
}

fn prompt_edit(theme: &ColorfulTheme, ticket: &Ticket, len: usize) -> Result<TicketEdit> {
    println!(
        "\n{} {}",
        style("Editing").bold().yellow(),
        style(ticket_label(ticket.index)).bold()
    );

    let issue_type: String = Input::with_theme(theme)
        .with_prompt("Type (Epic, Story, Task, Subtask)")
        .default(ticket.issue_type.clone())
        .interact_text()
        .into_diagnostic()?;

    let summary: String = Input::with_theme(theme)
        .with_prompt("Summary")
        .default(ticket.summary.clone())
        .interact_text()
        .into_diagnostic()?;

    let description: String = Input::with_theme(theme)
        .with_prompt("Description")
        .default(ticket.description.clone())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    for criterion in &ticket.acceptance_criteria {
        println!("  • {}", criterion);
    }
    let criteria: String = Input::with_theme(theme)
        .with_prompt("New acceptance criteria (comma-separated, empty keeps current)")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    let parent_index = loop {
        let input: String = Input::with_theme(theme)
            .with_prompt("Parent ticket number (empty keeps, 'none' clears)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        match parse_parent_input(&input, len) {
            Ok(parent) => break parent,
            Err(msg) => println!("{} {}", style("✗").red(), msg),
        }
    };

    let criteria = parse_criteria(&criteria);
    Ok(TicketEdit {
        issue_type: Some(issue_type),
        summary: Some(summary),
        description: Some(description),
        acceptance_criteria: (!criteria.is_empty()).then_some(criteria),
        parent_index,
    })
}

/// Run the edit/delete/continue/quit loop until the reviewer decides
pub fn review_loop(batch: &mut TicketBatch) -> Result<ReviewOutcome> {
    let theme = ColorfulTheme::default();
    print_preview(batch);

    loop {
        let choice: String = Input::with_theme(&theme)
            .with_prompt("Actions: [e]dit ticket, [d]elete ticket, [c]ontinue, [q]uit")
            .interact_text()
            .into_diagnostic()?;

        let action = match choice.parse::<ReviewAction>() {
            Ok(action) => action,
            Err(msg) => {
                println!("{} {}", style("✗").red(), msg);
                continue;
            }
        };

        match action {
            ReviewAction::Quit => return Ok(ReviewOutcome::Abandoned),
            ReviewAction::Continue => return Ok(ReviewOutcome::Accepted),
            ReviewAction::Edit => {
                let Some(index) =
                    prompt_ticket_number(&theme, "Ticket number to edit", batch.len())?
                else {
                    continue;
                };
                let Some(ticket) = batch.get(index).cloned() else {
                    continue;
                };
                let edit = prompt_edit(&theme, &ticket, batch.len())?;
                batch.edit(index, edit).into_diagnostic()?;
                print_preview(batch);
            }
            ReviewAction::Delete => {
                let Some(index) =
                    prompt_ticket_number(&theme, "Ticket number to delete", batch.len())?
                else {
                    continue;
                };
                let removed = batch.delete(index).into_diagnostic()?;
                println!(
                    "{} Deleted {}: {}",
                    style("✓").green(),
                    ticket_label(index),
                    removed.summary
                );
                if batch.is_empty() {
                    println!("{} No tickets left", style("!").yellow());
                    return Ok(ReviewOutcome::Abandoned);
                }
                print_preview(batch);
            }
        }
    }
}

/// Ask before anything is created remotely
pub fn confirm_creation(count: usize, project_key: &str) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Create {} ticket(s) in {}?", count, project_key))
        .default(false)
        .interact()
        .into_diagnostic()
}
