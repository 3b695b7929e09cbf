//! Creation planning
//!
//! Epics are created first, then stories and tasks, then subtasks. Within a tier
//! the batch order is kept. Any resolvable ancestor of a ticket therefore comes
//! earlier in the plan; a forward reference can only arise from a cycle, which
//! ancestor resolution already treats as "not found".

use crate::core::ticket::Ticket;

/// Positions into `tickets`, in creation order
///
/// Stable sort on `(tier, index)`.
pub fn plan(tickets: &[Ticket]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tickets.len()).collect();
    order.sort_by_key(|&pos| (tickets[pos].kind().tier(), tickets[pos].index));
    order
}

/// One row of a printed plan
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PlanEntry {
    pub position: usize,
    pub index: usize,
    pub tier: u8,
    pub issue_type: String,
    pub summary: String,
}

/// The plan with tier and normalized type per step
pub fn plan_entries(tickets: &[Ticket]) -> Vec<PlanEntry> {
    plan(tickets)
        .into_iter()
        .enumerate()
        .map(|(step, pos)| {
            let ticket = &tickets[pos];
            PlanEntry {
                position: step + 1,
                index: ticket.index,
                tier: ticket.kind().tier(),
                issue_type: ticket.kind().to_string(),
                summary: ticket.summary.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epics_first_then_stories_then_subtasks() {
        let tickets = vec![
            Ticket::new(0, "Subtask", "s").with_parent(2),
            Ticket::new(1, "Story", "st").with_parent(3),
            Ticket::new(2, "Task", "t").with_parent(3),
            Ticket::new(3, "Epic", "e"),
        ];
        assert_eq!(plan(&tickets), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_plan_is_non_decreasing_in_tier() {
        let labels = ["Bug", "Sub-task", "Epic", "story", "Task", "epic", "subtask"];
        let tickets: Vec<Ticket> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| Ticket::new(i, *l, format!("t{i}")))
            .collect();
        let tiers: Vec<u8> = plan(&tickets)
            .into_iter()
            .map(|p| tickets[p].kind().tier())
            .collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]), "{tiers:?}");
    }

    #[test]
    fn test_ties_keep_batch_order() {
        let tickets = vec![
            Ticket::new(0, "Task", "a"),
            Ticket::new(1, "Story", "b"),
            Ticket::new(2, "Unknown", "c"),
        ];
        assert_eq!(plan(&tickets), vec![0, 1, 2]);
    }

    #[test]
    fn test_scenario_plans() {
        let a = vec![
            Ticket::new(0, "Epic", "Epic A"),
            Ticket::new(1, "Story", "Story A").with_parent(0),
        ];
        assert_eq!(plan(&a), vec![0, 1]);

        let b = vec![Ticket::new(0, "Subtask", "Subtask A").with_parent(99)];
        assert_eq!(plan(&b), vec![0]);
    }

    #[test]
    fn test_plan_entries_are_one_based() {
        let tickets = vec![
            Ticket::new(0, "Sub-task", "s"),
            Ticket::new(1, "epic", "e"),
        ];
        let entries = plan_entries(&tickets);
        assert_eq!(entries[0].position, 1);
        assert_eq!(entries[0].issue_type, "Epic");
        assert_eq!(entries[1].index, 0);
        assert_eq!(entries[1].tier, 2);
    }

    #[test]
    fn test_empty_batch() {
        assert!(plan(&[]).is_empty());
    }
}
