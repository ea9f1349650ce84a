//! Dashboard projection over ticket events.
//!
//! Maintains per-project ticket counts so the dashboard can render without
//! walking every ticket. Project-level progress is NOT derived here: it is
//! an externally supplied milestone percentage read straight off the
//! [`Project`] record.

use std::collections::HashMap;

use crate::aggregates::ticket::TicketAction;
use crate::lifecycle::EventStatus;
use crate::types::{Project, ProjectId, ProjectStatus, TicketId, TicketStatus};

use super::Projection;

/// Ticket counts for one project
#[derive(Clone, Debug, Default)]
pub struct ProjectTicketStats {
    /// Tickets opened under this project
    pub total_tickets: u32,
    /// Tickets per overall status
    by_status: HashMap<TicketStatus, u32>,
    /// Lifecycle stages recorded with an error outcome
    pub error_events: u32,
}

impl ProjectTicketStats {
    /// Tickets currently in the given status
    #[must_use]
    pub fn status_count(&self, status: TicketStatus) -> u32 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Tickets that reached a terminal status
    #[must_use]
    pub fn completed_tickets(&self) -> u32 {
        self.status_count(TicketStatus::Resolved) + self.status_count(TicketStatus::Closed)
    }

    fn shift(&mut self, from: TicketStatus, to: TicketStatus) {
        if let Some(count) = self.by_status.get_mut(&from) {
            *count = count.saturating_sub(1);
        }
        *self.by_status.entry(to).or_insert(0) += 1;
    }
}

/// Denormalized per-project view of ticket activity
#[derive(Debug, Default)]
pub struct ProjectDashboardProjection {
    /// Stats indexed by project
    stats: HashMap<ProjectId, ProjectTicketStats>,
    /// Each known ticket's project and current status
    ticket_index: HashMap<TicketId, (ProjectId, TicketStatus)>,
}

impl ProjectDashboardProjection {
    /// Creates an empty projection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for one project, if any tickets were seen
    #[must_use]
    pub fn project_stats(&self, project_id: &ProjectId) -> Option<&ProjectTicketStats> {
        self.stats.get(project_id)
    }

    /// Number of tickets seen across all projects
    #[must_use]
    pub fn total_tickets(&self) -> u32 {
        self.stats.values().map(|s| s.total_tickets).sum()
    }
}

impl Projection for ProjectDashboardProjection {
    type Event = TicketAction;

    fn handle_event(&mut self, event: &TicketAction) -> Result<(), String> {
        match event {
            TicketAction::TicketOpened { id, project_id, .. } => {
                // Replays may deliver the same opening twice
                if self.ticket_index.contains_key(id) {
                    return Ok(());
                }
                self.ticket_index.insert(*id, (*project_id, TicketStatus::Open));

                let stats = self.stats.entry(*project_id).or_default();
                stats.total_tickets += 1;
                *stats.by_status.entry(TicketStatus::Open).or_insert(0) += 1;
                Ok(())
            }
            TicketAction::StatusChanged {
                ticket_id, status, ..
            } => {
                let Some((project_id, previous)) = self.ticket_index.get(ticket_id).copied() else {
                    return Err(format!("Status change for unknown ticket {ticket_id}"));
                };
                if previous == *status {
                    return Ok(());
                }
                self.ticket_index.insert(*ticket_id, (project_id, *status));
                if let Some(stats) = self.stats.get_mut(&project_id) {
                    stats.shift(previous, *status);
                }
                Ok(())
            }
            TicketAction::EventRecorded { ticket_id, event } => {
                if event.status == EventStatus::Error {
                    let Some((project_id, _)) = self.ticket_index.get(ticket_id) else {
                        return Err(format!("Event for unknown ticket {ticket_id}"));
                    };
                    if let Some(stats) = self.stats.get_mut(project_id) {
                        stats.error_events += 1;
                    }
                }
                Ok(())
            }
            // Commands and the remaining events don't affect the view
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "project_dashboard"
    }

    fn reset(&mut self) {
        self.stats.clear();
        self.ticket_index.clear();
    }
}

/// Cross-project totals for the dashboard header
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Projects on the books
    pub total_projects: u32,
    /// Projects currently active
    pub active_projects: u32,
    /// Tickets seen across all projects
    pub total_tickets: u32,
    /// Tickets that reached a terminal status
    pub completed_tickets: u32,
    /// Tickets currently in an error status
    pub error_tickets: u32,
    /// Sum of per-project error counters
    pub total_errors: u32,
    /// Sum of per-project transaction counters
    pub total_transactions: u32,
}

/// Computes dashboard header totals from the project list and the ticket
/// view. Project `progress`, `error_count`, and `transactions_generated`
/// are read as supplied; nothing here recomputes them.
#[must_use]
pub fn dashboard_stats(
    projects: &[Project],
    projection: &ProjectDashboardProjection,
) -> DashboardStats {
    let mut stats = DashboardStats {
        total_projects: u32::try_from(projects.len()).unwrap_or(u32::MAX),
        ..DashboardStats::default()
    };

    for project in projects {
        if project.status == ProjectStatus::Active {
            stats.active_projects += 1;
        }
        stats.total_errors += project.error_count;
        stats.total_transactions += project.transactions_generated;

        if let Some(ticket_stats) = projection.project_stats(&project.id) {
            stats.total_tickets += ticket_stats.total_tickets;
            stats.completed_tickets += ticket_stats.completed_tickets();
            stats.error_tickets += ticket_stats.status_count(TicketStatus::Error);
        }
    }

    stats
}
