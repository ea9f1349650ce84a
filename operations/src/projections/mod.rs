//! Projections: denormalized read models maintained from aggregate events.
//!
//! Projections answer dashboard queries without recomputing from aggregate
//! state. They are rebuildable: `reset` followed by a replay of all events
//! reproduces the same view.

pub mod project_dashboard;

pub use project_dashboard::{DashboardStats, ProjectDashboardProjection, ProjectTicketStats};

/// A read model fed by aggregate events
pub trait Projection {
    /// The event type this projection consumes
    type Event;

    /// Process a single event, updating the view
    ///
    /// # Errors
    ///
    /// Returns an error description if the event cannot be applied
    fn handle_event(&mut self, event: &Self::Event) -> Result<(), String>;

    /// Name for logging and diagnostics
    fn name(&self) -> &'static str;

    /// Clear the view so it can be rebuilt from a replay
    fn reset(&mut self);
}
