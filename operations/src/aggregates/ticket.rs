//! Reducer for the ticket aggregate.
//!
//! Tickets move through a fixed lifecycle by recording events; the overall
//! ticket status is changed explicitly and never backfills event records.
//! Closing a ticket is refused while any stage carries a recorded error,
//! so a terminal ticket can only disagree with its event records if the
//! data arrived that way from outside.

use std::sync::Arc;

use debrisflow_core::{
    DateTime, Utc,
    effect::Effect,
    environment::Clock,
    reducer::Reducer,
    SmallVec,
};

use crate::geolocation::GeoLocator;
use crate::lifecycle::{EventStatus, EventType};
use crate::types::{
    GeoPoint, ProjectId, Ticket, TicketEvent, TicketEventId, TicketId, TicketStatus, TruckId,
    UserId,
};

/// State of the ticket aggregate
#[derive(Clone, Debug, Default)]
pub struct TicketState {
    /// All tickets indexed by id
    pub tickets: std::collections::HashMap<TicketId, Ticket>,
    /// Last validation error (if any)
    pub last_error: Option<String>,
}

impl TicketState {
    /// Creates an empty ticket state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a ticket by id
    #[must_use]
    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.get(id)
    }

    /// Whether a ticket with this id exists
    #[must_use]
    pub fn exists(&self, id: &TicketId) -> bool {
        self.tickets.contains_key(id)
    }

    /// Number of tickets held
    #[must_use]
    pub fn count(&self) -> usize {
        self.tickets.len()
    }
}

/// Actions on the ticket aggregate: commands first, then events
#[derive(Clone, Debug)]
pub enum TicketAction {
    // ========== Commands ==========
    /// Open a new ticket for a truck-load transaction
    OpenTicket {
        /// Ticket id chosen by the caller
        id: TicketId,
        /// Owning project
        project_id: ProjectId,
        /// Assigned truck
        truck_id: TruckId,
    },
    /// Record (or re-record) one lifecycle stage
    RecordEvent {
        /// Target ticket
        ticket_id: TicketId,
        /// Stage being recorded
        event_type: EventType,
        /// Recorded outcome
        status: EventStatus,
        /// Free-text note
        notes: Option<String>,
        /// Who recorded the stage
        recorded_by: Option<UserId>,
    },
    /// Change a ticket's overall status
    ChangeStatus {
        /// Target ticket
        ticket_id: TicketId,
        /// New status
        status: TicketStatus,
    },
    /// Ask the geolocator for the ticket's current position
    CaptureLocation {
        /// Target ticket
        ticket_id: TicketId,
    },

    // ========== Events ==========
    /// A ticket was opened
    TicketOpened {
        /// New ticket id
        id: TicketId,
        /// Owning project
        project_id: ProjectId,
        /// Assigned truck
        truck_id: TruckId,
        /// When it was opened
        opened_at: DateTime<Utc>,
    },
    /// A lifecycle stage was recorded
    EventRecorded {
        /// Target ticket
        ticket_id: TicketId,
        /// The recorded event
        event: TicketEvent,
    },
    /// A ticket's overall status changed
    StatusChanged {
        /// Target ticket
        ticket_id: TicketId,
        /// New status
        status: TicketStatus,
        /// When it changed
        changed_at: DateTime<Utc>,
    },
    /// The geolocator produced a position
    LocationCaptured {
        /// Target ticket
        ticket_id: TicketId,
        /// Captured position
        location: GeoPoint,
        /// When the fix arrived
        captured_at: DateTime<Utc>,
    },
    /// The geolocator failed
    LocationCaptureFailed {
        /// Target ticket
        ticket_id: TicketId,
        /// Failure description
        reason: String,
    },
    /// A command failed validation
    ValidationFailed {
        /// What went wrong
        error: String,
    },
}

/// Environment dependencies for the ticket reducer
#[derive(Clone)]
pub struct TicketEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Position source for location capture
    pub geolocator: Arc<dyn GeoLocator>,
}

impl TicketEnvironment {
    /// Creates a new `TicketEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, geolocator: Arc<dyn GeoLocator>) -> Self {
        Self { clock, geolocator }
    }
}

/// Reducer for the ticket aggregate
#[derive(Clone, Debug)]
pub struct TicketReducer;

impl TicketReducer {
    /// Creates a new `TicketReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `OpenTicket` command
    fn validate_open(state: &TicketState, id: &TicketId, truck_id: &TruckId) -> Result<(), String> {
        if state.exists(id) {
            return Err(format!("Ticket {id} already exists"));
        }

        if truck_id.as_str().trim().is_empty() {
            return Err("Truck code cannot be empty".to_string());
        }

        Ok(())
    }

    /// Validates a `RecordEvent` command
    fn validate_record_event(state: &TicketState, ticket_id: &TicketId) -> Result<(), String> {
        let Some(ticket) = state.get(ticket_id) else {
            return Err(format!("Ticket {ticket_id} not found"));
        };

        if ticket.status.is_terminal() {
            return Err(format!(
                "Ticket {ticket_id} is {} and accepts no further events",
                ticket.status
            ));
        }

        Ok(())
    }

    /// Validates a `ChangeStatus` command.
    ///
    /// A transition to a terminal status is refused while any stage carries
    /// a recorded error: terminal means every stage completed, and closing
    /// over an error would silently mask it.
    fn validate_change_status(
        state: &TicketState,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<(), String> {
        let Some(ticket) = state.get(ticket_id) else {
            return Err(format!("Ticket {ticket_id} not found"));
        };

        if status.is_terminal() {
            if let Some(event) = ticket
                .events
                .values()
                .find(|e| e.status == EventStatus::Error)
            {
                return Err(format!(
                    "Cannot mark ticket {ticket_id} as {status}: stage {} has a recorded error",
                    event.event_type
                ));
            }
        }

        Ok(())
    }

    /// Validates a `CaptureLocation` command
    fn validate_capture_location(state: &TicketState, ticket_id: &TicketId) -> Result<(), String> {
        if !state.exists(ticket_id) {
            return Err(format!("Ticket {ticket_id} not found"));
        }

        Ok(())
    }

    /// Applies an event to state
    fn apply_event(state: &mut TicketState, action: &TicketAction) {
        match action {
            TicketAction::TicketOpened {
                id,
                project_id,
                truck_id,
                opened_at,
            } => {
                let ticket = Ticket::open(*id, *project_id, truck_id.clone(), *opened_at);
                state.tickets.insert(*id, ticket);
                state.last_error = None;
            }
            TicketAction::EventRecorded { ticket_id, event } => {
                if let Some(ticket) = state.tickets.get_mut(ticket_id) {
                    let recorded_at = event.timestamp;
                    ticket.record_event(event.clone(), recorded_at);
                }
                state.last_error = None;
            }
            TicketAction::StatusChanged {
                ticket_id,
                status,
                changed_at,
            } => {
                if let Some(ticket) = state.tickets.get_mut(ticket_id) {
                    ticket.status = *status;
                    ticket.updated_at = *changed_at;
                }
                state.last_error = None;
            }
            TicketAction::LocationCaptured {
                ticket_id,
                location,
                captured_at,
            } => {
                if let Some(ticket) = state.tickets.get_mut(ticket_id) {
                    ticket.location = Some(*location);
                    ticket.updated_at = *captured_at;
                }
                state.last_error = None;
            }
            TicketAction::LocationCaptureFailed { ticket_id, reason } => {
                state.last_error = Some(format!("Location capture for {ticket_id} failed: {reason}"));
            }
            TicketAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            }
            // Commands are not applied to state
            TicketAction::OpenTicket { .. }
            | TicketAction::RecordEvent { .. }
            | TicketAction::ChangeStatus { .. }
            | TicketAction::CaptureLocation { .. } => {}
        }
    }
}

impl Default for TicketReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TicketReducer {
    type State = TicketState;
    type Action = TicketAction;
    type Environment = TicketEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TicketAction::OpenTicket {
                id,
                project_id,
                truck_id,
            } => {
                if let Err(error) = Self::validate_open(state, &id, &truck_id) {
                    Self::apply_event(state, &TicketAction::ValidationFailed { error });
                    return SmallVec::new();
                }

                let event = TicketAction::TicketOpened {
                    id,
                    project_id,
                    truck_id,
                    opened_at: env.clock.now(),
                };
                Self::apply_event(state, &event);

                SmallVec::new()
            }

            TicketAction::RecordEvent {
                ticket_id,
                event_type,
                status,
                notes,
                recorded_by,
            } => {
                if let Err(error) = Self::validate_record_event(state, &ticket_id) {
                    Self::apply_event(state, &TicketAction::ValidationFailed { error });
                    return SmallVec::new();
                }

                let mut recorded = TicketEvent::new(
                    TicketEventId::new(),
                    event_type,
                    status,
                    env.clock.now(),
                );
                if let Some(notes) = notes {
                    recorded = recorded.with_notes(notes);
                }
                recorded.recorded_by = recorded_by;

                let event = TicketAction::EventRecorded {
                    ticket_id,
                    event: recorded,
                };
                Self::apply_event(state, &event);

                SmallVec::new()
            }

            TicketAction::ChangeStatus { ticket_id, status } => {
                if let Err(error) = Self::validate_change_status(state, &ticket_id, status) {
                    Self::apply_event(state, &TicketAction::ValidationFailed { error });
                    return SmallVec::new();
                }

                let event = TicketAction::StatusChanged {
                    ticket_id,
                    status,
                    changed_at: env.clock.now(),
                };
                Self::apply_event(state, &event);

                SmallVec::new()
            }

            TicketAction::CaptureLocation { ticket_id } => {
                if let Err(error) = Self::validate_capture_location(state, &ticket_id) {
                    Self::apply_event(state, &TicketAction::ValidationFailed { error });
                    return SmallVec::new();
                }

                let geolocator = Arc::clone(&env.geolocator);
                let clock = Arc::clone(&env.clock);
                smallvec::smallvec![Effect::future(async move {
                    match geolocator.locate().await {
                        Ok(location) => Some(TicketAction::LocationCaptured {
                            ticket_id,
                            location,
                            captured_at: clock.now(),
                        }),
                        Err(error) => Some(TicketAction::LocationCaptureFailed {
                            ticket_id,
                            reason: error.to_string(),
                        }),
                    }
                })]
            }

            // ========== Events ==========
            TicketAction::TicketOpened { .. }
            | TicketAction::EventRecorded { .. }
            | TicketAction::StatusChanged { .. }
            | TicketAction::LocationCaptured { .. }
            | TicketAction::LocationCaptureFailed { .. }
            | TicketAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
                SmallVec::new()
            }
        }
    }
}
