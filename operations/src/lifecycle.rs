//! Ticket lifecycle model: the fixed stage registry and status resolution.
//!
//! Every ticket moves through the same nine lifecycle stages, in an order
//! fixed at compile time. A ticket records an event per stage as work
//! happens; stages without a recorded event fall back to the stage default.
//! Display status is *derived on demand* by [`resolve_status`]: recorded
//! events and the ticket's overall status are kept independent, and the
//! resolver never writes its result back.
//!
//! The one hard override: a ticket whose overall status is terminal
//! (`Closed` or `Resolved`) resolves every stage to `Completed` regardless
//! of recorded data. [`Ticket::consistency_issues`] surfaces the cases
//! where that override is masking contradictory records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Ticket, TicketStatus};

/// Number of lifecycle stages; every ticket resolves to exactly this many
/// events.
pub const STAGE_COUNT: usize = 9;

/// The fixed, ordered lifecycle stages of a ticket.
///
/// Declaration order is the lifecycle order and is never reordered at
/// runtime. Consumers needing "what stage comes after X" or "is this the
/// terminal stage" must derive it from [`EventType::ALL`], not from any
/// other field.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EventType {
    /// Ticket opened in the system
    TicketCreated,
    /// Dispatcher called the truck in for loading
    LoadCall,
    /// Truck arrived at the load site
    ArrivalAtLoadSite,
    /// Debris load completed
    LoadComplete,
    /// Truck departed the load site
    DepartureFromLoadSite,
    /// Truck arrived at the disposal site
    ArrivalAtDisposalSite,
    /// Disposal completed
    DisposalComplete,
    /// Truck departed the disposal site
    DepartureFromDisposalSite,
    /// Ticket closed out
    TicketClosed,
}

impl EventType {
    /// All stages in lifecycle order
    pub const ALL: [EventType; STAGE_COUNT] = [
        EventType::TicketCreated,
        EventType::LoadCall,
        EventType::ArrivalAtLoadSite,
        EventType::LoadComplete,
        EventType::DepartureFromLoadSite,
        EventType::ArrivalAtDisposalSite,
        EventType::DisposalComplete,
        EventType::DepartureFromDisposalSite,
        EventType::TicketClosed,
    ];

    /// Position of this stage within the lifecycle
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The stage following this one, if any
    #[must_use]
    pub fn next(self) -> Option<EventType> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Whether this is the final lifecycle stage
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.index() == STAGE_COUNT - 1
    }

    /// The status a stage reports before anything is recorded for it.
    ///
    /// All stages default to `Pending` except the first: a ticket's
    /// creation stage is implicitly satisfied the moment the ticket
    /// exists.
    #[must_use]
    pub const fn default_status(self) -> EventStatus {
        match self {
            EventType::TicketCreated => EventStatus::Completed,
            _ => EventStatus::Pending,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TicketCreated => "Ticket Created",
            Self::LoadCall => "Load Call",
            Self::ArrivalAtLoadSite => "Arrival at Load Site",
            Self::LoadComplete => "Load Complete",
            Self::DepartureFromLoadSite => "Departure from Load Site",
            Self::ArrivalAtDisposalSite => "Arrival at Disposal Site",
            Self::DisposalComplete => "Disposal Complete",
            Self::DepartureFromDisposalSite => "Departure from Disposal Site",
            Self::TicketClosed => "Ticket Closed",
        };
        write!(f, "{label}")
    }
}

/// Display status of a single lifecycle stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Stage not reached yet
    Pending,
    /// Stage currently underway
    Active,
    /// Stage finished successfully
    Completed,
    /// Stage failed; blocks ticket resolution
    Error,
    /// Stage bypassed; non-blocking but not completed
    Skipped,
}

impl EventStatus {
    /// Completed-or-active flag used for connector styling between stages.
    ///
    /// The segment joining two stage indicators renders as "traversed"
    /// exactly when the earlier stage resolves to this.
    #[must_use]
    pub const fn is_traversed(self) -> bool {
        matches!(self, Self::Completed | Self::Active)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Skipped => "skipped",
        };
        write!(f, "{label}")
    }
}

/// Derive the display status for one stage.
///
/// - A terminal ticket status (`Closed`/`Resolved`) forces `Completed`,
///   overriding any recorded value. This is invariant enforcement, not a
///   suggestion.
/// - Otherwise a recorded status is retained as-is.
/// - Otherwise the stage default applies.
///
/// The function is pure: resolving the same inputs twice yields identical
/// results, and nothing is written back to the ticket.
#[must_use]
pub const fn resolve_status(
    ticket_status: TicketStatus,
    event_type: EventType,
    recorded: Option<EventStatus>,
) -> EventStatus {
    if ticket_status.is_terminal() {
        return EventStatus::Completed;
    }
    match recorded {
        Some(status) => status,
        None => event_type.default_status(),
    }
}

/// One entry of a ticket's resolved lifecycle view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEvent {
    /// The lifecycle stage
    pub event_type: EventType,
    /// The derived display status
    pub status: EventStatus,
    /// Whether the ticket actually has a recorded event for this stage
    pub recorded: bool,
}

impl ResolvedEvent {
    /// Connector flag for the segment following this stage
    #[must_use]
    pub const fn is_traversed(&self) -> bool {
        self.status.is_traversed()
    }
}

/// A data inconsistency the resolver's override would otherwise hide.
///
/// The resolver keeps the forced all-`Completed` view for terminal
/// tickets, but the mismatch between recorded data and ticket status is
/// recoverable information; callers surface these as validation findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyIssue {
    /// A terminal ticket carries a recorded `error` event
    TerminalWithErrorEvent {
        /// The offending stage
        event_type: EventType,
    },
    /// A terminal ticket carries a recorded, non-completed stage
    TerminalWithIncompleteStage {
        /// The offending stage
        event_type: EventType,
        /// The recorded status
        recorded: EventStatus,
    },
    /// An `error` event exists but the ticket status does not reflect it
    ErrorEventWithoutErrorStatus {
        /// The offending stage
        event_type: EventType,
    },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerminalWithErrorEvent { event_type } => {
                write!(f, "terminal ticket has an error event at '{event_type}'")
            },
            Self::TerminalWithIncompleteStage {
                event_type,
                recorded,
            } => write!(
                f,
                "terminal ticket has a non-completed stage '{event_type}' ({recorded})"
            ),
            Self::ErrorEventWithoutErrorStatus { event_type } => write!(
                f,
                "ticket has an error event at '{event_type}' but its status does not reflect it"
            ),
        }
    }
}

impl Ticket {
    /// Resolve every lifecycle stage in registry order.
    ///
    /// Always yields exactly [`STAGE_COUNT`] entries regardless of how many
    /// events are recorded. The iterator is lazy and restartable; calling
    /// it twice on the same ticket yields identical sequences.
    pub fn resolved_events(&self) -> impl Iterator<Item = ResolvedEvent> + '_ {
        EventType::ALL.into_iter().map(|event_type| {
            let recorded = self.recorded_event(event_type).map(|e| e.status);
            ResolvedEvent {
                event_type,
                status: resolve_status(self.status, event_type, recorded),
                recorded: recorded.is_some(),
            }
        })
    }

    /// Completed stages as a fraction of all stages, in `[0, 1]`.
    ///
    /// `Skipped` and `Error` stages are excluded from the numerator but
    /// included in the denominator.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let completed = self
            .resolved_events()
            .filter(|e| e.status == EventStatus::Completed)
            .count();
        #[allow(clippy::cast_precision_loss)] // stage counts are tiny
        {
            completed as f64 / STAGE_COUNT as f64
        }
    }

    /// Completed stages as a whole percentage, 0-100
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (self.progress() * 100.0).round() as u8
        }
    }

    /// Recorded data that contradicts the ticket's overall status.
    ///
    /// Empty for consistent tickets. The resolver still presents the
    /// terminal override either way; these findings exist so the mismatch
    /// is observable instead of silently masked.
    #[must_use]
    pub fn consistency_issues(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        for (event_type, event) in &self.events {
            if self.status.is_terminal() {
                match event.status {
                    EventStatus::Completed => {},
                    EventStatus::Error => {
                        issues.push(ConsistencyIssue::TerminalWithErrorEvent {
                            event_type: *event_type,
                        });
                    },
                    recorded => {
                        issues.push(ConsistencyIssue::TerminalWithIncompleteStage {
                            event_type: *event_type,
                            recorded,
                        });
                    },
                }
            } else if event.status == EventStatus::Error
                && !matches!(
                    self.status,
                    TicketStatus::Error | TicketStatus::RequiresAttention
                )
            {
                issues.push(ConsistencyIssue::ErrorEventWithoutErrorStatus {
                    event_type: *event_type,
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProjectId, TicketEvent, TicketEventId, TicketId, TruckId};
    use chrono::Utc;

    fn open_ticket(status: TicketStatus) -> Ticket {
        let mut ticket = Ticket::open(
            TicketId::new(),
            ProjectId::new(),
            TruckId::new("TRUCK-A15"),
            Utc::now(),
        );
        ticket.status = status;
        ticket
    }

    fn record(ticket: &mut Ticket, event_type: EventType, status: EventStatus) {
        let now = Utc::now();
        ticket.record_event(
            TicketEvent::new(TicketEventId::new(), event_type, status, now),
            now,
        );
    }

    #[test]
    fn registry_order_is_fixed() {
        assert_eq!(EventType::ALL.len(), STAGE_COUNT);
        assert_eq!(EventType::TicketCreated.index(), 0);
        assert_eq!(EventType::TicketClosed.index(), 8);
        assert_eq!(EventType::LoadCall.next(), Some(EventType::ArrivalAtLoadSite));
        assert_eq!(EventType::TicketClosed.next(), None);
        assert!(EventType::TicketClosed.is_terminal());
        assert!(!EventType::DisposalComplete.is_terminal());
    }

    #[test]
    fn default_statuses() {
        assert_eq!(
            EventType::TicketCreated.default_status(),
            EventStatus::Completed
        );
        for event_type in EventType::ALL.into_iter().skip(1) {
            assert_eq!(event_type.default_status(), EventStatus::Pending);
        }
    }

    #[test]
    fn fresh_in_progress_ticket_resolves_to_one_completed_stage() {
        let ticket = open_ticket(TicketStatus::InProgress);

        let resolved: Vec<_> = ticket.resolved_events().collect();
        assert_eq!(resolved.len(), STAGE_COUNT);
        assert_eq!(resolved[0].status, EventStatus::Completed);
        for entry in &resolved[1..] {
            assert_eq!(entry.status, EventStatus::Pending);
            assert!(!entry.recorded);
        }

        assert!((ticket.progress() - 1.0 / 9.0).abs() < f64::EPSILON);
        assert_eq!(ticket.progress_percent(), 11);
    }

    #[test]
    fn terminal_status_forces_every_stage_completed() {
        let mut ticket = open_ticket(TicketStatus::Resolved);
        record(&mut ticket, EventType::LoadCall, EventStatus::Error);

        for entry in ticket.resolved_events() {
            assert_eq!(entry.status, EventStatus::Completed);
        }
        assert!((ticket.progress() - 1.0).abs() < f64::EPSILON);

        // The override masks a contradiction; it must still be observable.
        assert_eq!(
            ticket.consistency_issues(),
            vec![ConsistencyIssue::TerminalWithErrorEvent {
                event_type: EventType::LoadCall
            }]
        );
    }

    #[test]
    fn recorded_statuses_are_retained_for_open_tickets() {
        let mut ticket = open_ticket(TicketStatus::InProgress);
        record(&mut ticket, EventType::LoadCall, EventStatus::Completed);
        record(&mut ticket, EventType::ArrivalAtLoadSite, EventStatus::Active);
        record(&mut ticket, EventType::LoadComplete, EventStatus::Skipped);

        let resolved: Vec<_> = ticket.resolved_events().collect();
        assert_eq!(resolved[1].status, EventStatus::Completed);
        assert_eq!(resolved[2].status, EventStatus::Active);
        assert_eq!(resolved[3].status, EventStatus::Skipped);
        assert_eq!(resolved[4].status, EventStatus::Pending);
    }

    #[test]
    fn skipped_and_error_stages_do_not_count_toward_progress() {
        let mut ticket = open_ticket(TicketStatus::InProgress);
        record(&mut ticket, EventType::LoadCall, EventStatus::Completed);
        record(&mut ticket, EventType::ArrivalAtLoadSite, EventStatus::Skipped);
        record(&mut ticket, EventType::LoadComplete, EventStatus::Error);

        // TicketCreated + LoadCall completed out of nine stages.
        assert!((ticket.progress() - 2.0 / 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn connector_flag_is_completed_or_active() {
        assert!(EventStatus::Completed.is_traversed());
        assert!(EventStatus::Active.is_traversed());
        assert!(!EventStatus::Pending.is_traversed());
        assert!(!EventStatus::Error.is_traversed());
        assert!(!EventStatus::Skipped.is_traversed());
    }

    #[test]
    fn error_event_on_open_ticket_is_flagged_when_status_disagrees() {
        let mut ticket = open_ticket(TicketStatus::InProgress);
        record(&mut ticket, EventType::DisposalComplete, EventStatus::Error);

        assert_eq!(
            ticket.consistency_issues(),
            vec![ConsistencyIssue::ErrorEventWithoutErrorStatus {
                event_type: EventType::DisposalComplete
            }]
        );

        // Once the ticket status reflects the error there is no issue.
        ticket.status = TicketStatus::Error;
        assert!(ticket.consistency_issues().is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut ticket = open_ticket(TicketStatus::InProgress);
        record(&mut ticket, EventType::LoadCall, EventStatus::Active);

        let first: Vec<_> = ticket.resolved_events().collect();
        let second: Vec<_> = ticket.resolved_events().collect();
        assert_eq!(first, second);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_event_status() -> impl Strategy<Value = EventStatus> {
            prop_oneof![
                Just(EventStatus::Pending),
                Just(EventStatus::Active),
                Just(EventStatus::Completed),
                Just(EventStatus::Error),
                Just(EventStatus::Skipped),
            ]
        }

        fn any_ticket_status() -> impl Strategy<Value = TicketStatus> {
            prop_oneof![
                Just(TicketStatus::Open),
                Just(TicketStatus::InProgress),
                Just(TicketStatus::OnHold),
                Just(TicketStatus::Resolved),
                Just(TicketStatus::Closed),
                Just(TicketStatus::Error),
                Just(TicketStatus::RequiresAttention),
            ]
        }

        fn arbitrary_ticket() -> impl Strategy<Value = Ticket> {
            (
                any_ticket_status(),
                proptest::collection::vec(proptest::option::of(any_event_status()), STAGE_COUNT),
            )
                .prop_map(|(status, slots)| {
                    let mut ticket = open_ticket(status);
                    for (event_type, slot) in EventType::ALL.into_iter().zip(slots) {
                        if let Some(event_status) = slot {
                            record(&mut ticket, event_type, event_status);
                        }
                    }
                    ticket
                })
        }

        proptest! {
            #[test]
            fn always_exactly_nine_entries_in_order(ticket in arbitrary_ticket()) {
                let resolved: Vec<_> = ticket.resolved_events().collect();
                prop_assert_eq!(resolved.len(), STAGE_COUNT);
                for (entry, expected) in resolved.iter().zip(EventType::ALL) {
                    prop_assert_eq!(entry.event_type, expected);
                }
            }

            #[test]
            fn resolution_is_pure(ticket in arbitrary_ticket()) {
                let first: Vec<_> = ticket.resolved_events().collect();
                let second: Vec<_> = ticket.resolved_events().collect();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn terminal_tickets_resolve_fully_completed(ticket in arbitrary_ticket()) {
                prop_assume!(ticket.status.is_terminal());
                for entry in ticket.resolved_events() {
                    prop_assert_eq!(entry.status, EventStatus::Completed);
                }
            }

            #[test]
            fn completing_a_pending_stage_never_lowers_progress(
                ticket in arbitrary_ticket(),
                stage_index in 0usize..STAGE_COUNT,
            ) {
                let before = ticket.progress();

                let mut advanced = ticket.clone();
                let event_type = EventType::ALL[stage_index];
                record(&mut advanced, event_type, EventStatus::Completed);

                prop_assert!(advanced.progress() >= before - f64::EPSILON);
            }
        }
    }
}
