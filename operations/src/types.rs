//! Domain types for the DebrisFlow operations model.
//!
//! This module contains the value objects and entities shared by every
//! aggregate: identifiers, projects, tickets and their recorded lifecycle
//! events, fleet equipment, and validation rules. Status derivation for
//! ticket events lives in [`crate::lifecycle`]; the types here only carry
//! recorded data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::conditions::ConditionValue;
use crate::lifecycle::{EventStatus, EventType};

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a project
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new random `ProjectId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ProjectId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a recorded ticket event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketEventId(Uuid);

impl TicketEventId {
    /// Creates a new random `TicketEventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a piece of equipment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipmentId(Uuid);

impl EquipmentId {
    /// Creates a new random `EquipmentId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EquipmentId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EquipmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a validation rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(Uuid);

impl RuleId {
    /// Creates a new random `RuleId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RuleId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an operator, manager, or driver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fleet-assigned truck code, e.g. `TRUCK-A15`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruckId(String);

impl TruckId {
    /// Wraps a fleet truck code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The truck code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value objects
// ============================================================================

/// A latitude/longitude reading
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, -90 to 90
    pub lat: f64,
    /// Longitude in degrees, -180 to 180
    pub lon: f64,
}

/// Error for out-of-range coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GeoPointError {
    /// Latitude outside -90..=90
    #[error("Invalid latitude")]
    InvalidLatitude,
    /// Longitude outside -180..=180
    #[error("Invalid longitude")]
    InvalidLongitude,
}

impl GeoPoint {
    /// Creates a coordinate pair, validating both ranges
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is out of range
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoPointError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoPointError::InvalidLatitude);
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoPointError::InvalidLongitude);
        }
        Ok(Self { lat, lon })
    }
}

/// Ticket priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Routine work
    Low,
    /// Default priority
    Medium,
    /// Needs attention first
    High,
}

// ============================================================================
// Projects
// ============================================================================

/// Overall status of a project
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Contracted but not yet started
    Pending,
    /// Work in progress
    Active,
    /// Temporarily paused
    OnHold,
    /// All contractual milestones met
    Completed,
    /// Terminated before completion
    Cancelled,
    /// Blocked by data or operational errors
    Error,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Error => "Error",
        };
        write!(f, "{label}")
    }
}

/// Validation errors raised when constructing a [`Project`]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidProject {
    /// End date earlier than start date
    #[error("End date cannot be before start date")]
    DatesOutOfOrder,
    /// Progress outside 0..=100
    #[error("Progress must be between 0 and 100 (got {0})")]
    ProgressOutOfRange(u8),
}

/// A contractual engagement aggregating many tickets and equipment
/// assignments.
///
/// `progress` is an externally supplied milestone percentage. It is NOT
/// derived from constituent ticket progress: project-level progress
/// reflects contractual milestones, not a mechanical average of ticket
/// completion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Contracting client
    pub client: String,
    /// Optional external event code, e.g. a FEMA declaration number
    pub event_code: Option<String>,
    /// Operating region
    pub region: String,
    /// Contracted service codes
    pub service_codes: Vec<String>,
    /// First day of operations
    pub start_date: NaiveDate,
    /// Last contracted day of operations
    pub end_date: NaiveDate,
    /// Free-text description
    pub description: Option<String>,
    /// Overall status
    pub status: ProjectStatus,
    /// Milestone progress percentage, 0-100, externally supplied
    pub progress: u8,
    /// Count of tickets currently flagged with errors
    pub error_count: u32,
    /// Transactions generated to date
    pub transactions_generated: u32,
    /// Last update timestamp
    pub last_updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project, validating the date range and progress bounds
    ///
    /// # Errors
    ///
    /// Returns [`InvalidProject`] if `end_date < start_date` or `progress`
    /// exceeds 100
    #[allow(clippy::too_many_arguments)] // Construction mirrors the project intake form
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        client: impl Into<String>,
        region: impl Into<String>,
        service_codes: Vec<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: ProjectStatus,
        progress: u8,
        last_updated_at: DateTime<Utc>,
    ) -> Result<Self, InvalidProject> {
        if end_date < start_date {
            return Err(InvalidProject::DatesOutOfOrder);
        }
        if progress > 100 {
            return Err(InvalidProject::ProgressOutOfRange(progress));
        }

        Ok(Self {
            id,
            name: name.into(),
            client: client.into(),
            event_code: None,
            region: region.into(),
            service_codes,
            start_date,
            end_date,
            description: None,
            status,
            progress,
            error_count: 0,
            transactions_generated: 0,
            last_updated_at,
        })
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// Overall status of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Created, load call not yet made
    Open,
    /// Moving through the lifecycle
    InProgress,
    /// Paused by an operator
    OnHold,
    /// Completed and verified
    Resolved,
    /// Completed and archived
    Closed,
    /// Blocked by a recorded error
    Error,
    /// Flagged for manual review
    RequiresAttention,
}

impl TicketStatus {
    /// Whether this status ends the lifecycle (`Closed` or `Resolved`)
    ///
    /// A terminal status requires every lifecycle event to be completed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Resolved)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Error => "Error",
            Self::RequiresAttention => "Requires Attention",
        };
        write!(f, "{label}")
    }
}

/// One fixed lifecycle stage's recorded outcome for a given ticket
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketEvent {
    /// Unique identifier
    pub id: TicketEventId,
    /// Which lifecycle stage this records
    pub event_type: EventType,
    /// When the stage was recorded
    pub timestamp: DateTime<Utc>,
    /// Recorded status
    pub status: EventStatus,
    /// Free-text note
    pub notes: Option<String>,
    /// Who recorded the event
    pub recorded_by: Option<UserId>,
    /// Where the event was recorded
    pub location: Option<GeoPoint>,
}

impl TicketEvent {
    /// Creates a recorded event for one lifecycle stage
    #[must_use]
    pub const fn new(
        id: TicketEventId,
        event_type: EventType,
        status: EventStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            event_type,
            timestamp,
            status,
            notes: None,
            recorded_by: None,
            location: None,
        }
    }

    /// Attach a free-text note
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A unit of work representing one truck-load transaction through the
/// debris-removal lifecycle.
///
/// Recorded events occupy one slot per [`EventType`]; slots for stages the
/// ticket has not reached yet stay empty, and the resolver in
/// [`crate::lifecycle`] derives their display status on demand. Changing
/// `status` never backfills event records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier
    pub id: TicketId,
    /// Owning project
    pub project_id: ProjectId,
    /// Assigned truck
    pub truck_id: TruckId,
    /// Assigned driver, once known
    pub driver_id: Option<UserId>,
    /// Overall status
    pub status: TicketStatus,
    /// Recorded lifecycle events, one optional slot per stage
    pub events: BTreeMap<EventType, TicketEvent>,
    /// Reference to the load photo, if captured
    pub load_photo: Option<String>,
    /// Last captured GPS position for the ticket
    pub location: Option<GeoPoint>,
    /// Error notes accumulated by validation
    pub error_notes: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Optional priority
    pub priority: Option<Priority>,
}

impl Ticket {
    /// Opens a new ticket.
    ///
    /// The first lifecycle stage is implicitly satisfied at creation, so a
    /// completed [`EventType::TicketCreated`] event is recorded immediately.
    #[must_use]
    pub fn open(
        id: TicketId,
        project_id: ProjectId,
        truck_id: TruckId,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut events = BTreeMap::new();
        events.insert(
            EventType::TicketCreated,
            TicketEvent::new(
                TicketEventId::new(),
                EventType::TicketCreated,
                EventStatus::Completed,
                created_at,
            ),
        );

        Self {
            id,
            project_id,
            truck_id,
            driver_id: None,
            status: TicketStatus::Open,
            events,
            load_photo: None,
            location: None,
            error_notes: Vec::new(),
            created_at,
            updated_at: created_at,
            priority: None,
        }
    }

    /// The recorded event for a stage, if any
    #[must_use]
    pub fn recorded_event(&self, event_type: EventType) -> Option<&TicketEvent> {
        self.events.get(&event_type)
    }

    /// Record (or re-record) one lifecycle stage.
    ///
    /// This is the only way ticket event state changes.
    pub fn record_event(&mut self, event: TicketEvent, recorded_at: DateTime<Utc>) {
        self.events.insert(event.event_type, event);
        self.updated_at = recorded_at;
    }
}

// ============================================================================
// Equipment
// ============================================================================

/// Kind of equipment in the fleet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentType {
    /// Haul truck
    Truck,
    /// Front loader
    Loader,
    /// Excavator
    Excavator,
    /// Compaction roller
    Roller,
    /// GPS tracking unit
    GpsUnit,
}

/// Availability of a piece of equipment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentStatus {
    /// Ready for assignment
    Available,
    /// Assigned to a project or ticket
    InUse,
    /// Undergoing maintenance
    Maintenance,
    /// Unavailable until further notice
    OutOfService,
}

/// A contractor-supplied machine or device tracked by the fleet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique identifier
    pub id: EquipmentId,
    /// Kind of equipment
    pub equipment_type: EquipmentType,
    /// Availability status
    pub status: EquipmentStatus,
    /// Owning contractor
    pub contractor: String,
    /// Model name, if known
    pub model: Option<String>,
    /// Model year, if known
    pub year: Option<u16>,
    /// Last maintenance date
    pub last_maintenance: Option<NaiveDate>,
    /// Project currently using this equipment
    pub current_project: Option<ProjectId>,
    /// Ticket currently using this equipment
    pub current_ticket: Option<TicketId>,
}

impl Equipment {
    /// Creates an available, unassigned piece of equipment
    pub fn new(id: EquipmentId, equipment_type: EquipmentType, contractor: impl Into<String>) -> Self {
        Self {
            id,
            equipment_type,
            status: EquipmentStatus::Available,
            contractor: contractor.into(),
            model: None,
            year: None,
            last_maintenance: None,
            current_project: None,
            current_ticket: None,
        }
    }
}

// ============================================================================
// Validation rules
// ============================================================================

/// An unexecuted, user-authored structured condition intended for future
/// automated data-quality checks.
///
/// The condition document is opaque to this crate: it must be well-formed
/// structured data, and nothing more. No evaluation engine consumes it
/// here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Unique identifier
    pub id: RuleId,
    /// Short display name
    pub name: String,
    /// What the rule is meant to check
    pub description: String,
    /// Whether the rule participates in (future) evaluation
    pub is_active: bool,
    /// The structured condition document
    pub conditions: ConditionValue,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn every_id_round_trips_through_its_uuid() {
        let uuid = uuid::Uuid::from_u128(0xDEAD_BEEF);
        assert_eq!(ProjectId::from_uuid(uuid).as_uuid(), &uuid);
        assert_eq!(TicketId::from_uuid(uuid).as_uuid(), &uuid);
        assert_eq!(EquipmentId::from_uuid(uuid).as_uuid(), &uuid);
        assert_eq!(RuleId::from_uuid(uuid).as_uuid(), &uuid);
    }

    #[test]
    fn geo_point_validates_ranges() {
        assert!(GeoPoint::new(29.9511, -90.0715).is_ok());
        assert_eq!(GeoPoint::new(91.0, 0.0), Err(GeoPointError::InvalidLatitude));
        assert_eq!(GeoPoint::new(0.0, -181.0), Err(GeoPointError::InvalidLongitude));
    }

    #[test]
    fn project_rejects_reversed_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let result = Project::new(
            ProjectId::new(),
            "Flood Mitigation",
            "State DOT",
            "Iowa",
            vec!["SILT".to_string()],
            start,
            end,
            ProjectStatus::Active,
            0,
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), InvalidProject::DatesOutOfOrder);
    }

    #[test]
    fn project_rejects_progress_over_100() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let result = Project::new(
            ProjectId::new(),
            "Test",
            "Client",
            "Region",
            Vec::new(),
            start,
            end,
            ProjectStatus::Active,
            101,
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), InvalidProject::ProgressOutOfRange(101));
    }

    #[test]
    fn opening_a_ticket_records_the_creation_stage() {
        let ticket = Ticket::open(
            TicketId::new(),
            ProjectId::new(),
            TruckId::new("TRUCK-A15"),
            Utc::now(),
        );

        assert_eq!(ticket.status, TicketStatus::Open);
        let created = ticket.recorded_event(EventType::TicketCreated).unwrap();
        assert_eq!(created.status, EventStatus::Completed);
        assert!(ticket.recorded_event(EventType::LoadCall).is_none());
    }

    #[test]
    fn recording_an_event_touches_updated_at() {
        let opened = Utc::now();
        let mut ticket = Ticket::open(
            TicketId::new(),
            ProjectId::new(),
            TruckId::new("TRUCK-B07"),
            opened,
        );

        let later = opened + chrono::Duration::hours(2);
        let event = TicketEvent::new(
            TicketEventId::new(),
            EventType::LoadCall,
            EventStatus::Completed,
            later,
        );
        ticket.record_event(event, later);

        assert_eq!(ticket.updated_at, later);
        assert!(ticket.recorded_event(EventType::LoadCall).is_some());
    }

    #[test]
    fn terminal_statuses() {
        assert!(TicketStatus::Closed.is_terminal());
        assert!(TicketStatus::Resolved.is_terminal());
        assert!(!TicketStatus::Error.is_terminal());
        assert!(!TicketStatus::InProgress.is_terminal());
    }
}
