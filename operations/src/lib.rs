//! # DebrisFlow Operations
//!
//! Domain model for a disaster-debris-removal operations dashboard:
//! projects, truck-load tickets moving through a fixed lifecycle, fleet
//! equipment, and user-authored validation rules.
//!
//! The heart of the crate is the ticket lifecycle in [`lifecycle`]: nine
//! ordered stages, a pure resolver that derives each stage's display
//! status from the recorded events and the ticket's overall status, and a
//! progress fraction computed from the resolved stages. State changes flow
//! through reducers in [`aggregates`]; dashboards read the denormalized
//! views in [`projections`].
//!
//! # Quick Start
//!
//! ```no_run
//! use debrisflow_operations::aggregates::ticket::{
//!     TicketAction, TicketEnvironment, TicketReducer, TicketState,
//! };
//! use debrisflow_operations::geolocation::FixedGeoLocator;
//! use debrisflow_operations::types::{GeoPoint, ProjectId, TicketId, TruckId};
//! use debrisflow_core::environment::SystemClock;
//! use debrisflow_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let position = GeoPoint::new(27.95, -82.46)?;
//! let env = TicketEnvironment::new(
//!     Arc::new(SystemClock),
//!     Arc::new(FixedGeoLocator::new(position)),
//! );
//! let store = Store::new(TicketState::new(), TicketReducer::new(), env);
//!
//! let id = TicketId::new();
//! store.send(TicketAction::OpenTicket {
//!     id,
//!     project_id: ProjectId::new(),
//!     truck_id: TruckId::new("TRUCK-A15"),
//! }).await?;
//!
//! let progress = store
//!     .state(|s| s.get(&id).map(|t| t.progress_percent()))
//!     .await;
//! println!("Progress: {progress:?}");
//! # Ok(())
//! # }
//! ```

pub mod aggregates;
pub mod conditions;
pub mod fixtures;
pub mod geolocation;
pub mod lifecycle;
pub mod projections;
pub mod repository;
pub mod types;

// Re-export commonly used types
pub use conditions::{ConditionError, ConditionValue};
pub use lifecycle::{ConsistencyIssue, EventStatus, EventType, ResolvedEvent, resolve_status};
pub use repository::{Entity, InMemoryRepository, Repository, RepositoryError};
pub use types::{
    Equipment, EquipmentId, EquipmentStatus, EquipmentType, GeoPoint, Priority, Project,
    ProjectId, ProjectStatus, RuleId, Ticket, TicketEvent, TicketEventId, TicketId, TicketStatus,
    TruckId, UserId, ValidationRule,
};
