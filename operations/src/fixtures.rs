//! Deterministic seed data for development and demos.
//!
//! Identifiers are fixed so repeated runs produce the same dataset and
//! tests can refer to entities by id.

// Seed literals satisfy every constructor invariant
#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::conditions::ConditionValue;
use crate::lifecycle::{EventStatus, EventType};
use crate::types::{
    Equipment, EquipmentId, EquipmentStatus, EquipmentType, Priority, Project, ProjectId,
    ProjectStatus, Ticket, TicketEvent, TicketEventId, TicketId, TicketStatus, TruckId,
    ValidationRule,
};

/// Seed project: active hurricane-response engagement
#[must_use]
pub fn project_gulf_coast() -> ProjectId {
    ProjectId::from_uuid(Uuid::from_u128(0x1001))
}

/// Seed project: completed ice-storm cleanup
#[must_use]
pub fn project_cedar_rapids() -> ProjectId {
    ProjectId::from_uuid(Uuid::from_u128(0x1002))
}

/// Seed project: pending wildfire debris contract
#[must_use]
pub fn project_sierra_burn() -> ProjectId {
    ProjectId::from_uuid(Uuid::from_u128(0x1003))
}

/// Seed project: on-hold levee reinforcement
#[must_use]
pub fn project_delta_levee() -> ProjectId {
    ProjectId::from_uuid(Uuid::from_u128(0x1004))
}

fn ticket_id(n: u128) -> TicketId {
    TicketId::from_uuid(Uuid::from_u128(0x2000 + n))
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Seed literals are in range
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// Four projects spanning every interesting status
#[must_use]
pub fn projects() -> Vec<Project> {
    let mut gulf = Project::new(
        project_gulf_coast(),
        "Hurricane Milton Response",
        "Gulf Coast Emergency Management",
        "Pinellas County, FL",
        vec!["VEG-ROW".to_string(), "CD-ROW".to_string(), "STUMP".to_string()],
        date(2024, 10, 12),
        date(2025, 4, 30),
        ProjectStatus::Active,
        65,
        timestamp(2024, 11, 18, 16, 45),
    )
    .unwrap();
    gulf.event_code = Some("DR-4834-FL".to_string());
    gulf.description = Some("Right-of-way vegetative and C&D debris removal".to_string());
    gulf.error_count = 3;
    gulf.transactions_generated = 1205;

    let mut cedar = Project::new(
        project_cedar_rapids(),
        "Cedar Rapids Ice Storm Cleanup",
        "City of Cedar Rapids",
        "Linn County, IA",
        vec!["VEG-ROW".to_string(), "HANGER".to_string()],
        date(2024, 1, 15),
        date(2024, 5, 31),
        ProjectStatus::Completed,
        100,
        timestamp(2024, 6, 2, 9, 10),
    )
    .unwrap();
    cedar.transactions_generated = 842;

    let sierra = Project::new(
        project_sierra_burn(),
        "Sierra Burn Scar Removal",
        "Cal OES",
        "Plumas County, CA",
        vec!["ASH".to_string(), "METAL".to_string()],
        date(2025, 1, 6),
        date(2025, 9, 30),
        ProjectStatus::Pending,
        0,
        timestamp(2024, 11, 20, 8, 0),
    )
    .unwrap();

    let mut levee = Project::new(
        project_delta_levee(),
        "Delta Levee Reinforcement",
        "Army Corps of Engineers",
        "Sacramento County, CA",
        vec!["SILT".to_string()],
        date(2024, 8, 1),
        date(2025, 2, 28),
        ProjectStatus::OnHold,
        40,
        timestamp(2024, 11, 1, 13, 30),
    )
    .unwrap();
    levee.error_count = 1;
    levee.transactions_generated = 310;

    vec![gulf, cedar, sierra, levee]
}

fn record(
    ticket: &mut Ticket,
    event_type: EventType,
    status: EventStatus,
    at: chrono::DateTime<Utc>,
) {
    ticket.record_event(
        TicketEvent::new(TicketEventId::new(), event_type, status, at),
        at,
    );
}

/// Five tickets covering the full spread of lifecycle positions
#[must_use]
pub fn tickets() -> Vec<Ticket> {
    let day = |h, m| timestamp(2024, 11, 18, h, m);

    // Mid-lifecycle: four stages traversed, currently loading
    let mut in_progress = Ticket::open(
        ticket_id(1),
        project_gulf_coast(),
        TruckId::new("TRUCK-A15"),
        day(6, 5),
    );
    in_progress.status = TicketStatus::InProgress;
    in_progress.priority = Some(Priority::High);
    record(&mut in_progress, EventType::LoadCall, EventStatus::Completed, day(6, 20));
    record(&mut in_progress, EventType::ArrivalAtLoadSite, EventStatus::Completed, day(6, 40));
    record(&mut in_progress, EventType::LoadComplete, EventStatus::Active, day(7, 5));

    // Fully traversed and verified
    let mut resolved = Ticket::open(
        ticket_id(2),
        project_gulf_coast(),
        TruckId::new("TRUCK-B07"),
        day(5, 30),
    );
    resolved.status = TicketStatus::Resolved;
    for (offset, event_type) in EventType::ALL.iter().skip(1).enumerate() {
        let minutes = u32::try_from(offset).unwrap_or(0) * 25;
        record(
            &mut resolved,
            *event_type,
            EventStatus::Completed,
            day(8, 0) + chrono::Duration::minutes(i64::from(minutes)),
        );
    }

    // Blocked: the disposal site turned the load away on arrival
    let mut errored = Ticket::open(
        ticket_id(3),
        project_gulf_coast(),
        TruckId::new("TRUCK-C22"),
        day(9, 15),
    );
    errored.status = TicketStatus::Error;
    errored.error_notes.push("Load volume exceeds truck capacity".to_string());
    record(&mut errored, EventType::LoadCall, EventStatus::Completed, day(9, 30));
    record(&mut errored, EventType::ArrivalAtLoadSite, EventStatus::Completed, day(9, 50));
    record(&mut errored, EventType::LoadComplete, EventStatus::Completed, day(10, 10));
    record(&mut errored, EventType::ArrivalAtDisposalSite, EventStatus::Error, day(10, 25));

    // Freshly opened, nothing beyond creation
    let open = Ticket::open(
        ticket_id(4),
        project_delta_levee(),
        TruckId::new("TRUCK-D03"),
        day(11, 0),
    );

    // Archived
    let mut closed = Ticket::open(
        ticket_id(5),
        project_cedar_rapids(),
        TruckId::new("TRUCK-E41"),
        timestamp(2024, 5, 20, 7, 45),
    );
    closed.status = TicketStatus::Closed;
    for (offset, event_type) in EventType::ALL.iter().skip(1).enumerate() {
        let minutes = u32::try_from(offset).unwrap_or(0) * 30;
        record(
            &mut closed,
            *event_type,
            EventStatus::Completed,
            timestamp(2024, 5, 20, 8, 0) + chrono::Duration::minutes(i64::from(minutes)),
        );
    }

    vec![in_progress, resolved, errored, open, closed]
}

/// Five pieces of equipment across the fleet
#[must_use]
pub fn equipment() -> Vec<Equipment> {
    let id = |n: u128| EquipmentId::from_uuid(Uuid::from_u128(0x3000 + n));

    let mut truck = Equipment::new(id(1), EquipmentType::Truck, "Bayou Hauling LLC");
    truck.status = EquipmentStatus::InUse;
    truck.model = Some("Kenworth T880".to_string());
    truck.year = Some(2021);
    truck.current_project = Some(project_gulf_coast());
    truck.current_ticket = Some(ticket_id(1));

    let mut loader = Equipment::new(id(2), EquipmentType::Loader, "GroundForce Rentals");
    loader.status = EquipmentStatus::InUse;
    loader.model = Some("CAT 950M".to_string());
    loader.year = Some(2019);
    loader.current_project = Some(project_gulf_coast());

    let mut excavator = Equipment::new(id(3), EquipmentType::Excavator, "DigIt Contractors");
    excavator.model = Some("Komatsu PC210".to_string());
    excavator.year = Some(2022);
    excavator.last_maintenance = Some(date(2024, 10, 2));

    let mut roller = Equipment::new(id(4), EquipmentType::Roller, "GroundForce Rentals");
    roller.status = EquipmentStatus::Maintenance;
    roller.last_maintenance = Some(date(2024, 11, 12));

    let mut gps = Equipment::new(id(5), EquipmentType::GpsUnit, "FleetTrack Systems");
    gps.status = EquipmentStatus::OutOfService;

    vec![truck, loader, excavator, roller, gps]
}

/// Three validation rules with structured condition documents
#[must_use]
pub fn validation_rules() -> Vec<ValidationRule> {
    let id = |n: u128| crate::types::RuleId::from_uuid(Uuid::from_u128(0x4000 + n));
    let created = timestamp(2024, 9, 1, 12, 0);

    let capacity_conditions: ConditionValue = [
        ("field".to_string(), ConditionValue::String("load_volume".to_string())),
        ("operator".to_string(), ConditionValue::String("lte".to_string())),
        ("value".to_string(), ConditionValue::Number(40.0)),
    ]
    .into_iter()
    .collect();

    let photo_conditions: ConditionValue = [
        ("field".to_string(), ConditionValue::String("load_photo".to_string())),
        ("operator".to_string(), ConditionValue::String("present".to_string())),
        ("value".to_string(), ConditionValue::Null),
    ]
    .into_iter()
    .collect();

    let gps_conditions: ConditionValue = [
        (
            "all".to_string(),
            ConditionValue::Array(vec![
                [
                    ("field".to_string(), ConditionValue::String("location.lat".to_string())),
                    ("operator".to_string(), ConditionValue::String("within".to_string())),
                    ("value".to_string(), ConditionValue::Number(0.5)),
                ]
                .into_iter()
                .collect(),
                [
                    ("field".to_string(), ConditionValue::String("gps_fix".to_string())),
                    ("operator".to_string(), ConditionValue::String("eq".to_string())),
                    ("value".to_string(), ConditionValue::Bool(true)),
                ]
                .into_iter()
                .collect(),
            ]),
        ),
    ]
    .into_iter()
    .collect();

    vec![
        ValidationRule {
            id: id(1),
            name: "Load volume within truck capacity".to_string(),
            description: "Reject load calls whose reported volume exceeds 40 cubic yards".to_string(),
            is_active: true,
            conditions: capacity_conditions,
            created_at: created,
            updated_at: created,
        },
        ValidationRule {
            id: id(2),
            name: "Load photo required".to_string(),
            description: "Every ticket must carry a load photo before verification".to_string(),
            is_active: true,
            conditions: photo_conditions,
            created_at: created,
            updated_at: created,
        },
        ValidationRule {
            id: id(3),
            name: "GPS fix near disposal site".to_string(),
            description: "Disposal verification must carry a GPS fix within half a mile of the site".to_string(),
            is_active: false,
            conditions: gps_conditions,
            created_at: created,
            updated_at: created,
        },
    ]
}
