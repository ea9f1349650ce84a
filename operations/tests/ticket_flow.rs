//! End-to-end flow: open a ticket, walk the lifecycle through the store,
//! capture a location, and close it out.

#![allow(clippy::unwrap_used)]

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use debrisflow_core::environment::SystemClock;
use debrisflow_operations::aggregates::summary::{
    Summarize, SummaryAction, SummaryEnvironment, SummaryReducer, SummaryState,
};
use debrisflow_operations::aggregates::ticket::{
    TicketAction, TicketEnvironment, TicketReducer, TicketState,
};
use debrisflow_operations::geolocation::FixedGeoLocator;
use debrisflow_operations::{
    EventStatus, EventType, GeoPoint, ProjectId, TicketId, TicketStatus, TruckId,
};
use debrisflow_runtime::Store;
use debrisflow_summarizer::{SummarizeRequest, SummarizerError};

fn ticket_store() -> Store<TicketState, TicketAction, TicketEnvironment, TicketReducer> {
    let position = GeoPoint::new(27.95, -82.46).unwrap();
    let env = TicketEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(FixedGeoLocator::new(position)),
    );
    Store::new(TicketState::new(), TicketReducer::new(), env)
}

async fn record(
    store: &Store<TicketState, TicketAction, TicketEnvironment, TicketReducer>,
    ticket_id: TicketId,
    event_type: EventType,
    status: EventStatus,
) {
    store
        .send(TicketAction::RecordEvent {
            ticket_id,
            event_type,
            status,
            notes: None,
            recorded_by: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn full_lifecycle_reaches_one_hundred_percent() {
    let store = ticket_store();
    let ticket_id = TicketId::new();

    store
        .send(TicketAction::OpenTicket {
            id: ticket_id,
            project_id: ProjectId::new(),
            truck_id: TruckId::new("TRUCK-A15"),
        })
        .await
        .unwrap();
    store
        .send(TicketAction::ChangeStatus {
            ticket_id,
            status: TicketStatus::InProgress,
        })
        .await
        .unwrap();

    // One stage recorded at creation, so progress starts above zero
    let initial = store
        .state(|s| s.get(&ticket_id).unwrap().progress_percent())
        .await;
    assert_eq!(initial, 11);

    for event_type in EventType::ALL.iter().skip(1) {
        record(&store, ticket_id, *event_type, EventStatus::Completed).await;
    }

    let progress = store
        .state(|s| s.get(&ticket_id).unwrap().progress_percent())
        .await;
    assert_eq!(progress, 100);

    store
        .send(TicketAction::ChangeStatus {
            ticket_id,
            status: TicketStatus::Resolved,
        })
        .await
        .unwrap();
    let (status, issues) = store
        .state(|s| {
            let ticket = s.get(&ticket_id).unwrap();
            (ticket.status, ticket.consistency_issues())
        })
        .await;
    assert_eq!(status, TicketStatus::Resolved);
    assert!(issues.is_empty());

    store.shutdown(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn location_capture_flows_back_through_the_store() {
    let store = ticket_store();
    let ticket_id = TicketId::new();

    store
        .send(TicketAction::OpenTicket {
            id: ticket_id,
            project_id: ProjectId::new(),
            truck_id: TruckId::new("TRUCK-B07"),
        })
        .await
        .unwrap();
    store
        .send(TicketAction::CaptureLocation { ticket_id })
        .await
        .unwrap();

    // The geolocator runs on a spawned task
    tokio::time::sleep(Duration::from_millis(50)).await;

    let location = store
        .state(|s| s.get(&ticket_id).unwrap().location)
        .await
        .unwrap();
    assert!((location.lat - 27.95).abs() < f64::EPSILON);

    store.shutdown(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn closing_with_a_recorded_error_is_blocked_until_rerecorded() {
    let store = ticket_store();
    let ticket_id = TicketId::new();

    store
        .send(TicketAction::OpenTicket {
            id: ticket_id,
            project_id: ProjectId::new(),
            truck_id: TruckId::new("TRUCK-C22"),
        })
        .await
        .unwrap();
    record(&store, ticket_id, EventType::LoadCall, EventStatus::Completed).await;
    record(&store, ticket_id, EventType::ArrivalAtDisposalSite, EventStatus::Error).await;

    store
        .send(TicketAction::ChangeStatus {
            ticket_id,
            status: TicketStatus::Closed,
        })
        .await
        .unwrap();
    let (status, error) = store
        .state(|s| (s.get(&ticket_id).unwrap().status, s.last_error.clone()))
        .await;
    assert_ne!(status, TicketStatus::Closed);
    assert!(error.unwrap().contains("recorded error"));

    // Re-record the failed stage, then closing succeeds
    record(&store, ticket_id, EventType::ArrivalAtDisposalSite, EventStatus::Completed).await;
    store
        .send(TicketAction::ChangeStatus {
            ticket_id,
            status: TicketStatus::Closed,
        })
        .await
        .unwrap();
    let status = store.state(|s| s.get(&ticket_id).unwrap().status).await;
    assert_eq!(status, TicketStatus::Closed);
}

/// Summarizer that waits briefly before answering, so the pending state is
/// observable
struct SlowSummarizer;

impl Summarize for SlowSummarizer {
    fn summarize(
        &self,
        request: SummarizeRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizerError>> + Send>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok(format!("Summary of: {}", request.project_details))
        })
    }
}

#[tokio::test]
async fn summary_task_moves_from_pending_to_succeeded() {
    let env = SummaryEnvironment::new(Arc::new(SlowSummarizer));
    let store = Store::new(SummaryState::new(), SummaryReducer::new(), env);
    let project_id = ProjectId::new();

    store
        .send(SummaryAction::RequestSummary {
            project_id,
            project_details: "Active, 12 tickets".to_string(),
            recent_changes: "3 resolved".to_string(),
        })
        .await
        .unwrap();

    let pending = store.state(|s| s.task(&project_id).is_pending()).await;
    assert!(pending);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let summary = store
        .state(|s| s.task(&project_id).value().map(|text| (*text).to_string()))
        .await
        .unwrap();
    assert!(summary.contains("12 tickets"));

    store.shutdown(Duration::from_secs(1)).await.unwrap();
}
