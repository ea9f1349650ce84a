//! CLI demo driving a ticket through the debris-removal lifecycle.
//!
//! Seeds the in-memory repositories, opens a ticket, records lifecycle
//! stages while printing the derived progress, captures a location, and
//! requests a project summary from a stubbed summarizer.

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
use debrisflow_operations::fixtures;
use debrisflow_operations::geolocation::FixedGeoLocator;
use debrisflow_operations::projections::{
    Projection, ProjectDashboardProjection, project_dashboard,
};
use debrisflow_operations::{
    EventStatus, EventType, GeoPoint, InMemoryRepository, Repository, TicketId, TicketStatus,
    TruckId,
};
use debrisflow_runtime::Store;
use debrisflow_summarizer::{SummarizeRequest, SummarizerError};

/// Offline summarizer for the demo
struct StubSummarizer;

impl Summarize for StubSummarizer {
    fn summarize(
        &self,
        request: SummarizeRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizerError>> + Send>> {
        Box::pin(async move {
            Ok(format!(
                "Summary: {} | Recent: {}",
                request.project_details, request.recent_changes
            ))
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== DebrisFlow Demo ===\n");

    // Seed repositories
    let projects = InMemoryRepository::seeded(fixtures::projects()).await;
    let equipment = InMemoryRepository::seeded(fixtures::equipment()).await;
    let rules = InMemoryRepository::seeded(fixtures::validation_rules()).await;
    println!(
        "Seeded {} projects, {} equipment, {} rules",
        projects.list().await.len(),
        equipment.list().await.len(),
        rules.list().await.len(),
    );

    // Ticket store
    let position = GeoPoint::new(27.95, -82.46)?;
    let env = TicketEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(FixedGeoLocator::new(position)),
    );
    let store = Store::new(TicketState::new(), TicketReducer::new(), env);

    let project_id = fixtures::project_gulf_coast();
    let ticket_id = TicketId::new();

    println!("\nOpening ticket for TRUCK-A15...");
    store
        .send(TicketAction::OpenTicket {
            id: ticket_id,
            project_id,
            truck_id: TruckId::new("TRUCK-A15"),
        })
        .await?;
    store
        .send(TicketAction::ChangeStatus {
            ticket_id,
            status: TicketStatus::InProgress,
        })
        .await?;

    // Walk the lifecycle, printing derived progress as stages complete
    for event_type in [
        EventType::LoadCall,
        EventType::ArrivalAtLoadSite,
        EventType::LoadComplete,
        EventType::DepartureFromLoadSite,
        EventType::ArrivalAtDisposalSite,
    ] {
        store
            .send(TicketAction::RecordEvent {
                ticket_id,
                event_type,
                status: EventStatus::Completed,
                notes: None,
                recorded_by: None,
            })
            .await?;

        let progress = store
            .state(|s| s.get(&ticket_id).map(|t| t.progress_percent()))
            .await;
        if let Some(progress) = progress {
            println!("  {event_type}: ticket at {progress}%");
        }
    }

    println!("\nCapturing location...");
    store.send(TicketAction::CaptureLocation { ticket_id }).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let location = store.state(|s| s.get(&ticket_id).and_then(|t| t.location)).await;
    if let Some(location) = location {
        println!("  Position: {:.4}, {:.4}", location.lat, location.lon);
    }

    // Feed the dashboard projection and print header totals
    let mut projection = ProjectDashboardProjection::new();
    let events = store
        .state(|s| {
            s.tickets
                .values()
                .map(|t| TicketAction::TicketOpened {
                    id: t.id,
                    project_id: t.project_id,
                    truck_id: t.truck_id.clone(),
                    opened_at: t.created_at,
                })
                .collect::<Vec<_>>()
        })
        .await;
    for event in &events {
        projection.handle_event(event)?;
    }
    let project_list = projects.list().await;
    let stats = project_dashboard::dashboard_stats(&project_list, &projection);
    println!(
        "\nDashboard: {} projects ({} active), {} tickets seen, {} transactions on record",
        stats.total_projects, stats.active_projects, stats.total_tickets, stats.total_transactions,
    );

    // Project summary via the stubbed service
    let summary_env = SummaryEnvironment::new(Arc::new(StubSummarizer));
    let summary_store = Store::new(SummaryState::new(), SummaryReducer::new(), summary_env);
    summary_store
        .send(SummaryAction::RequestSummary {
            project_id,
            project_details: "Hurricane Milton Response: active, 65% complete".to_string(),
            recent_changes: "1 ticket moved through load verification today".to_string(),
        })
        .await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let summary = summary_store
        .state(|s| s.task(&project_id).value().map(|text| (*text).to_string()))
        .await;
    if let Some(summary) = summary {
        println!("\n{summary}");
    }

    store.shutdown(Duration::from_secs(1)).await?;
    summary_store.shutdown(Duration::from_secs(1)).await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
