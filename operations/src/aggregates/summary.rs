//! Reducer for AI project summaries.
//!
//! Summaries are produced by an external service, so each project's
//! summary is tracked as a [`TaskState`]: `Pending` while the request is
//! in flight, then `Succeeded` with the text or `Failed` with the reason.
//! The projection never stores a half-finished summary.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use debrisflow_core::{effect::Effect, reducer::Reducer, task::TaskState, SmallVec};
use debrisflow_summarizer::{SummarizeRequest, SummarizerClient, SummarizerError};

use crate::types::ProjectId;

/// Capability to produce a project summary
///
/// [`SummarizerClient`] is the production implementation; tests swap in a
/// canned one.
pub trait Summarize: Send + Sync {
    /// Produce a summary for the given free-text inputs
    fn summarize(
        &self,
        request: SummarizeRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizerError>> + Send>>;
}

impl Summarize for SummarizerClient {
    fn summarize(
        &self,
        request: SummarizeRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizerError>> + Send>> {
        let client = self.clone();
        Box::pin(async move {
            let response = client.summarize(request).await?;
            Ok(response.summary)
        })
    }
}

/// State of the summary aggregate: one task per project
#[derive(Clone, Debug, Default)]
pub struct SummaryState {
    /// Summary tasks indexed by project
    pub summaries: HashMap<ProjectId, TaskState<String>>,
    /// Last validation error (if any)
    pub last_error: Option<String>,
}

impl SummaryState {
    /// Creates an empty summary state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The summary task for a project; `Idle` if never requested
    #[must_use]
    pub fn task(&self, project_id: &ProjectId) -> TaskState<&str> {
        match self.summaries.get(project_id) {
            None => TaskState::Idle,
            Some(TaskState::Idle) => TaskState::Idle,
            Some(TaskState::Pending) => TaskState::Pending,
            Some(TaskState::Succeeded(text)) => TaskState::Succeeded(text.as_str()),
            Some(TaskState::Failed(reason)) => TaskState::Failed(reason.clone()),
        }
    }
}

/// Actions on the summary aggregate: commands first, then events
#[derive(Clone, Debug)]
pub enum SummaryAction {
    // ========== Commands ==========
    /// Ask the external service to summarize one project
    RequestSummary {
        /// Target project
        project_id: ProjectId,
        /// Current project details, free text
        project_details: String,
        /// Recent changes worth highlighting, free text
        recent_changes: String,
    },

    // ========== Events ==========
    /// The service produced a summary
    SummaryReceived {
        /// Target project
        project_id: ProjectId,
        /// The generated text
        summary: String,
    },
    /// The request failed
    SummaryFailed {
        /// Target project
        project_id: ProjectId,
        /// Failure description
        reason: String,
    },
    /// A command failed validation
    ValidationFailed {
        /// What went wrong
        error: String,
    },
}

/// Environment dependencies for the summary reducer
#[derive(Clone)]
pub struct SummaryEnvironment {
    /// Summary producer
    pub summarizer: Arc<dyn Summarize>,
}

impl SummaryEnvironment {
    /// Creates a new `SummaryEnvironment`
    #[must_use]
    pub fn new(summarizer: Arc<dyn Summarize>) -> Self {
        Self { summarizer }
    }
}

/// Reducer for the summary aggregate
#[derive(Clone, Debug)]
pub struct SummaryReducer;

impl SummaryReducer {
    /// Creates a new `SummaryReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an event to state
    fn apply_event(state: &mut SummaryState, action: &SummaryAction) {
        match action {
            SummaryAction::SummaryReceived {
                project_id,
                summary,
            } => {
                state
                    .summaries
                    .insert(*project_id, TaskState::Succeeded(summary.clone()));
                state.last_error = None;
            }
            SummaryAction::SummaryFailed { project_id, reason } => {
                state
                    .summaries
                    .insert(*project_id, TaskState::Failed(reason.clone()));
            }
            SummaryAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            }
            // Commands are not applied to state
            SummaryAction::RequestSummary { .. } => {}
        }
    }
}

impl Default for SummaryReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for SummaryReducer {
    type State = SummaryState;
    type Action = SummaryAction;
    type Environment = SummaryEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            SummaryAction::RequestSummary {
                project_id,
                project_details,
                recent_changes,
            } => {
                if state.summaries.get(&project_id).is_some_and(TaskState::is_pending) {
                    Self::apply_event(
                        state,
                        &SummaryAction::ValidationFailed {
                            error: format!("Summary for project {project_id} is already in flight"),
                        },
                    );
                    return SmallVec::new();
                }

                state.summaries.insert(project_id, TaskState::Pending);
                state.last_error = None;

                let summarizer = Arc::clone(&env.summarizer);
                smallvec::smallvec![Effect::future(async move {
                    let request = SummarizeRequest::new(project_details, recent_changes);
                    match summarizer.summarize(request).await {
                        Ok(summary) => Some(SummaryAction::SummaryReceived {
                            project_id,
                            summary,
                        }),
                        Err(error) => Some(SummaryAction::SummaryFailed {
                            project_id,
                            reason: error.to_string(),
                        }),
                    }
                })]
            }

            // ========== Events ==========
            SummaryAction::SummaryReceived { .. }
            | SummaryAction::SummaryFailed { .. }
            | SummaryAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
                SmallVec::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use debrisflow_testing::{ReducerTest, assertions};

    /// Summarizer that replies instantly with canned text
    struct CannedSummarizer {
        reply: Result<String, String>,
    }

    impl Summarize for CannedSummarizer {
        fn summarize(
            &self,
            _request: SummarizeRequest,
        ) -> Pin<Box<dyn Future<Output = Result<String, SummarizerError>> + Send>> {
            let reply = self
                .reply
                .clone()
                .map_err(SummarizerError::RequestFailed);
            Box::pin(async move { reply })
        }
    }

    fn env_with_reply(reply: Result<String, String>) -> SummaryEnvironment {
        SummaryEnvironment::new(Arc::new(CannedSummarizer { reply }))
    }

    #[test]
    fn request_marks_the_project_pending_and_spawns_a_future() {
        let project_id = ProjectId::new();

        ReducerTest::new(SummaryReducer::new())
            .with_env(env_with_reply(Ok("All quiet".to_string())))
            .given_state(SummaryState::new())
            .when_action(SummaryAction::RequestSummary {
                project_id,
                project_details: "Active, 12 tickets".to_string(),
                recent_changes: "3 tickets resolved today".to_string(),
            })
            .then_state(move |state| {
                assert!(state.task(&project_id).is_pending());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn duplicate_request_while_pending_is_rejected() {
        let project_id = ProjectId::new();
        let request = SummaryAction::RequestSummary {
            project_id,
            project_details: "Active".to_string(),
            recent_changes: "None".to_string(),
        };

        ReducerTest::new(SummaryReducer::new())
            .with_env(env_with_reply(Ok("ok".to_string())))
            .given_state(SummaryState::new())
            .when_action(request.clone())
            .when_action(request)
            .then_state(|state| {
                assert!(state.last_error.as_deref().unwrap().contains("in flight"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn successful_round_trip_settles_the_task() {
        let project_id = ProjectId::new();
        let env = env_with_reply(Ok("Cleanup 65% complete; 3 open errors".to_string()));
        let reducer = SummaryReducer::new();
        let mut state = SummaryState::new();

        let mut effects = reducer.reduce(
            &mut state,
            SummaryAction::RequestSummary {
                project_id,
                project_details: "Active".to_string(),
                recent_changes: "None".to_string(),
            },
            &env,
        );
        let Some(Effect::Future(future)) = effects.pop() else {
            panic!("expected a future effect");
        };
        let produced = future.await.unwrap();
        reducer.reduce(&mut state, produced, &env);

        match state.task(&project_id) {
            TaskState::Succeeded(text) => assert!(text.contains("65%")),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_is_recorded_with_its_reason() {
        let project_id = ProjectId::new();
        let env = env_with_reply(Err("connection reset".to_string()));
        let reducer = SummaryReducer::new();
        let mut state = SummaryState::new();

        let mut effects = reducer.reduce(
            &mut state,
            SummaryAction::RequestSummary {
                project_id,
                project_details: "Active".to_string(),
                recent_changes: "None".to_string(),
            },
            &env,
        );
        let Some(Effect::Future(future)) = effects.pop() else {
            panic!("expected a future effect");
        };
        let produced = future.await.unwrap();
        reducer.reduce(&mut state, produced, &env);

        let task = state.task(&project_id);
        assert!(task.is_settled());
        assert!(task.error().unwrap().contains("connection reset"));
    }

    #[test]
    fn unknown_projects_read_as_idle() {
        let state = SummaryState::new();
        assert!(matches!(state.task(&ProjectId::new()), TaskState::Idle));
    }
}
