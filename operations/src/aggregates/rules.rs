//! Reducer for the validation-rule aggregate.
//!
//! Rules carry user-authored condition documents entered as JSON text.
//! The text is parsed into a [`ConditionValue`] during validation, so a
//! malformed document is rejected before any rule state changes.

use std::sync::Arc;

use debrisflow_core::{
    DateTime, Utc,
    effect::Effect,
    environment::Clock,
    reducer::Reducer,
    SmallVec,
};

use crate::conditions::ConditionValue;
use crate::types::{RuleId, ValidationRule};

/// Rule names are short labels
const NAME_RANGE: std::ops::RangeInclusive<usize> = 3..=100;
/// Descriptions must say something but stay list-friendly
const DESCRIPTION_RANGE: std::ops::RangeInclusive<usize> = 5..=255;

/// State of the rule aggregate
#[derive(Clone, Debug, Default)]
pub struct RuleState {
    /// All rules indexed by id
    pub rules: std::collections::HashMap<RuleId, ValidationRule>,
    /// Last validation error (if any)
    pub last_error: Option<String>,
}

impl RuleState {
    /// Creates an empty rule state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a rule by id
    #[must_use]
    pub fn get(&self, id: &RuleId) -> Option<&ValidationRule> {
        self.rules.get(id)
    }

    /// Number of rules held
    #[must_use]
    pub fn count(&self) -> usize {
        self.rules.len()
    }

    /// Number of rules participating in evaluation
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.rules.values().filter(|r| r.is_active).count()
    }
}

/// Actions on the rule aggregate: commands first, then events
#[derive(Clone, Debug)]
pub enum RuleAction {
    // ========== Commands ==========
    /// Create a rule from user-entered fields
    CreateRule {
        /// Rule id chosen by the caller
        id: RuleId,
        /// Short display name
        name: String,
        /// What the rule checks
        description: String,
        /// Condition document as JSON text
        conditions: String,
    },
    /// Replace a rule's fields
    UpdateRule {
        /// Target rule
        id: RuleId,
        /// New display name
        name: String,
        /// New description
        description: String,
        /// New condition document as JSON text
        conditions: String,
    },
    /// Toggle whether a rule participates in evaluation
    SetRuleActive {
        /// Target rule
        id: RuleId,
        /// Desired activation
        active: bool,
    },
    /// Remove a rule
    DeleteRule {
        /// Target rule
        id: RuleId,
    },

    // ========== Events ==========
    /// A rule was created
    RuleCreated {
        /// New rule id
        id: RuleId,
        /// Display name
        name: String,
        /// Description
        description: String,
        /// Parsed condition document
        conditions: ConditionValue,
        /// Creation timestamp
        created_at: DateTime<Utc>,
    },
    /// A rule's fields were replaced
    RuleUpdated {
        /// Target rule
        id: RuleId,
        /// New display name
        name: String,
        /// New description
        description: String,
        /// New parsed condition document
        conditions: ConditionValue,
        /// Update timestamp
        updated_at: DateTime<Utc>,
    },
    /// A rule's activation changed
    RuleActivationChanged {
        /// Target rule
        id: RuleId,
        /// New activation
        active: bool,
        /// Change timestamp
        changed_at: DateTime<Utc>,
    },
    /// A rule was removed
    RuleDeleted {
        /// Removed rule
        id: RuleId,
    },
    /// A command failed validation
    ValidationFailed {
        /// What went wrong
        error: String,
    },
}

/// Environment dependencies for the rule reducer
#[derive(Clone)]
pub struct RuleEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
}

impl RuleEnvironment {
    /// Creates a new `RuleEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// Reducer for the rule aggregate
#[derive(Clone, Debug)]
pub struct RuleReducer;

impl RuleReducer {
    /// Creates a new `RuleReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates name, description, and condition text shared by create
    /// and update; returns the parsed conditions on success
    fn validate_fields(
        name: &str,
        description: &str,
        conditions: &str,
    ) -> Result<ConditionValue, String> {
        let name_len = name.trim().len();
        if !NAME_RANGE.contains(&name_len) {
            return Err(format!(
                "Rule name must be {} to {} characters",
                NAME_RANGE.start(),
                NAME_RANGE.end()
            ));
        }

        let description_len = description.trim().len();
        if !DESCRIPTION_RANGE.contains(&description_len) {
            return Err(format!(
                "Rule description must be {} to {} characters",
                DESCRIPTION_RANGE.start(),
                DESCRIPTION_RANGE.end()
            ));
        }

        ConditionValue::parse(conditions).map_err(|e| e.to_string())
    }

    /// Applies an event to state
    fn apply_event(state: &mut RuleState, action: &RuleAction) {
        match action {
            RuleAction::RuleCreated {
                id,
                name,
                description,
                conditions,
                created_at,
            } => {
                state.rules.insert(
                    *id,
                    ValidationRule {
                        id: *id,
                        name: name.clone(),
                        description: description.clone(),
                        is_active: true,
                        conditions: conditions.clone(),
                        created_at: *created_at,
                        updated_at: *created_at,
                    },
                );
                state.last_error = None;
            }
            RuleAction::RuleUpdated {
                id,
                name,
                description,
                conditions,
                updated_at,
            } => {
                if let Some(rule) = state.rules.get_mut(id) {
                    rule.name = name.clone();
                    rule.description = description.clone();
                    rule.conditions = conditions.clone();
                    rule.updated_at = *updated_at;
                }
                state.last_error = None;
            }
            RuleAction::RuleActivationChanged {
                id,
                active,
                changed_at,
            } => {
                if let Some(rule) = state.rules.get_mut(id) {
                    rule.is_active = *active;
                    rule.updated_at = *changed_at;
                }
                state.last_error = None;
            }
            RuleAction::RuleDeleted { id } => {
                state.rules.remove(id);
                state.last_error = None;
            }
            RuleAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            }
            // Commands are not applied to state
            RuleAction::CreateRule { .. }
            | RuleAction::UpdateRule { .. }
            | RuleAction::SetRuleActive { .. }
            | RuleAction::DeleteRule { .. } => {}
        }
    }
}

impl Default for RuleReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for RuleReducer {
    type State = RuleState;
    type Action = RuleAction;
    type Environment = RuleEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            RuleAction::CreateRule {
                id,
                name,
                description,
                conditions,
            } => {
                if state.rules.contains_key(&id) {
                    Self::apply_event(
                        state,
                        &RuleAction::ValidationFailed {
                            error: format!("Rule {id} already exists"),
                        },
                    );
                    return SmallVec::new();
                }

                let parsed = match Self::validate_fields(&name, &description, &conditions) {
                    Ok(parsed) => parsed,
                    Err(error) => {
                        Self::apply_event(state, &RuleAction::ValidationFailed { error });
                        return SmallVec::new();
                    }
                };

                let event = RuleAction::RuleCreated {
                    id,
                    name,
                    description,
                    conditions: parsed,
                    created_at: env.clock.now(),
                };
                Self::apply_event(state, &event);

                SmallVec::new()
            }

            RuleAction::UpdateRule {
                id,
                name,
                description,
                conditions,
            } => {
                if !state.rules.contains_key(&id) {
                    Self::apply_event(
                        state,
                        &RuleAction::ValidationFailed {
                            error: format!("Rule {id} not found"),
                        },
                    );
                    return SmallVec::new();
                }

                let parsed = match Self::validate_fields(&name, &description, &conditions) {
                    Ok(parsed) => parsed,
                    Err(error) => {
                        Self::apply_event(state, &RuleAction::ValidationFailed { error });
                        return SmallVec::new();
                    }
                };

                let event = RuleAction::RuleUpdated {
                    id,
                    name,
                    description,
                    conditions: parsed,
                    updated_at: env.clock.now(),
                };
                Self::apply_event(state, &event);

                SmallVec::new()
            }

            RuleAction::SetRuleActive { id, active } => {
                if !state.rules.contains_key(&id) {
                    Self::apply_event(
                        state,
                        &RuleAction::ValidationFailed {
                            error: format!("Rule {id} not found"),
                        },
                    );
                    return SmallVec::new();
                }

                let event = RuleAction::RuleActivationChanged {
                    id,
                    active,
                    changed_at: env.clock.now(),
                };
                Self::apply_event(state, &event);

                SmallVec::new()
            }

            RuleAction::DeleteRule { id } => {
                if !state.rules.contains_key(&id) {
                    Self::apply_event(
                        state,
                        &RuleAction::ValidationFailed {
                            error: format!("Rule {id} not found"),
                        },
                    );
                    return SmallVec::new();
                }

                let event = RuleAction::RuleDeleted { id };
                Self::apply_event(state, &event);

                SmallVec::new()
            }

            // ========== Events ==========
            RuleAction::RuleCreated { .. }
            | RuleAction::RuleUpdated { .. }
            | RuleAction::RuleActivationChanged { .. }
            | RuleAction::RuleDeleted { .. }
            | RuleAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
                SmallVec::new()
            }
        }
    }
}
