//! Repository interface over entity collections.
//!
//! The original dashboard kept its projects, tickets, equipment, and rules
//! in global in-memory arrays acting as a pseudo-database. Here that
//! becomes an explicit capability set - `list`, `get_by_id`, `upsert`,
//! `delete` - behind a trait, with an in-memory implementation for tests
//! and development; a real persistence implementation slots in behind the
//! same interface.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::{Equipment, EquipmentId, Project, ProjectId, RuleId, Ticket, TicketId, ValidationRule};

/// Errors produced by repository operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No entity with the given id exists
    #[error("No entity with id {0}")]
    NotFound(String),
}

/// An entity storable in a repository
pub trait Entity: Clone + Send + Sync {
    /// Identifier type
    type Id: Clone + Eq + Hash + Display + Send + Sync;

    /// This entity's identifier
    fn id(&self) -> Self::Id;
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> ProjectId {
        self.id
    }
}

impl Entity for Ticket {
    type Id = TicketId;

    fn id(&self) -> TicketId {
        self.id
    }
}

impl Entity for Equipment {
    type Id = EquipmentId;

    fn id(&self) -> EquipmentId {
        self.id
    }
}

impl Entity for ValidationRule {
    type Id = RuleId;

    fn id(&self) -> RuleId {
        self.id
    }
}

/// Capability set over one entity collection
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All stored entities, in no particular order
    async fn list(&self) -> Vec<T>;

    /// One entity by id, if present
    async fn get_by_id(&self, id: &T::Id) -> Option<T>;

    /// Insert or replace an entity keyed by its id
    async fn upsert(&self, entity: T);

    /// Remove an entity by id
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if nothing was stored under
    /// `id`
    async fn delete(&self, id: &T::Id) -> Result<(), RepositoryError>;
}

/// In-memory repository backed by a `HashMap`
pub struct InMemoryRepository<T: Entity> {
    entries: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    /// Creates an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a repository pre-populated with `entities`
    pub async fn seeded(entities: impl IntoIterator<Item = T>) -> Self {
        let repository = Self::new();
        for entity in entities {
            repository.upsert(entity).await;
        }
        repository
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn list(&self) -> Vec<T> {
        self.entries.read().await.values().cloned().collect()
    }

    async fn get_by_id(&self, id: &T::Id) -> Option<T> {
        self.entries.read().await.get(id).cloned()
    }

    async fn upsert(&self, entity: T) {
        self.entries.write().await.insert(entity.id(), entity);
    }

    async fn delete(&self, id: &T::Id) -> Result<(), RepositoryError> {
        match self.entries.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(id.to_string())),
        }
    }
}
