//! In-memory event bus.
//!
//! Records published envelopes in order and logs each one. Used as the
//! process-local publisher and as the assertion surface in tests.

use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus.
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
/// assert!(bus.has_event("license.reserved.v1"));
/// ```
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test Helpers ===

    /// All published events, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.read().clone()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.read()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.published
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn event_count(&self) -> usize {
        self.read().len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.read().iter().any(|e| e.event_type == event_type)
    }

    // A poisoned log still holds every event pushed before the panic.
    fn read(&self) -> RwLockReadGuard<'_, Vec<EventEnvelope>> {
        self.published
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::debug!(
            event_id = %event.event_id.as_str(),
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            "Domain event published"
        );

        self.published
            .write()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "Event log lock poisoned"))?
            .push(event);

        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
