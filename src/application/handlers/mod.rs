//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! Commands follow one shape: load the aggregate, apply the domain
//! transition, persist with a compare-and-set write, then publish the
//! resulting event.

pub mod legacy;
pub mod wakeroom;

use serde::Serialize;

use crate::domain::foundation::{DomainEvent, EventEnvelope, UserId};
use crate::ports::EventPublisher;

/// Publishes an event for a transition that is already committed.
///
/// Failures are logged and swallowed: the stored state is authoritative
/// and the caller's operation has succeeded.
pub(crate) async fn publish_committed<E>(publisher: &dyn EventPublisher, event: &E, actor: &UserId)
where
    E: DomainEvent + Serialize,
{
    let envelope = match EventEnvelope::from_event(event) {
        Ok(envelope) => envelope.with_user_id(actor.as_str()),
        Err(e) => {
            tracing::error!(
                error = %e,
                event_type = event.event_type(),
                "Failed to serialize domain event"
            );
            return;
        }
    };

    if let Err(e) = publisher.publish(envelope).await {
        tracing::warn!(
            error = %e,
            event_type = event.event_type(),
            aggregate_id = %event.aggregate_id(),
            "Failed to publish domain event"
        );
    }
}
