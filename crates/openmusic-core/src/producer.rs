use crate::error::ProducerError;
use async_trait::async_trait;

/// Publishes messages to a named queue for an external consumer.
///
/// Delivery is fire-and-forget: no acknowledgment or retry is performed.
#[async_trait]
pub trait Producer: Send + Sync + 'static {
    async fn send_message(&self, queue: &str, message: String) -> Result<(), ProducerError>;
}
