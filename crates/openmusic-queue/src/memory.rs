use async_trait::async_trait;
use openmusic_core::{Producer, ProducerError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Records published messages in memory, in publish order.
///
/// Stands in for a broker when running without Redis and lets tests
/// inspect what would have been sent.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProducer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl InMemoryProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(queue, message)` pairs published so far.
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    /// Messages published to `queue`.
    pub fn messages_for(&self, queue: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(q, _)| q == queue)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl Producer for InMemoryProducer {
    async fn send_message(&self, queue: &str, message: String) -> Result<(), ProducerError> {
        debug!(queue, "Recorded message");
        self.sent.lock().push((queue.to_string(), message));
        Ok(())
    }
}
