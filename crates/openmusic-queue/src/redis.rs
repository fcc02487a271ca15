use async_trait::async_trait;
use openmusic_core::{Producer, ProducerError};
use redis::AsyncCommands;
use tracing::{debug, instrument, warn};

/// Publishes messages by appending them to a Redis list named after the
/// queue. Consumers pop from the other end (`BLPOP <queue>`).
#[derive(Debug, Clone)]
pub struct RedisProducer {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisProducer {
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self { conn }
    }

    pub async fn connect(url: &str) -> Result<Self, ProducerError> {
        let client =
            redis::Client::open(url).map_err(|e| ProducerError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ProducerError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl Producer for RedisProducer {
    #[instrument(skip(self, message))]
    async fn send_message(&self, queue: &str, message: String) -> Result<(), ProducerError> {
        let mut conn = self.conn.clone();
        match conn.rpush::<_, _, u64>(queue, message).await {
            Ok(depth) => {
                debug!(depth, "Published message");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to publish message");
                Err(ProducerError::Publish(format!("RPUSH {queue}: {e}")))
            }
        }
    }
}
