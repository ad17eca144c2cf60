//! In-process message bus provider
//!
//! Message bus implementation using tokio broadcast channels, one channel
//! per topic, for in-process message distribution.
//!
//! ## Features
//!
//! - Multiple subscribers per topic
//! - Configurable channel capacity
//! - No persistence (messages are ephemeral)
//!
//! ## Capacity
//!
//! When a topic channel is full, the oldest messages are dropped and slow
//! subscribers skip ahead.
//!
//! ```toml
//! [providers.messaging.instances.default]
//! capacity = 256
//! topic_prefix = "orders."
//! ```

use crate::constants::{
    MESSAGING_DEFAULT_CAPACITY, MESSAGING_IN_PROCESS_NAME, MESSAGING_MAX_CAPACITY,
    MESSAGING_SECTION,
};
use async_trait::async_trait;
use dashmap::DashMap;
use pab_domain::error::{Error, Result};
use pab_domain::ports::providers::MessagePublisher;
use pab_domain::{InstanceSettings, ProviderInstances, ProviderKind, ProviderMarker};
use pab_infrastructure::di::registry::{PROVIDER_MODULES, ProviderEntry, register_section};
use pab_infrastructure::di::{InstanceRegistration, ProviderModule, ServiceCollection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

fn default_capacity() -> usize {
    MESSAGING_DEFAULT_CAPACITY
}

/// Settings of one in-process message bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InProcessMessagingSettings {
    /// Buffered messages per topic
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Prepended to every topic published or subscribed through this bus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_prefix: Option<String>,
}

impl Default for InProcessMessagingSettings {
    fn default() -> Self {
        Self {
            capacity: MESSAGING_DEFAULT_CAPACITY,
            topic_prefix: None,
        }
    }
}

impl InstanceSettings for InProcessMessagingSettings {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than zero".to_string());
        }
        if self.capacity > MESSAGING_MAX_CAPACITY {
            return Err(format!("capacity cannot exceed {MESSAGING_MAX_CAPACITY}"));
        }
        Ok(())
    }
}

/// A message delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Full topic, including the bus prefix
    pub topic: String,
    /// Raw payload
    pub payload: Arc<[u8]>,
}

/// Receiving side of a topic subscription
pub struct Subscription {
    topic: String,
    receiver: broadcast::Receiver<Message>,
}

impl Subscription {
    /// Full topic this subscription listens to
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next message
    ///
    /// Returns `None` once the bus has been dropped. Messages overwritten
    /// before they were read are skipped with a warning.
    pub async fn recv(&mut self) -> Option<Message> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(topic = %self.topic, skipped = n, "Subscription lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next message if one is already buffered
    pub fn try_recv(&mut self) -> Option<Message> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Some(message),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!(topic = %self.topic, skipped = n, "Subscription lagged behind");
                }
                Err(_) => return None,
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

/// Message bus using one tokio broadcast channel per topic
pub struct InProcessMessageBus {
    capacity: usize,
    topic_prefix: Option<String>,
    topics: DashMap<String, broadcast::Sender<Message>>,
}

impl InProcessMessageBus {
    /// Create a bus with the default capacity and no prefix
    pub fn new() -> Self {
        Self::from_settings(&InProcessMessagingSettings::default())
    }

    /// Create a bus from instance settings
    ///
    /// The capacity is clamped into the accepted range.
    pub fn from_settings(settings: &InProcessMessagingSettings) -> Self {
        Self {
            capacity: settings.capacity.clamp(1, MESSAGING_MAX_CAPACITY),
            topic_prefix: settings.topic_prefix.clone(),
            topics: DashMap::new(),
        }
    }

    /// Per-topic channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Subscribe to `topic`
    ///
    /// Only messages published after the call are received.
    pub fn subscribe(&self, topic: &str) -> Result<Subscription> {
        let topic = self.full_topic(topic)?;
        let receiver = self
            .topics
            .entry(topic.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        debug!(topic = %topic, "Created subscription");
        Ok(Subscription { topic, receiver })
    }

    /// Number of live subscriptions to `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.full_topic(topic)
            .ok()
            .and_then(|topic| self.topics.get(&topic).map(|sender| sender.receiver_count()))
            .unwrap_or(0)
    }

    /// Number of topics holding a channel
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn full_topic(&self, topic: &str) -> Result<String> {
        if topic.is_empty() {
            return Err(Error::invalid_argument("Topic cannot be empty"));
        }
        Ok(match &self.topic_prefix {
            Some(prefix) => format!("{prefix}{topic}"),
            None => topic.to_string(),
        })
    }
}

impl Default for InProcessMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InProcessMessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessMessageBus")
            .field("capacity", &self.capacity)
            .field("topic_prefix", &self.topic_prefix)
            .field("topics", &self.topics.len())
            .finish()
    }
}

#[async_trait]
impl MessagePublisher for InProcessMessageBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<usize> {
        let topic = self.full_topic(topic)?;
        let message = Message {
            topic: topic.clone(),
            payload: payload.into(),
        };
        let sent = match self.topics.get(&topic) {
            Some(sender) => sender.send(message).ok(),
            None => None,
        };

        let Some(delivered) = sent else {
            // Every subscription to the topic was dropped; forget its channel
            // unless a new subscriber arrived meanwhile
            if self
                .topics
                .remove_if(&topic, |_, sender| sender.receiver_count() == 0)
                .is_some()
            {
                debug!(topic = %topic, "Removed topic without subscribers");
            }
            debug!(topic = %topic, "Published message but topic has no subscribers");
            return Ok(0);
        };
        debug!(topic = %topic, delivered, "Published message");
        Ok(delivered)
    }

    fn provider_name(&self) -> &str {
        MESSAGING_IN_PROCESS_NAME
    }
}

/// Registers one [`InProcessMessageBus`] per configured instance
///
/// Each instance is available both as `dyn MessagePublisher` and as the
/// concrete bus, which is what subscribers resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessMessagingModule;

impl InProcessMessagingModule {
    /// Marker recorded once the module is registered
    pub const MARKER: ProviderMarker =
        ProviderMarker::new(ProviderKind::Messaging, MESSAGING_IN_PROCESS_NAME);
}

impl ProviderModule for InProcessMessagingModule {
    type Settings = ProviderInstances<InProcessMessagingSettings>;

    fn marker(&self) -> ProviderMarker {
        Self::MARKER
    }

    fn register_instance(
        &self,
        services: &ServiceCollection,
        instance: &InstanceRegistration<'_, InProcessMessagingSettings>,
    ) -> Result<()> {
        let bus = Arc::new(InProcessMessageBus::from_settings(instance.settings));
        instance.add_service(services, bus.clone())?;
        let publisher: Arc<dyn MessagePublisher> = bus;
        instance.add_service(services, publisher)
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

#[linkme::distributed_slice(PROVIDER_MODULES)]
static IN_PROCESS_MESSAGING: ProviderEntry = ProviderEntry {
    marker: InProcessMessagingModule::MARKER,
    section: MESSAGING_SECTION,
    description: "In-process message bus on tokio broadcast channels",
    register: |services, context, config| {
        register_section(&InProcessMessagingModule, MESSAGING_SECTION, services, context, config)
    },
};
