//! Messaging Provider Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | InProcessMessageBus | In-Process | Tokio broadcast channel per topic |

pub mod in_process;

pub use in_process::{
    InProcessMessageBus, InProcessMessagingModule, InProcessMessagingSettings, Message,
    Subscription,
};

// Re-export port trait from domain layer
pub use pab_domain::ports::providers::MessagePublisher;
