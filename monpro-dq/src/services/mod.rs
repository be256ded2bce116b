//! Background services for the diagnostic pipeline

pub mod alerts;
pub mod battlecard;
pub mod cooldown;
pub mod delivery;
pub mod openai_client;
pub mod ratelimit;

pub use alerts::{AlertBus, LeadAlert};
pub use battlecard::BattlecardGenerator;
pub use cooldown::{CooldownDecision, CooldownStore, MemoryCooldownStore, SqliteCooldownStore};
pub use delivery::{DeliveryFanout, WebhookClient};
pub use openai_client::OpenAiClient;
pub use ratelimit::IpRateLimiter;
