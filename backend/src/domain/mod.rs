//! # Domain Module
//!
//! Business logic for the baby tracker: one service per record kind, the
//! profile and subscription gates, the elapsed-time trackers and the
//! recommendation engine. Services are cheap `Clone` handles over shared
//! state and depend only on the storage abstraction and a [`Clock`].
//!
//! [`Clock`]: crate::clock::Clock

pub mod access_gate;
pub mod commands;
pub mod daily_summary;
pub mod feeding_service;
pub mod formatting;
pub mod growth_service;
pub mod medicine_service;
pub mod models;
pub mod observation_service;
pub mod profile_service;
pub mod recommendation;
pub mod sleep_service;
pub mod subscription_service;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use access_gate::AccessGate;
pub use feeding_service::FeedingService;
pub use growth_service::GrowthService;
pub use medicine_service::MedicineService;
pub use observation_service::ObservationService;
pub use profile_service::ProfileService;
pub use recommendation::RecommendationService;
pub use sleep_service::SleepService;
pub use subscription_service::SubscriptionService;
pub use tracker::{ElapsedTicker, ElapsedTracker};
