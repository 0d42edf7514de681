//! Ports - interfaces between the domain and the outside world.
//!
//! Following hexagonal architecture, ports define the contracts the
//! application layer programs against; adapters implement them.
//!
//! - `EntitlementStore` - membership records, read + compare-and-swap
//! - `UserDirectory` - provider customer to local user resolution
//! - `ContentRepository` - content item persistence
//! - `CollectionStore` - collection documents and atomic counter deltas
//! - `EventPublisher` - post-commit membership effect fan-out

mod collection_store;
mod content_repository;
mod entitlement_store;
mod event_publisher;
mod user_directory;

pub use collection_store::CollectionStore;
pub use content_repository::{ContentFilter, ContentRepository, PremiumToggle};
pub use entitlement_store::EntitlementStore;
pub use event_publisher::EventPublisher;
pub use user_directory::UserDirectory;
