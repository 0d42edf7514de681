//! Catalog application handlers - content mutations behind counter
//! maintenance and reads behind the gate.

mod browse;
mod collections;
mod publish_item;
mod remove_item;
mod set_premium;

pub use browse::{
    BrowseContentHandler, BrowseContentQuery, GetContentHandler, GetContentQuery, Page,
};
pub use collections::{CreateCollectionCommand, CreateCollectionHandler, ListCollectionsHandler};
pub use publish_item::{PublishItemCommand, PublishItemHandler};
pub use remove_item::{RemoveItemCommand, RemoveItemHandler};
pub use set_premium::{SetPremiumCommand, SetPremiumHandler};
