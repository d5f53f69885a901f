pub mod config;
pub mod controller;
pub mod template;

pub use config::CollectionConfig;
pub use controller::{CollectionController, CollectionSnapshot};
