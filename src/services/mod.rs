// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::CatalogueCache;
pub use memory::InMemoryStore;
pub use postgres::{build_commune_query, PostgresClient};
pub use store::{CommuneStore, StoreError};
