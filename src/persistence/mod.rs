pub mod store;

#[cfg(test)]
pub use store::MockProfileStore;
pub use store::{JsonFileStore, PersistenceError, ProfileStore};
