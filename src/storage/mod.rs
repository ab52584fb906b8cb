mod state;
mod store;

pub use state::AppState;
pub use store::{JsonFileStore, MemoryStore, StateStore, StorageError, STORAGE_KEY};
