//! WordGarden: spaced-repetition vocabulary practice for children
//!
//! The core (`vocab`, `progress`, `storage`, `session`) is synchronous and pure
//! where it can be. Illustrations and pronunciations come from a generative
//! service through the `gateway`.

pub mod audio;
pub mod config;
pub mod gateway;
pub mod progress;
pub mod session;
pub mod storage;
pub mod vocab;

pub use config::AppConfig;
pub use session::Session;
