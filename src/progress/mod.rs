//! Daily goal, streak and star tracking

pub mod models;
pub mod rewards;
pub mod tracker;

pub use models::*;
