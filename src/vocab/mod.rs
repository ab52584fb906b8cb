//! Vocabulary and spaced review for wordgarden
//!
//! This module provides:
//! - Word packs (built-in or loaded from JSON)
//! - The review ledger and staged spaced repetition scheduler
//! - Multiple-choice rounds for the matching game, quiz and review flow

pub mod catalog;
pub mod models;
pub mod quiz;
pub mod scheduler;

pub use catalog::{Catalog, CatalogError, WordPack};
pub use models::*;
pub use scheduler::{IntervalTable, Mastery, Scheduler};
