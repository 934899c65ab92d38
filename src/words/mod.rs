//! Vocabulary list and spaced repetition for wortschatz
//!
//! This module provides:
//! - Word list storage (flat comma-separated file)
//! - Due word selection with random backfill
//! - The review interval state machine
//! - Rebuilding a word list from a backup

pub mod algorithm;
pub mod import;
pub mod models;
pub mod selector;
pub mod storage;

pub use algorithm::{apply_choice, next_choices, ReviewError, ReviewOutcome};
pub use models::*;
pub use selector::{select, Selection};
pub use storage::{WordStore, WordStoreError};
