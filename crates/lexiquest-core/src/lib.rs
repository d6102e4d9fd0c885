//! lexiquest-core — Game session engine, word selection, and scoring.
//!
//! This crate defines the fundamental data model, repository traits, and
//! grading logic that the entire lexiquest system builds on.

pub mod engine;
pub mod error;
pub mod model;
pub mod score;
pub mod selection;
pub mod stats;
pub mod traits;
