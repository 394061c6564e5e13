//! Property Indexing module
//!
//! Provides B-Tree indices for optimizing property lookups.

pub mod manager;
pub mod property_index;

pub use manager::IndexManager;
pub use property_index::{IndexKey, PropertyIndex};
