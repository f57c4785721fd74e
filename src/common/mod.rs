//! Common infrastructure shared across pipeline stages
//!
//! This module provides reusable infrastructure for:
//! - Frequency counting and ASCII table formatting
//! - The generic table, typed catalog rows and count matrices
//! - Chart descriptions and PNG rendering

pub mod data_structures;
pub mod frequency;
pub mod plots;

// Re-export commonly used items
pub use data_structures::{CatalogRow, ContentKind, CountMatrix, Table};
pub use plots::PlotError;
