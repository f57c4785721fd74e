//! Catalog-specific derivations
//!
//! This module contains the pure derivations behind every report:
//! - Genre explosion, frequency and co-occurrence
//! - Categorical distributions and cross-tabulations
//! - Duration extraction and distribution
//! - The printed catalog summary

pub mod categorical;
pub mod constants;
pub mod duration;
pub mod genres;
pub mod summary;

pub use summary::CatalogSummary;
