//! # Workflows Module
//!
//! High-level entry points that run a complete search.
//!
//! - **Search Workflow** ([`search`]) - Builds an optimizer from a configuration,
//!   drives it until the enumeration is exhausted or a step limit is reached, and
//!   reports progress and every improvement of the optimal record.

pub mod search;
