//! # Core Module
//!
//! Stateless building blocks of the search.
//!
//! - **Candidate Points** ([`lattice`]) - The ordered latitude/longitude lattice on the sphere
//! - **Scoring** ([`measurement`]) - Minimum pairwise distance and empty-circle ratio strategies
//! - **Geometry** ([`utils`]) - Circumcircle construction and chord/arc conversions
//!
//! Everything here is a pure function of its inputs; no type in this module holds
//! search progress.

pub mod lattice;
pub mod measurement;
pub mod utils;
