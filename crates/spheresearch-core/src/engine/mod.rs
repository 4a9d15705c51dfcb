//! # Engine Module
//!
//! The stateful search machinery that turns a lattice and a scoring strategy into a
//! verified-best placement, one evaluation at a time.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search parameters, builder and validation
//! - **Enumeration** ([`enumerator`]) - Lexicographic k-combinations with an optional prune jump
//! - **Optimization** ([`optimizer`]) - The `step()` driven search session
//! - **State Tracking** ([`state`]) - Search status, optimal record and step snapshots
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Completeness
//!
//! Only [`EnumerationMode::Exhaustive`](config::EnumerationMode::Exhaustive) visits
//! every placement and therefore guarantees the global optimum. The prune-hinted
//! mode is a greedy skip-ahead and may miss it.

pub mod config;
pub mod enumerator;
pub mod error;
pub mod optimizer;
pub mod progress;
pub mod state;
