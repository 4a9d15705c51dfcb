//! # Spheresearch Core Library
//!
//! Enumerative search for the subset of `k` points, drawn from a fixed lattice on a
//! sphere, that best satisfies a geometric quality measurement. This is the discrete
//! counterpart of spherical-code and Tammes-style problems: instead of moving points
//! continuously, every candidate placement is a combination of lattice points.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data and pure mathematics: the candidate
//!   [`Lattice`](core::lattice::Lattice), the circumcircle solver and arc conversions,
//!   and the scoring [`Strategy`](core::measurement::Strategy) variants.
//!
//! - **[`engine`]: The Logic Core.** The stateful search machinery: configuration
//!   and validation, the combination enumerator with its prune-hinted jump, and the
//!   step-at-a-time [`Optimizer`](engine::optimizer::Optimizer) that keeps the
//!   best placement seen so far.
//!
//! - **[`workflows`]: The Public API.** Drives an optimizer to completion while
//!   reporting progress, for hosts that do not need to control the stepping cadence.

pub mod core;
pub mod engine;
pub mod workflows;
