// src/dag/mod.rs

//! Dependency resolution for workflow tasks.
//!
//! - [`graph`] holds [`TaskRecord`] and the arena-backed [`DependencyMap`].
//! - [`cycle`] finds circular dependencies and reports the cycle chain.
//! - [`resolver`] turns records into a [`ResolvedDag`] (validated, acyclic).
//! - [`order`] computes a topological execution order.
//! - [`levels`] assigns levels and groups tasks that may run in parallel.
//!
//! Everything here is a pure function of its input.

pub mod cycle;
pub mod graph;
pub mod levels;
pub mod order;
pub mod resolver;

pub use cycle::{detect_cycle, is_acyclic};
pub use graph::{DependencyMap, TaskRecord};
pub use levels::{levels, parallel_groups};
pub use order::execution_order;
pub use resolver::{ResolvedDag, resolve};
