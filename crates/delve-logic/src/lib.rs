//! Delve Logic - pure geometry and validation for dungeon layouts
//!
//! Everything in this crate is plain data and pure functions: AABB math used
//! by the generator, and validation checks that run over an exported layout.
//! No randomness, no engine, no rendering.

pub mod aabb;
pub mod validation;
