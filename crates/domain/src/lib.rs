//! # minipool-domain
//!
//! Pure domain model for minipool, the group layer of a hardware pool.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define **element identity** (name, id, type) and the split between
//!   *physical* elements (owned by a controller) and *composite* ones
//! - Define the fixed **element state** enumeration and the four-bucket
//!   state statistics used to summarise a group
//! - Define the **physical index**: controller → set of physical elements
//! - Define **events** emitted when an element changes
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod element;
pub mod event;
pub mod physical_index;
pub mod state;
pub mod statistics;
