//! # minipool-app
//!
//! Application layer: the group core and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** for the collaborators the core consumes:
//!   - `Element`: any group member (physical channel, pseudo element, group)
//!   - `ElementListener`: receiver of change notifications
//!   - `ActionCache`: registry of physical elements subject to actions
//!   - `ElementLookup`: resolves ids when a group is built
//! - Resolve the **physical closure** of an element (`physical`)
//! - Maintain **groups**: ordered unique membership, physical index, action
//!   cache synchronisation, listener wiring, and state aggregation (`group`)
//! - Provide **in-process infrastructure** that doesn't need IO: listener
//!   registry, in-memory action cache and element registry, event bus
//!
//! ## Dependency rule
//! Depends on `minipool-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod action_cache;
pub mod event_bus;
pub mod group;
pub mod listeners;
pub mod physical;
pub mod ports;
pub mod registry;

#[cfg(test)]
mod testing;
