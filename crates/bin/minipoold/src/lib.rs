//! # minipoold: minipool daemon
//!
//! Composition root that builds the configured pool and reports group state.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Create virtual controllers and their physical elements (adapters)
//! - Build groups from element names, each with its own action cache
//! - Forward group events to an in-process event bus
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

pub mod config;
pub mod pool;
