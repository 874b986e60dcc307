//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the group core and the outside world.
//! They are defined here (in `app`) so that both the group logic and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod action_cache;
pub mod element;
pub mod lookup;

pub use action_cache::ActionCache;
pub use element::{Element, ElementListener, ElementRef, Role};
pub use lookup::ElementLookup;
