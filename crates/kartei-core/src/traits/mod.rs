//! Core traits for kartei collaborators.

mod clock;
mod item_store;

pub use clock::*;
pub use item_store::*;
