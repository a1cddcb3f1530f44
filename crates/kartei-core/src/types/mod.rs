//! Core types for kartei.

mod item;
mod judgment;
pub mod timestamp;

pub use item::*;
pub use judgment::Judgment;
