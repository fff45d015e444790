//! titan-grimoire/crates/tg-core/src/lib.rs
//!
//! The central domain types, the action result contract and the port
//! definitions for Titan Grimoire.

pub mod action;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use action::*;
pub use context::*;
pub use error::*;
pub use models::*;
pub use traits::*;
