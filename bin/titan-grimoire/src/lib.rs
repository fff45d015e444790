//! Shared pieces of the Titan Grimoire binaries.

pub mod config;
