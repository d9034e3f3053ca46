//! Transport contracts.
//!
//! `http` holds route constants shared across adapters; `pokeapi` holds the
//! raw upstream payload schema. Keep these free of framework-specific types
//! to avoid dependency creep.

pub mod http;
pub mod pokeapi;
