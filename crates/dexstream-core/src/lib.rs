#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod contracts;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use contracts::pokeapi::{PayloadError, PokemonPayload};
pub use domain::{BaseStats, DexRecord, normalize, title_case};
pub use ports::{CatalogError, CatalogPort, CatalogResult};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::MockCatalogPort;
