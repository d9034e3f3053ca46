//! Domain types for the record feed.

mod normalize;
mod record;

pub use normalize::{normalize, title_case};
pub use record::{BaseStats, DexRecord};
