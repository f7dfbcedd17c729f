//! Cache implementations for grid processing.

mod map_cache;

pub use map_cache::{MapCache, MapKey};
