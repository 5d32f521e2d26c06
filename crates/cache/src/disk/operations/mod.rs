//! Cache operations

mod eviction;
mod fetch;
mod stats;
