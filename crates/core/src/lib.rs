//! Core building blocks shared by every `chcache` crate.
//!
//! ## Key Components
//!
//! - **`errors`**: the `CacheError` enum and `Result` alias. Every failure
//!   mode of the disk cache and the node registry is a variant here.
//! - **`storage`**: the `Storage` capability (put/get/delete/stat) that any
//!   backend implements. The registry is written purely against it.
//! - **`atomic_file`**: temp-file-and-rename writes used when persisting values.
//! - **`constants`**: shard count and the default tuning knobs.

pub mod atomic_file;
pub mod constants;
pub mod errors;
pub mod storage;

pub use self::{
    atomic_file::write_atomic,
    constants::*,
    errors::{BoxError, CacheError, Result},
    storage::{Storage, StorageStat},
};
