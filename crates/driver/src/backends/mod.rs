//! Storage backends

mod disk;
mod memory;

pub use disk::DiskStorage;
pub use memory::MemoryStorage;
