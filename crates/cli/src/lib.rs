//! Command line front end for chcache
//!
//! Exposes the disk cache (`fetch`, `survey`, `purge`, `evict`, `path`) and
//! the weighted node router (`route ...`) as one-shot commands.

pub mod commands;
pub mod settings;

pub use commands::Commands;
pub use settings::Settings;
