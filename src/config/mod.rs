//! Layered config file resolution
//!
//! Loads structured config files and merges an inheritance family of them
//! (most specific file wins) into one tree.

pub mod chain;
pub mod loader;
pub mod merge;

pub use chain::{resolve_chain, InheritanceChain};
pub use loader::load_config;
pub use merge::chain_maps;
