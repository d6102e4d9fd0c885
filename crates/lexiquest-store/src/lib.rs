//! lexiquest-store — In-memory transactional store and vocabulary packs.
//!
//! Implements the `lexiquest-core` repository traits over a single
//! `RwLock`-guarded world state, with TOML vocabulary-pack import and JSON
//! snapshot persistence.

pub mod memory;
pub mod pack;

pub use memory::MemoryStore;
pub use pack::{parse_pack, parse_pack_str, ImportSummary, VocabularyPack};
