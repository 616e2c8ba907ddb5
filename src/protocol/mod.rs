//! Downstream content-retrieval interface.
//!
//! Repositories resolved by this crate are subsequently addressed through a
//! file/tree retrieval schema. We only define the wire shapes here; the
//! service producing them lives elsewhere.

pub mod messages;

pub use messages::{FileRange, GetFileOptions, TreeEntry, TreeEntryType};
