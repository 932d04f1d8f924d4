use thiserror::Error;

use crate::document::{BlockKey, EntityKey};

/// Reasons the document model refuses an edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("No block with key {0:?}")]
    UnknownBlock(BlockKey),

    #[error("Range {start}..{end} is out of bounds for block {block:?} of length {len}")]
    OutOfBounds {
        block: BlockKey,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("No entity with key {0:?}")]
    UnknownEntity(EntityKey),

    #[error("Block {0:?} has no following block to merge with")]
    NothingToMerge(BlockKey),
}
