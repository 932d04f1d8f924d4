use crate::document::{BlockKey, TextRange};

/// A caret position: block plus character offset within it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub block: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(block: BlockKey, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Anchor is where the selection started, focus is where the caret is
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(block: BlockKey, offset: usize) -> Self {
        let at = Position::new(block, offset);
        Self::new(at, at)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn focus_offset(&self) -> usize {
        self.focus.offset
    }

    /// The selected range when anchor and focus share a block
    pub fn single_block_range(&self) -> Option<TextRange> {
        if self.anchor.block != self.focus.block {
            return None;
        }
        let start = self.anchor.offset.min(self.focus.offset);
        let end = self.anchor.offset.max(self.focus.offset);
        Some(TextRange::new(self.anchor.block, start, end))
    }
}
