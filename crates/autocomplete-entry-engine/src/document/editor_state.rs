use std::ops::Range;

use log::warn;

use crate::document::{
    Block, BlockKey, Content, DocumentError, InlineStyle, Mutability, Position, Selection,
    StyleFlag, TextRange,
};

/// Kind of edit recorded in the history
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    RemoveRange,
    SplitBlock,
}

/// Caret movement
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

#[derive(Clone, Debug, PartialEq)]
struct HistoryEntry {
    content: Content,
    selection: Selection,
    change: ChangeType,
}

/// Content, selection and edit history
///
/// Every method consumes the state and returns the next one; a host keeps
/// the latest value and hands it to whoever reacts to document changes.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    content: Content,
    selection: Selection,
    /// Style picked for the next insertion, cleared when the caret moves
    style_override: Option<InlineStyle>,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    last_change: Option<ChangeType>,
    /// Incremented on every change, edits and selection moves alike
    version: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Content::default())
    }
}

impl EditorState {
    /// Create a state with the caret at the end of the content
    pub fn new(content: Content) -> Self {
        let last = content.last_block();
        let selection = Selection::collapsed(last.key(), last.len());
        Self {
            content,
            selection,
            style_override: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_change: None,
            version: 0,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_change(&self) -> Option<ChangeType> {
        self.last_change
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Block holding the selection focus
    pub fn focus_block(&self) -> Option<&Block> {
        self.content.block(self.selection.focus.block)
    }

    /// Style the next inserted character gets
    pub fn current_inline_style(&self) -> InlineStyle {
        if let Some(style) = self.style_override {
            return style;
        }
        let focus = self.selection.focus;
        self.content
            .block(focus.block)
            .and_then(|block| block.style_at(focus.offset.saturating_sub(1)))
            .unwrap_or_default()
    }

    /// Replace the content as one undoable step
    pub fn push(mut self, content: Content, selection: Selection, change: ChangeType) -> Self {
        let previous = std::mem::replace(&mut self.content, content);
        self.undo_stack.push(HistoryEntry {
            content: previous,
            selection: self.selection,
            change,
        });
        self.redo_stack.clear();
        self.selection = self.clamped(selection);
        self.style_override = None;
        self.last_change = Some(change);
        self.version += 1;
        self
    }

    pub fn undo(mut self) -> Self {
        let Some(entry) = self.undo_stack.pop() else {
            return self;
        };
        let current = self.swap_in(entry.content, entry.selection, entry.change);
        self.redo_stack.push(current);
        self
    }

    pub fn redo(mut self) -> Self {
        let Some(entry) = self.redo_stack.pop() else {
            return self;
        };
        let current = self.swap_in(entry.content, entry.selection, entry.change);
        self.undo_stack.push(current);
        self
    }

    /// Move the selection without touching the history
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = self.clamped(selection);
        self.style_override = None;
        self.version += 1;
        self
    }

    pub fn toggle_style(mut self, flag: StyleFlag) -> Self {
        self.style_override = Some(self.current_inline_style().toggled(flag));
        self.version += 1;
        self
    }

    /// Type `text` at the caret, replacing any selected text
    pub fn insert_text(self, text: &str) -> Self {
        let style = self.current_inline_style();
        let result = self.remove_selected().and_then(|(content, caret)| {
            let content = content.replace_text(
                TextRange::collapsed(caret.block, caret.offset),
                text,
                style,
                None,
            )?;
            let selection = Selection::collapsed(caret.block, caret.offset + text.chars().count());
            Ok((content, selection))
        });

        match result {
            Ok((content, selection)) => self.push(content, selection, ChangeType::InsertCharacters),
            Err(err) => {
                warn!("Ignoring text insertion: {err}");
                self
            }
        }
    }

    /// Delete the selection, or the character (or immutable entity) before the caret
    pub fn backspace(self) -> Self {
        if !self.selection.is_collapsed() {
            return self.delete_selection();
        }
        let caret = self.selection.focus;

        if caret.offset == 0 {
            let Some(previous) = self.content.block_before(caret.block) else {
                return self;
            };
            let joined_at = Position::new(previous.key(), previous.len());
            let result = self.content.merge_with_next(previous.key());
            return self.push_or_keep(result, joined_at, ChangeType::RemoveRange);
        }

        let Some(range) = self.removal_range(caret.block, caret.offset - 1) else {
            return self;
        };
        self.remove(TextRange::new(caret.block, range.start, range.end))
    }

    /// Delete the selection, or the character (or immutable entity) after the caret
    pub fn delete_forward(self) -> Self {
        if !self.selection.is_collapsed() {
            return self.delete_selection();
        }
        let caret = self.selection.focus;
        let Some(len) = self.focus_block().map(Block::len) else {
            return self;
        };

        if caret.offset >= len {
            if self.content.block_after(caret.block).is_none() {
                return self;
            }
            let result = self.content.merge_with_next(caret.block);
            return self.push_or_keep(result, caret, ChangeType::RemoveRange);
        }

        let Some(range) = self.removal_range(caret.block, caret.offset) else {
            return self;
        };
        self.remove(TextRange::new(caret.block, range.start, range.end))
    }

    pub fn delete_selection(self) -> Self {
        let result = self.remove_selected();
        match result {
            Ok((content, caret)) => self.push(
                content,
                Selection::collapsed(caret.block, caret.offset),
                ChangeType::RemoveRange,
            ),
            Err(err) => {
                warn!("Ignoring selection removal: {err}");
                self
            }
        }
    }

    /// Break the caret's block in two, the caret moves to the start of the second
    pub fn split_block(self) -> Self {
        let result = self
            .remove_selected()
            .and_then(|(content, caret)| content.split_block(caret.block, caret.offset));

        match result {
            Ok((content, new_block)) => self.push(
                content,
                Selection::collapsed(new_block, 0),
                ChangeType::SplitBlock,
            ),
            Err(err) => {
                warn!("Ignoring block split: {err}");
                self
            }
        }
    }

    pub fn move_caret(self, direction: Direction) -> Self {
        let focus = self.selection.focus;
        let len = self.focus_block().map_or(0, Block::len);
        let before = self
            .content
            .block_before(focus.block)
            .map(|b| (b.key(), b.len()));
        let after = self
            .content
            .block_after(focus.block)
            .map(|b| (b.key(), b.len()));

        let target = match direction {
            Direction::Left if focus.offset > 0 => Position::new(focus.block, focus.offset - 1),
            Direction::Left => before.map_or(focus, |(key, len)| Position::new(key, len)),
            Direction::Right if focus.offset < len => Position::new(focus.block, focus.offset + 1),
            Direction::Right => after.map_or(focus, |(key, _)| Position::new(key, 0)),
            Direction::Up => before.map_or(Position::new(focus.block, 0), |(key, len)| {
                Position::new(key, focus.offset.min(len))
            }),
            Direction::Down => after.map_or(Position::new(focus.block, len), |(key, len)| {
                Position::new(key, focus.offset.min(len))
            }),
            Direction::LineStart => Position::new(focus.block, 0),
            Direction::LineEnd => Position::new(focus.block, len),
        };

        self.with_selection(Selection::new(target, target))
    }

    fn swap_in(
        &mut self,
        content: Content,
        selection: Selection,
        change: ChangeType,
    ) -> HistoryEntry {
        let current = HistoryEntry {
            content: std::mem::replace(&mut self.content, content),
            selection: std::mem::replace(&mut self.selection, selection),
            change,
        };
        self.style_override = None;
        self.last_change = Some(change);
        self.version += 1;
        current
    }

    fn push_or_keep(
        self,
        result: Result<Content, DocumentError>,
        caret: Position,
        change: ChangeType,
    ) -> Self {
        match result {
            Ok(content) => self.push(content, Selection::new(caret, caret), change),
            Err(err) => {
                warn!("Ignoring {change:?}: {err}");
                self
            }
        }
    }

    fn remove(self, range: TextRange) -> Self {
        let result = self
            .content
            .replace_text(range, "", InlineStyle::default(), None);
        self.push_or_keep(
            result,
            Position::new(range.block, range.start),
            ChangeType::RemoveRange,
        )
    }

    /// Characters a single deletion at `offset` removes
    ///
    /// Immutable entities are removed as a whole.
    fn removal_range(&self, block: BlockKey, offset: usize) -> Option<Range<usize>> {
        let block = self.content.block(block)?;
        Some(self.immutable_range(block, offset).unwrap_or(offset..offset + 1))
    }

    /// Range of the immutable entity holding the character at `offset`
    fn immutable_range(&self, block: &Block, offset: usize) -> Option<Range<usize>> {
        let entity = block.entity_at(offset).and_then(|key| self.content.entity(key))?;
        if entity.mutability == Mutability::Immutable {
            block.entity_range(offset)
        } else {
            None
        }
    }

    /// Move a range start that falls inside an immutable entity to the entity's start
    fn widen_start(&self, position: Position) -> Position {
        let Some(block) = self.content.block(position.block) else {
            return position;
        };
        match self.immutable_range(block, position.offset) {
            Some(range) if range.start < position.offset => {
                Position::new(position.block, range.start)
            }
            _ => position,
        }
    }

    /// Move a range end (or caret) that falls inside an immutable entity to the entity's end
    fn widen_end(&self, position: Position) -> Position {
        let Some(block) = self.content.block(position.block) else {
            return position;
        };
        let inside = position
            .offset
            .checked_sub(1)
            .and_then(|last| self.immutable_range(block, last));
        match inside {
            Some(range) if range.end > position.offset => {
                Position::new(position.block, range.end)
            }
            _ => position,
        }
    }

    /// Content with the selected text removed, and the collapsed caret
    ///
    /// Immutable entities are never split: a selection end inside one grows
    /// to cover it, and a caret inside one moves to its end.
    fn remove_selected(&self) -> Result<(Content, Position), DocumentError> {
        if self.selection.is_collapsed() {
            return Ok((self.content.clone(), self.widen_end(self.selection.focus)));
        }

        if let Some(range) = self.selection.single_block_range() {
            let start = self.widen_start(Position::new(range.block, range.start));
            let end = self.widen_end(Position::new(range.block, range.end));
            let range = TextRange::new(range.block, start.offset, end.offset);
            let content = self
                .content
                .replace_text(range, "", InlineStyle::default(), None)?;
            return Ok((content, start));
        }

        let (start, end) = self.ordered_positions()?;
        let (start, end) = (self.widen_start(start), self.widen_end(end));
        let start_index = self
            .content
            .block_index(start.block)
            .ok_or(DocumentError::UnknownBlock(start.block))?;
        let end_index = self
            .content
            .block_index(end.block)
            .ok_or(DocumentError::UnknownBlock(end.block))?;

        let mut content = self.content.clone();
        for index in start_index..=end_index {
            let Some(block) = content.block_at(index) else {
                break;
            };
            let (key, len) = (block.key(), block.len());
            let range = if index == start_index {
                TextRange::new(key, start.offset.min(len), len)
            } else if index == end_index {
                TextRange::new(key, 0, end.offset.min(len))
            } else {
                TextRange::new(key, 0, len)
            };
            content = content.replace_text(range, "", InlineStyle::default(), None)?;
        }
        for _ in start_index..end_index {
            content = content.merge_with_next(start.block)?;
        }

        Ok((content, start))
    }

    fn ordered_positions(&self) -> Result<(Position, Position), DocumentError> {
        let anchor = self.selection.anchor;
        let focus = self.selection.focus;
        let index_of = |position: Position| {
            self.content
                .block_index(position.block)
                .ok_or(DocumentError::UnknownBlock(position.block))
        };

        if (index_of(anchor)?, anchor.offset) <= (index_of(focus)?, focus.offset) {
            Ok((anchor, focus))
        } else {
            Ok((focus, anchor))
        }
    }

    fn clamped(&self, selection: Selection) -> Selection {
        let clamp = |position: Position| match self.content.block(position.block) {
            Some(block) => Position::new(position.block, position.offset.min(block.len())),
            None => {
                let last = self.content.last_block();
                Position::new(last.key(), last.len())
            }
        };
        Selection::new(clamp(selection.anchor), clamp(selection.focus))
    }
}
