use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::document::DocumentError;

/// Identifier of a block, unique within one `Content` lineage
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey(pub u64);

/// Identifier of an entity in the content's entity table
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(pub u64);

/// How text carrying an entity reacts to edits
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Text may be edited freely, the entity stays attached
    Mutable,
    /// Text is atomic: it is never split, and deleting any part of it removes the whole range
    Immutable,
}

/// A typed annotation attached to a run of characters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub kind: String,
    pub mutability: Mutability,
}

/// Inline formatting flags of a single character
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub code: bool,
}

/// One toggleable inline formatting flag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
    Code,
}

impl InlineStyle {
    pub fn toggled(mut self, flag: StyleFlag) -> Self {
        match flag {
            StyleFlag::Bold => self.bold = !self.bold,
            StyleFlag::Italic => self.italic = !self.italic,
            StyleFlag::Underline => self.underline = !self.underline,
            StyleFlag::Code => self.code = !self.code,
        }
        self
    }
}

/// Per-character metadata, kept parallel to the block text
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CharMeta {
    pub style: InlineStyle,
    pub entity: Option<EntityKey>,
}

/// A character range within a single block
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextRange {
    pub block: BlockKey,
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(block: BlockKey, start: usize, end: usize) -> Self {
        Self { block, start, end }
    }

    pub fn collapsed(block: BlockKey, at: usize) -> Self {
        Self::new(block, at, at)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// A paragraph-like unit of text
///
/// `chars` always holds exactly one entry per character of `text`.
#[derive(Clone)]
pub struct Block {
    key: BlockKey,
    text: Rope,
    chars: Vec<CharMeta>,
}

impl Block {
    pub(crate) fn new(key: BlockKey, text: &str, meta: CharMeta) -> Self {
        let chars = vec![meta; text.chars().count()];
        Self {
            key,
            text: Rope::from(text),
            chars,
        }
    }

    fn from_parts(key: BlockKey, text: String, chars: Vec<CharMeta>) -> Self {
        debug_assert_eq!(text.chars().count(), chars.len());
        Self {
            key,
            text: Rope::from(text),
            chars,
        }
    }

    pub fn key(&self) -> BlockKey {
        self.key
    }

    /// Number of characters in the block
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// The block's text, borrowed when the rope is a single leaf
    pub fn text_cow(&self) -> Cow<'_, str> {
        self.text.slice_to_cow(0..self.text.len())
    }

    pub fn chars(&self) -> &[CharMeta] {
        &self.chars
    }

    /// Entity attached to the character at `offset`, absent past the end
    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.chars.get(offset).and_then(|meta| meta.entity)
    }

    pub fn style_at(&self, offset: usize) -> Option<InlineStyle> {
        self.chars.get(offset).map(|meta| meta.style)
    }

    /// Text of a character range, clamped to the block
    pub fn slice(&self, range: Range<usize>) -> String {
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end).max(start);
        self.text.slice_to_cow(start..end).into_owned()
    }

    /// Maximal range of characters sharing the same entity as `offset`
    pub fn entity_range(&self, offset: usize) -> Option<Range<usize>> {
        let entity = self.entity_at(offset)?;
        let start = self.chars[..offset]
            .iter()
            .rposition(|meta| meta.entity != Some(entity))
            .map_or(0, |i| i + 1);
        let end = self.chars[offset..]
            .iter()
            .position(|meta| meta.entity != Some(entity))
            .map_or(self.len(), |i| offset + i);
        Some(start..end)
    }

    /// The text run a caret at `caret` sits in
    ///
    /// A run is a maximal range of characters with identical metadata. The
    /// caret belongs to the run of the character before it, except at offset
    /// zero where it belongs to the run of the first character.
    pub fn run_containing(&self, caret: usize) -> Range<usize> {
        if self.chars.is_empty() {
            return 0..0;
        }
        let caret = caret.min(self.len());
        let before = caret.saturating_sub(1);
        let meta = self.chars[before];
        let start = self.chars[..before]
            .iter()
            .rposition(|m| *m != meta)
            .map_or(0, |i| i + 1);
        let end = self.chars[before..]
            .iter()
            .position(|m| *m != meta)
            .map_or(self.len(), |i| before + i);
        start..end
    }

    /// Convert a character offset into a byte offset in the rope
    fn byte_offset(&self, char_offset: usize) -> usize {
        if char_offset >= self.chars.len() {
            return self.text.len();
        }
        let mut remaining = char_offset;
        let mut chunk_start = 0;
        for chunk in self.text.iter_chunks(0..self.text.len()) {
            if let Some((byte, _)) = chunk.char_indices().nth(remaining) {
                return chunk_start + byte;
            }
            remaining -= chunk.chars().count();
            chunk_start += chunk.len();
        }
        self.text.len()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("key", &self.key)
            .field("text", &self.text())
            .field("chars", &self.chars)
            .finish()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        // Rope content is compared as text, the metadata decides the rest
        self.key == other.key && self.chars == other.chars && self.text() == other.text()
    }
}

/// An immutable document snapshot
///
/// Cloning is cheap: blocks and the entity table are shared.
#[derive(Clone, Debug, PartialEq)]
pub struct Content {
    blocks: Vec<Arc<Block>>,
    entities: Arc<HashMap<EntityKey, Entity>>,
    /// Next free key for blocks and entities
    next_key: u64,
}

impl Default for Content {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl Content {
    /// Create content with one unstyled block per line
    pub fn from_text(text: &str) -> Self {
        let blocks: Vec<Arc<Block>> = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| Arc::new(Block::new(BlockKey(i as u64), line, CharMeta::default())))
            .collect();
        let next_key = blocks.len() as u64;

        Self {
            blocks,
            entities: Arc::new(HashMap::new()),
            next_key,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|block| block.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, key: BlockKey) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| block.key == key)
            .map(|block| block.as_ref())
    }

    pub fn block_index(&self, key: BlockKey) -> Option<usize> {
        self.blocks.iter().position(|block| block.key == key)
    }

    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index).map(|block| block.as_ref())
    }

    pub fn first_block(&self) -> &Block {
        // Content always holds at least one block
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn block_before(&self, key: BlockKey) -> Option<&Block> {
        let index = self.block_index(key)?;
        index.checked_sub(1).and_then(|i| self.block_at(i))
    }

    pub fn block_after(&self, key: BlockKey) -> Option<&Block> {
        let index = self.block_index(key)?;
        self.block_at(index + 1)
    }

    /// All block texts joined by newlines
    pub fn plain_text(&self) -> String {
        self.blocks()
            .map(|block| block.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key)
    }

    /// Register a new entity and return the content that knows about it
    pub fn create_entity(&self, kind: &str, mutability: Mutability) -> (Content, EntityKey) {
        let mut next = self.clone();
        let key = EntityKey(next.next_key);
        next.next_key += 1;
        Arc::make_mut(&mut next.entities).insert(
            key,
            Entity {
                kind: kind.to_string(),
                mutability,
            },
        );
        (next, key)
    }

    /// Replace a character range of one block with `text`
    ///
    /// Every inserted character receives `style` and `entity`. An empty `text`
    /// deletes the range.
    pub fn replace_text(
        &self,
        range: TextRange,
        text: &str,
        style: InlineStyle,
        entity: Option<EntityKey>,
    ) -> Result<Content, DocumentError> {
        let index = self.checked_range(range)?;
        if let Some(key) = entity
            && !self.entities.contains_key(&key)
        {
            return Err(DocumentError::UnknownEntity(key));
        }

        let block = &self.blocks[index];
        if range.is_collapsed() && text.is_empty() {
            return Ok(self.clone());
        }

        let start_byte = block.byte_offset(range.start);
        let end_byte = block.byte_offset(range.end);

        let mut builder = Builder::new(block.text.len());
        if text.is_empty() {
            builder.delete(start_byte..end_byte);
        } else {
            builder.replace(start_byte..end_byte, Rope::from(text));
        }
        let delta = builder.build();
        let new_text = delta.apply(&block.text);

        let inserted = CharMeta { style, entity };
        let mut chars = Vec::with_capacity(block.len() - (range.end - range.start) + text.len());
        chars.extend_from_slice(&block.chars[..range.start]);
        chars.extend(std::iter::repeat_n(inserted, text.chars().count()));
        chars.extend_from_slice(&block.chars[range.end..]);

        let mut next = self.clone();
        next.blocks[index] = Arc::new(Block {
            key: block.key,
            text: new_text,
            chars,
        });
        Ok(next)
    }

    /// Split a block at `offset`, returning the key of the new second half
    pub fn split_block(
        &self,
        key: BlockKey,
        offset: usize,
    ) -> Result<(Content, BlockKey), DocumentError> {
        let index = self.checked_range(TextRange::collapsed(key, offset))?;
        let block = &self.blocks[index];

        let head = Block::from_parts(
            block.key,
            block.slice(0..offset),
            block.chars[..offset].to_vec(),
        );
        let new_key = BlockKey(self.next_key);
        let tail = Block::from_parts(
            new_key,
            block.slice(offset..block.len()),
            block.chars[offset..].to_vec(),
        );

        let mut next = self.clone();
        next.next_key += 1;
        next.blocks[index] = Arc::new(head);
        next.blocks.insert(index + 1, Arc::new(tail));
        Ok((next, new_key))
    }

    /// Append the following block to `key` and drop it
    pub fn merge_with_next(&self, key: BlockKey) -> Result<Content, DocumentError> {
        let index = self
            .block_index(key)
            .ok_or(DocumentError::UnknownBlock(key))?;
        let following = self
            .blocks
            .get(index + 1)
            .ok_or(DocumentError::NothingToMerge(key))?;
        let block = &self.blocks[index];

        let mut text = block.text();
        text.push_str(&following.text());
        let mut chars = block.chars.clone();
        chars.extend_from_slice(&following.chars);

        let mut next = self.clone();
        next.blocks[index] = Arc::new(Block::from_parts(block.key, text, chars));
        next.blocks.remove(index + 1);
        Ok(next)
    }

    fn checked_range(&self, range: TextRange) -> Result<usize, DocumentError> {
        let index = self
            .block_index(range.block)
            .ok_or(DocumentError::UnknownBlock(range.block))?;
        let len = self.blocks[index].len();
        if range.start > range.end || range.end > len {
            return Err(DocumentError::OutOfBounds {
                block: range.block,
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(index)
    }
}
