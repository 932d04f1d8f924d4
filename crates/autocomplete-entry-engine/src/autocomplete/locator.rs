use crate::document::{Block, EntityKey};

/// Character sequence that opens a session
pub const TRIGGER: &str = "<>";

const TRIGGER_OPEN: char = '<';
const TRIGGER_CLOSE: char = '>';
const TRIGGER_LEN: usize = 2;

/// A trigger eligible to drive a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Character offset of `<` within the block
    pub trigger_offset: usize,
    /// Text typed between the trigger and the caret
    pub compare_text: String,
}

/// Find the trigger a caret at `caret_offset` completes
///
/// Scans right to left from the caret for the nearest trigger. Fails when
/// there is none, when nothing has been typed after it yet, when the trigger
/// itself belongs to an entity, or when any character between the trigger
/// and the caret carries an entity.
pub fn locate(
    block_text: &str,
    entity_at: impl Fn(usize) -> Option<EntityKey>,
    caret_offset: usize,
) -> Option<TriggerMatch> {
    let before_caret: Vec<char> = block_text.chars().take(caret_offset).collect();
    if before_caret.len() < caret_offset {
        return None;
    }

    let trigger_offset = before_caret
        .windows(TRIGGER_LEN)
        .rposition(|pair| pair[0] == TRIGGER_OPEN && pair[1] == TRIGGER_CLOSE)?;
    let prefix_start = trigger_offset + TRIGGER_LEN;

    // A bare trigger does not open a session
    if prefix_start == caret_offset {
        return None;
    }
    if (trigger_offset..caret_offset).any(|offset| entity_at(offset).is_some()) {
        return None;
    }

    Some(TriggerMatch {
        trigger_offset,
        compare_text: before_caret[prefix_start..].iter().collect(),
    })
}

/// `locate` over a document block
pub fn locate_in_block(block: &Block, caret_offset: usize) -> Option<TriggerMatch> {
    locate(&block.text_cow(), |offset| block.entity_at(offset), caret_offset)
}
