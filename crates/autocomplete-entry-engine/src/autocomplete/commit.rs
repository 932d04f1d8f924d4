use log::{debug, warn};

use crate::autocomplete::Session;
use crate::document::{ChangeType, EditorState, Mutability, Selection, TextRange};

/// Entity kind of a committed suggestion
pub const AUTOCOMPLETE_ENTRY: &str = "AUTOCOMPLETE_ENTRY";

/// Replace the trigger and typed prefix with the chosen suggestion
///
/// The inserted text is tagged with a new immutable `AUTOCOMPLETE_ENTRY`
/// entity, keeps the caret's inline style, and is pushed as a single undo
/// step. Returns `state` unchanged when the session is closed, the index is
/// out of range, or the document model rejects the edit.
pub fn commit(state: EditorState, session: &Session, chosen_index: usize) -> EditorState {
    let Some(open) = session.as_open() else {
        return state;
    };
    let Some(suggestion) = open.suggestions.get(chosen_index) else {
        return state;
    };

    let (content, entity) = state
        .content()
        .create_entity(AUTOCOMPLETE_ENTRY, Mutability::Immutable);
    let range = TextRange::new(open.block, open.trigger_offset, open.focus_offset);
    let style = state.current_inline_style();

    match content.replace_text(range, suggestion, style, Some(entity)) {
        Ok(content) => {
            debug!(
                "Committed {suggestion:?} over {}..{} of {:?}",
                range.start, range.end, range.block
            );
            let caret = open.trigger_offset + suggestion.chars().count();
            state.push(
                content,
                Selection::collapsed(open.block, caret),
                ChangeType::InsertCharacters,
            )
        }
        Err(err) => {
            warn!("Autocomplete commit rejected: {err}");
            state
        }
    }
}
