/*!
 * # Document Model
 *
 * A small persistent rich-text model: the only state the autocomplete core
 * reads from and writes to.
 *
 * ## Shape
 *
 * - A **`Content`** is an ordered list of **`Block`**s plus an entity table.
 * - Each block keeps its text in an **`xi_rope::Rope`** and a parallel list of
 *   per-character metadata (inline style and optional entity reference).
 * - **Entities** are immutable typed records (`AUTOCOMPLETE_ENTRY`, ...) that
 *   characters point at through an `EntityKey`.
 * - All public offsets are *character* offsets within one block. Byte offsets
 *   only exist at the rope boundary.
 *
 * ## Persistence
 *
 * Nothing is mutated in place. Every edit (`replace_text`, `split_block`,
 * `merge_with_next`, `create_entity`) returns a new `Content`; unchanged blocks
 * are shared between snapshots through `Arc`.
 *
 * `EditorState` pairs a `Content` with a `Selection` and an edit history. A
 * `push` records exactly one undo step, so a multi-part edit that is pushed
 * once is undone at once.
 *
 * ## Usage Pattern
 *
 * ```rust
 * use autocomplete_entry_engine::document::*;
 *
 * let state = EditorState::new(Content::from_text("Hello"));
 * let state = state.insert_text(" world");
 * assert_eq!(state.content().plain_text(), "Hello world");
 *
 * let state = state.undo();
 * assert_eq!(state.content().plain_text(), "Hello");
 * ```
 */

pub mod content;
pub mod editor_state;
pub mod error;
pub mod selection;

// Public API re-exports
pub use content::{
    Block, BlockKey, CharMeta, Content, Entity, EntityKey, InlineStyle, Mutability, StyleFlag,
    TextRange,
};
pub use editor_state::{ChangeType, Direction, EditorState};
pub use error::DocumentError;
pub use selection::{Position, Selection};
