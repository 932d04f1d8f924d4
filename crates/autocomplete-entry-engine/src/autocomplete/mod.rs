/*!
 * # Autocomplete Core
 *
 * Typing the trigger `<>` followed by at least one character opens a
 * suggestion session; committing a suggestion replaces the trigger and the
 * typed prefix with an immutable `AUTOCOMPLETE_ENTRY` entity.
 *
 * ## Pipeline
 *
 * Every document change runs, short-circuiting to `Session::Closed`:
 *
 * 1. **Caret check**: collapsed selection, no entity at the caret
 * 2. **`locator`**: nearest trigger before the caret in the same block
 * 3. **`matcher`**: case-insensitive prefix filter over the vocabulary
 * 4. **`anchor`**: screen position below the trigger via a `GeometryService`
 *
 * The result replaces the previous session wholesale; only the selection
 * index is ever changed in place (keyboard navigation).
 *
 * ## Module Structure
 *
 * - **`matcher`**: prefix filter with "insert as typed" fallback
 * - **`locator`**: trigger detection on a single block
 * - **`anchor`**: geometry collaborator traits, `GridGeometry`, anchor resolution
 * - **`session`**: `Session` variant and navigation
 * - **`commit`**: turns the chosen suggestion into an entity
 * - **`keymap`**: host keys to autocomplete commands
 * - **`scheduler`**: generation-counted deferred evaluation
 * - **`controller`**: `EditorCore`, which owns the document and the session
 *
 * ## Usage Pattern
 *
 * ```rust
 * use autocomplete_entry_engine::*;
 *
 * let vocabulary = vec!["world".to_string(), "word".to_string(), "work".to_string()];
 * let geometry = GridGeometry::default();
 * let mut core = EditorCore::new(EditorState::default(), vocabulary);
 *
 * core.apply(|state| state.insert_text("Hello <>wor"), &geometry);
 * assert_eq!(core.view().map(|view| view.suggestions.len()), Some(3));
 *
 * core.handle_key(Key::ArrowDown);
 * core.handle_key(Key::ArrowDown);
 * assert_eq!(core.handle_key(Key::Enter), HandleValue::Handled);
 * assert_eq!(core.state().content().plain_text(), "Hello work");
 * assert!(!core.session().is_open());
 * ```
 */

pub mod anchor;
pub mod commit;
pub mod controller;
pub mod keymap;
pub mod locator;
pub mod matcher;
pub mod scheduler;
pub mod session;

// Public API re-exports
pub use anchor::{AnchorPoint, GeometryService, GridGeometry, GridRange, Rect, ScreenRange};
pub use commit::{AUTOCOMPLETE_ENTRY, commit};
pub use controller::{EditorCore, evaluate};
pub use keymap::{HandleValue, Key, KeyCommand, key_binding};
pub use locator::{TRIGGER, TriggerMatch, locate, locate_in_block};
pub use matcher::prefix_matches;
pub use scheduler::{Scheduler, Ticket};
pub use session::{OpenSession, Session, SessionView};
