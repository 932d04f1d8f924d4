use crate::autocomplete::{AnchorPoint, HandleValue};
use crate::document::BlockKey;

/// Fields of an open session
///
/// `suggestions` is never empty and `selection_index` always points into it.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenSession {
    /// Block holding both the trigger and the caret
    pub block: BlockKey,
    pub trigger_offset: usize,
    pub focus_offset: usize,
    pub selection_index: usize,
    pub suggestions: Vec<String>,
    pub anchor: AnchorPoint,
}

/// Autocomplete session state
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Session {
    #[default]
    Closed,
    Open(OpenSession),
}

/// Read-only projection handed to the presentation layer
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SessionView<'a> {
    pub anchor: AnchorPoint,
    pub suggestions: &'a [String],
    pub selection_index: usize,
}

impl Session {
    pub fn is_open(&self) -> bool {
        matches!(self, Session::Open(_))
    }

    pub fn as_open(&self) -> Option<&OpenSession> {
        match self {
            Session::Open(open) => Some(open),
            Session::Closed => None,
        }
    }

    pub fn view(&self) -> Option<SessionView<'_>> {
        self.as_open().map(|open| SessionView {
            anchor: open.anchor,
            suggestions: &open.suggestions,
            selection_index: open.selection_index,
        })
    }

    /// Highlight the next suggestion; unhandled on the last one
    pub fn select_next(&mut self) -> HandleValue {
        match self {
            Session::Open(open) if open.selection_index + 1 < open.suggestions.len() => {
                open.selection_index += 1;
                HandleValue::Handled
            }
            _ => HandleValue::NotHandled,
        }
    }

    /// Highlight the previous suggestion; unhandled on the first one
    pub fn select_previous(&mut self) -> HandleValue {
        match self {
            Session::Open(open) if open.selection_index > 0 => {
                open.selection_index -= 1;
                HandleValue::Handled
            }
            _ => HandleValue::NotHandled,
        }
    }
}
