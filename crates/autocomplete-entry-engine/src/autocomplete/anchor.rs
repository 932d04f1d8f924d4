use log::trace;

use crate::document::EditorState;

/// Bounding box reported by the environment
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Where the suggestion list is placed
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnchorPoint {
    pub top: f64,
    pub left: f64,
}

/// A live on-screen range, as a browser selection range would be
pub trait ScreenRange {
    /// Caret position inside the text node that holds it
    fn node_offset(&self) -> usize;

    /// Move the start of the range to `offset` within the same node
    fn set_start(&mut self, offset: usize);

    /// Zero when the range is not laid out
    fn client_rect_count(&self) -> usize;

    fn bounding_rect(&self) -> Rect;
}

/// The environment's view of the current selection
pub trait GeometryService {
    type Range: ScreenRange;

    /// Range of the live selection, absent when there is none (focus lost)
    fn current_selection_range(&self, state: &EditorState) -> Option<Self::Range>;
}

/// Anchor directly below the start of the trigger
///
/// Fails when the environment has no selection, when the trigger lies
/// before the start of the caret's text node, or when the range has no
/// on-screen rectangles.
pub fn resolve<G: GeometryService>(
    trigger_offset: usize,
    caret_offset: usize,
    state: &EditorState,
    geometry: &G,
) -> Option<AnchorPoint> {
    let mut range = geometry.current_selection_range(state)?;
    let distance = caret_offset.checked_sub(trigger_offset)?;

    let Some(start) = range.node_offset().checked_sub(distance) else {
        trace!("Trigger at {trigger_offset} starts before the caret's text node");
        return None;
    };
    range.set_start(start);

    if range.client_rect_count() == 0 {
        trace!("Trigger range has no client rects");
        return None;
    }

    let rect = range.bounding_rect();
    Some(AnchorPoint {
        top: rect.bottom,
        left: rect.left,
    })
}

/// Fixed-cell layout: one row per block, one cell per character
///
/// A text node is a run of characters with identical style and entity, the
/// way a rich-text view splits a paragraph into spans. Blocks outside the
/// visible window report no client rects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridGeometry {
    pub origin_top: f64,
    pub origin_left: f64,
    pub cell_height: f64,
    pub cell_width: f64,
    /// Index of the first block drawn
    pub first_visible_block: usize,
    /// Number of blocks drawn, unbounded when absent
    pub visible_blocks: Option<usize>,
    pub focused: bool,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            origin_top: 0.0,
            origin_left: 0.0,
            cell_height: 1.0,
            cell_width: 1.0,
            first_visible_block: 0,
            visible_blocks: None,
            focused: true,
        }
    }
}

/// Selection range produced by `GridGeometry`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridRange {
    /// Visible row of the block, `None` when scrolled out
    row: Option<usize>,
    /// Block offset of the node's first character
    node_start: usize,
    /// Node-relative start and end
    start: usize,
    end: usize,
    geometry: GridGeometry,
}

impl ScreenRange for GridRange {
    fn node_offset(&self) -> usize {
        self.end
    }

    fn set_start(&mut self, offset: usize) {
        self.start = offset.min(self.end);
    }

    fn client_rect_count(&self) -> usize {
        usize::from(self.row.is_some())
    }

    fn bounding_rect(&self) -> Rect {
        let row = self.row.unwrap_or_default() as f64;
        let top = self.geometry.origin_top + row * self.geometry.cell_height;
        Rect {
            top,
            bottom: top + self.geometry.cell_height,
            left: self.geometry.origin_left
                + (self.node_start + self.start) as f64 * self.geometry.cell_width,
        }
    }
}

impl GeometryService for GridGeometry {
    type Range = GridRange;

    fn current_selection_range(&self, state: &EditorState) -> Option<GridRange> {
        if !self.focused {
            return None;
        }
        let focus = state.selection().focus;
        let block = state.focus_block()?;
        let index = state.content().block_index(block.key())?;

        let row = index
            .checked_sub(self.first_visible_block)
            .filter(|row| self.visible_blocks.is_none_or(|visible| *row < visible));
        let node = block.run_containing(focus.offset);
        let node_offset = focus.offset.saturating_sub(node.start);

        Some(GridRange {
            row,
            node_start: node.start,
            start: node_offset,
            end: node_offset,
            geometry: *self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Content, StyleFlag};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anchor_sits_below_trigger_start() {
        let state = EditorState::new(Content::from_text("Hello <>wor"));

        let anchor = resolve(6, 11, &state, &GridGeometry::default());

        assert_eq!(anchor, Some(AnchorPoint { top: 1.0, left: 6.0 }));
    }

    #[test]
    fn test_anchor_uses_origin_and_cell_size() {
        let state = EditorState::new(Content::from_text("first\nab <>cd"));
        let geometry = GridGeometry {
            origin_top: 10.0,
            origin_left: 4.0,
            cell_height: 2.0,
            cell_width: 0.5,
            ..GridGeometry::default()
        };

        let anchor = resolve(3, 7, &state, &geometry);

        // Second row spans 12..14, trigger starts three cells in
        assert_eq!(anchor, Some(AnchorPoint { top: 14.0, left: 5.5 }));
    }

    #[test]
    fn test_trigger_in_earlier_text_node_has_no_anchor() {
        let state = EditorState::new(Content::from_text("x <>"))
            .toggle_style(StyleFlag::Bold)
            .insert_text("wo");

        assert_eq!(resolve(2, 6, &state, &GridGeometry::default()), None);
    }

    #[test]
    fn test_scrolled_out_block_has_no_client_rects() {
        let state = EditorState::new(Content::from_text("<>ab\nlast"));
        let state = state.move_caret(crate::document::Direction::Up);
        let geometry = GridGeometry {
            first_visible_block: 1,
            ..GridGeometry::default()
        };

        assert_eq!(resolve(0, 4, &state, &geometry), None);
        assert!(resolve(0, 4, &state, &GridGeometry::default()).is_some());
    }

    #[test]
    fn test_unfocused_editor_has_no_selection_range() {
        let state = EditorState::new(Content::from_text("<>ab"));
        let geometry = GridGeometry {
            focused: false,
            ..GridGeometry::default()
        };

        assert_eq!(resolve(0, 4, &state, &geometry), None);
    }
}
