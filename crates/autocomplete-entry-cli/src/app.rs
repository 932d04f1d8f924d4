use autocomplete_entry_engine::{
    Decorator, Direction, EditorCore, EditorState, GridGeometry, HandleValue, Key, Selection,
    StyleFlag,
};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;

/// Where the suggestion list was last drawn
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PopupLayout {
    /// Rows of the list, borders excluded
    pub list_area: Rect,
    /// Index of the first visible suggestion
    pub offset: usize,
}

pub struct App {
    pub(crate) core: EditorCore,
    pub(crate) decorator: Decorator,
    pub(crate) deferred: bool,
    /// Text area of the last frame, `None` before the first draw
    pub(crate) editor_area: Option<Rect>,
    /// Index of the first block on screen
    pub(crate) scroll: usize,
    pub(crate) popup: Option<PopupLayout>,
    pub(crate) list_state: ListState,
    layout_changed: bool,
    should_quit: bool,
}

impl App {
    pub fn new(vocabulary: Vec<String>, deferred: bool) -> Self {
        Self {
            core: EditorCore::new(EditorState::default(), vocabulary),
            decorator: Decorator::default(),
            deferred,
            editor_area: None,
            scroll: 0,
            popup: None,
            list_state: ListState::default(),
            layout_changed: false,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Geometry of the last drawn frame: one row per block, one cell per character
    pub fn geometry(&self) -> GridGeometry {
        match self.editor_area {
            Some(area) => GridGeometry {
                origin_top: f64::from(area.y),
                origin_left: f64::from(area.x),
                first_visible_block: self.scroll,
                visible_blocks: Some(usize::from(area.height)),
                ..GridGeometry::default()
            },
            None => GridGeometry::default(),
        }
    }

    /// Record the text area of the frame being drawn
    pub(crate) fn set_editor_area(&mut self, area: Rect) {
        if self.editor_area != Some(area) {
            self.editor_area = Some(area);
            self.layout_changed = true;
        }
        self.follow_caret();
    }

    /// Work that needs the frame just drawn; true when another draw is due
    pub fn after_draw(&mut self) -> bool {
        let mut redraw = false;
        if std::mem::take(&mut self.layout_changed) {
            let geometry = self.geometry();
            self.core.reevaluate(&geometry);
            redraw = true;
        }
        if let Some(ticket) = self.core.pending_evaluation() {
            let geometry = self.geometry();
            redraw |= self.core.run_deferred(ticket, &geometry);
        }
        redraw
    }

    pub fn on_key(&mut self, event: KeyEvent) {
        if event.kind != KeyEventKind::Press {
            return;
        }

        if event.modifiers.contains(KeyModifiers::CONTROL) {
            match event.code {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('z') => self.edit(EditorState::undo),
                KeyCode::Char('y') => self.edit(EditorState::redo),
                KeyCode::Char('b') => self.edit(|state| state.toggle_style(StyleFlag::Bold)),
                _ => {}
            }
            return;
        }

        if let Some(key) = engine_key(event.code)
            && self.core.handle_key(key) == HandleValue::Handled
        {
            return;
        }

        match event.code {
            KeyCode::Char(c) => {
                let text = c.to_string();
                self.edit(|state| state.insert_text(&text));
            }
            KeyCode::Backspace => self.edit(EditorState::backspace),
            KeyCode::Delete => self.edit(EditorState::delete_forward),
            KeyCode::Enter => self.edit(EditorState::split_block),
            KeyCode::Left => self.edit(|state| state.move_caret(Direction::Left)),
            KeyCode::Right => self.edit(|state| state.move_caret(Direction::Right)),
            KeyCode::Up => self.edit(|state| state.move_caret(Direction::Up)),
            KeyCode::Down => self.edit(|state| state.move_caret(Direction::Down)),
            KeyCode::Home => self.edit(|state| state.move_caret(Direction::LineStart)),
            KeyCode::End => self.edit(|state| state.move_caret(Direction::LineEnd)),
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let position = Position::new(event.column, event.row);

        if let Some(popup) = self.popup
            && popup.list_area.contains(position)
        {
            let index = popup.offset + usize::from(position.y - popup.list_area.y);
            self.core.commit(index);
            return;
        }

        let Some(area) = self.editor_area else {
            return;
        };
        if !area.contains(position) {
            return;
        }
        let index = self.scroll + usize::from(position.y - area.y);
        let Some(block) = self.core.state().content().block_at(index) else {
            return;
        };
        let key = block.key();
        let offset = usize::from(position.x - area.x).min(block.len());
        self.edit(|state| state.with_selection(Selection::collapsed(key, offset)));
    }

    /// Apply a document change through the configured evaluation path
    fn edit(&mut self, edit: impl FnOnce(EditorState) -> EditorState) {
        if self.deferred {
            self.core.apply_deferred(edit);
        } else {
            let geometry = self.geometry();
            self.core.apply(edit, &geometry);
        }
        self.follow_caret();
    }

    /// Scroll so the caret block is on screen
    fn follow_caret(&mut self) {
        let Some(area) = self.editor_area else {
            return;
        };
        let height = usize::from(area.height);
        let state = self.core.state();
        let Some(index) = state.content().block_index(state.selection().focus.block) else {
            return;
        };
        if height == 0 {
            return;
        }

        let scroll = if index < self.scroll {
            index
        } else if index >= self.scroll + height {
            index + 1 - height
        } else {
            self.scroll
        };
        if scroll != self.scroll {
            self.scroll = scroll;
            self.layout_changed = true;
        }
    }
}

fn engine_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(vec!["world".into(), "word".into(), "work".into()], false)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        text.chars().for_each(|c| press(app, KeyCode::Char(c)));
    }

    fn text(app: &App) -> String {
        app.core.state().content().plain_text()
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_typing_opens_session() {
        let mut app = app();
        type_text(&mut app, "Hi <>wo");

        assert_eq!(text(&app), "Hi <>wo");
        assert_eq!(app.core.view().map(|view| view.suggestions.len()), Some(3));
    }

    #[test]
    fn test_arrows_navigate_then_enter_commits() {
        let mut app = app();
        type_text(&mut app, "<>wor");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(text(&app), "word");
        assert!(!app.core.session().is_open());
    }

    #[test]
    fn test_enter_splits_block_without_session() {
        let mut app = app();
        type_text(&mut app, "ab");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "c");

        assert_eq!(text(&app), "ab\nc");
    }

    #[test]
    fn test_escape_closes_list_and_typing_reopens() {
        let mut app = app();
        type_text(&mut app, "<>wo");
        press(&mut app, KeyCode::Esc);
        assert!(!app.core.session().is_open());

        type_text(&mut app, "r");
        assert!(app.core.session().is_open());
    }

    #[test]
    fn test_control_keys() {
        let mut app = app();
        type_text(&mut app, "abc");
        ctrl(&mut app, 'z');
        assert_eq!(text(&app), "ab");
        ctrl(&mut app, 'y');
        assert_eq!(text(&app), "abc");

        ctrl(&mut app, 'b');
        type_text(&mut app, "d");
        let block = app.core.state().content().first_block();
        assert!(block.style_at(3).unwrap().bold);

        assert!(!app.should_quit());
        ctrl(&mut app, 'q');
        assert!(app.should_quit());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = app();
        app.on_key(KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });

        assert_eq!(text(&app), "");
    }

    #[test]
    fn test_click_on_suggestion_commits_it() {
        let mut app = app();
        type_text(&mut app, "<>wor");
        app.popup = Some(PopupLayout {
            list_area: Rect::new(0, 2, 10, 3),
            offset: 0,
        });

        click(&mut app, 3, 4);

        assert_eq!(text(&app), "work");
    }

    #[test]
    fn test_click_in_text_moves_caret() {
        let mut app = app();
        app.set_editor_area(Rect::new(1, 1, 20, 5));
        type_text(&mut app, "first");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "second");

        click(&mut app, 3, 1);

        let focus = app.core.state().selection().focus;
        let first = app.core.state().content().first_block().key();
        assert_eq!((focus.block, focus.offset), (first, 2));
    }

    #[test]
    fn test_caret_below_window_scrolls() {
        let mut app = app();
        app.set_editor_area(Rect::new(0, 0, 20, 2));
        type_text(&mut app, "a");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.scroll, 1);
        assert!(app.after_draw());
    }

    #[test]
    fn test_deferred_mode_evaluates_after_draw() {
        let mut app = App::new(vec!["world".into()], true);
        type_text(&mut app, "<>w");
        assert!(!app.core.session().is_open());

        assert!(app.after_draw());
        assert!(app.core.session().is_open());
        assert!(!app.after_draw());
    }
}
