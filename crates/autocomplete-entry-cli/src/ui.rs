use autocomplete_entry_engine::{
    AnchorPoint, AutocompleteEntryMatcher, Block as TextBlock, Content, Decorator, InlineStyle,
    TriggerMatcher,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::{App, PopupLayout};

/// Rows of suggestions shown before the list scrolls
const MAX_VISIBLE_SUGGESTIONS: usize = 8;
const MIN_POPUP_WIDTH: u16 = 12;
/// Shown while the document holds a single empty block
const PLACEHOLDER: &str = "Start typing here...";

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let title = if app.deferred {
        "autocomplete-entry (deferred)"
    } else {
        "autocomplete-entry"
    };
    let editor = Block::default().borders(Borders::ALL).title(title);
    let inner = editor.inner(chunks[0]);
    app.set_editor_area(inner);

    let state = app.core.state();
    let content = state.content();
    let lines: Vec<Line> = if content.block_count() == 1 && content.first_block().is_empty() {
        vec![Line::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))]
    } else {
        content
            .blocks()
            .skip(app.scroll)
            .take(usize::from(inner.height))
            .map(|block| block_line(block, content, &app.decorator))
            .collect()
    };
    f.render_widget(Paragraph::new(lines).block(editor), chunks[0]);

    let focus = state.selection().focus;
    if let Some(row) = content
        .block_index(focus.block)
        .and_then(|index| index.checked_sub(app.scroll))
        .filter(|row| *row < usize::from(inner.height))
    {
        let column = focus.offset.min(usize::from(inner.width.saturating_sub(1)));
        f.set_cursor_position((inner.x + column as u16, inner.y + row as u16));
    }

    f.render_widget(status_line(), chunks[1]);

    draw_suggestions(f, app);
}

fn draw_suggestions(f: &mut Frame, app: &mut App) {
    let Some(view) = app.core.view() else {
        app.popup = None;
        return;
    };
    let area = popup_area(view.anchor, view.suggestions, f.area());
    let items: Vec<ListItem> = view
        .suggestions
        .iter()
        .map(|suggestion| ListItem::new(suggestion.clone()))
        .collect();
    let selection_index = view.selection_index;

    let frame = Block::default().borders(Borders::ALL);
    let list_area = frame.inner(area);
    let list = List::new(items)
        .block(frame)
        .style(Style::default().bg(Color::Gray).fg(Color::Black))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("> ");

    app.list_state.select(Some(selection_index));
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut app.list_state);

    app.popup = Some(PopupLayout {
        list_area,
        offset: app.list_state.offset(),
    });
}

/// Box for the suggestion list below `anchor`, kept inside `bounds`
pub fn popup_area(anchor: AnchorPoint, suggestions: &[String], bounds: Rect) -> Rect {
    let longest = suggestions
        .iter()
        .map(|suggestion| suggestion.chars().count())
        .max()
        .unwrap_or_default();
    // Borders plus the highlight symbol
    let width = u16::try_from(longest + 4)
        .unwrap_or(u16::MAX)
        .max(MIN_POPUP_WIDTH)
        .min(bounds.width);
    let rows = suggestions.len().min(MAX_VISIBLE_SUGGESTIONS) + 2;
    let height = u16::try_from(rows).unwrap_or(u16::MAX).min(bounds.height);

    let x = (anchor.left as u16)
        .min(bounds.right().saturating_sub(width))
        .max(bounds.x);
    let y = (anchor.top as u16)
        .min(bounds.bottom().saturating_sub(height))
        .max(bounds.y);

    Rect::new(x, y, width, height)
}

fn block_line<'a>(block: &TextBlock, content: &Content, decorator: &Decorator) -> Line<'a> {
    let spans: Vec<Span> = decorator
        .decorate(block, content)
        .into_iter()
        .map(|segment| {
            Span::styled(
                block.slice(segment.range),
                segment_style(segment.style, segment.decoration),
            )
        })
        .collect();
    Line::from(spans)
}

pub fn segment_style(style: InlineStyle, decoration: Option<&str>) -> Style {
    let mut result = Style::default();
    if style.bold {
        result = result.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        result = result.add_modifier(Modifier::ITALIC);
    }
    if style.underline {
        result = result.add_modifier(Modifier::UNDERLINED);
    }
    if style.code {
        result = result.fg(Color::Cyan);
    }

    match decoration {
        Some(AutocompleteEntryMatcher::NAME) => result.bg(Color::Blue).fg(Color::White),
        Some(TriggerMatcher::NAME) => result.fg(Color::Yellow),
        _ => result,
    }
}

fn status_line() -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::raw("Ctrl-Q: Quit | "),
        Span::raw("Ctrl-Z/Ctrl-Y: Undo/Redo | "),
        Span::raw("Ctrl-B: Bold | "),
        Span::raw("<>: Mention | Enter/Tab: Insert | Esc: Dismiss"),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use rstest::rstest;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[rstest]
    // Room below the anchor
    #[case(AnchorPoint { top: 2.0, left: 5.0 }, Rect::new(5, 2, 12, 4))]
    // Pushed left by the right edge
    #[case(AnchorPoint { top: 2.0, left: 35.0 }, Rect::new(28, 2, 12, 4))]
    // Pushed up by the bottom edge
    #[case(AnchorPoint { top: 9.0, left: 0.0 }, Rect::new(0, 6, 12, 4))]
    fn test_popup_area_stays_in_bounds(#[case] anchor: AnchorPoint, #[case] expected: Rect) {
        let bounds = Rect::new(0, 0, 40, 10);

        assert_eq!(popup_area(anchor, &words(&["ab", "abc"]), bounds), expected);
    }

    #[test]
    fn test_popup_area_caps_visible_rows() {
        let many: Vec<String> = (0..20).map(|i| format!("entry{i}")).collect();
        let area = popup_area(AnchorPoint::default(), &many, Rect::new(0, 0, 80, 40));

        assert_eq!(area.height, MAX_VISIBLE_SUGGESTIONS as u16 + 2);
    }

    #[test]
    fn test_segment_styles() {
        let bold = InlineStyle {
            bold: true,
            ..InlineStyle::default()
        };

        assert_eq!(
            segment_style(bold, None),
            Style::default().add_modifier(Modifier::BOLD)
        );
        assert_eq!(
            segment_style(InlineStyle::default(), Some(AutocompleteEntryMatcher::NAME)),
            Style::default().bg(Color::Blue).fg(Color::White)
        );
        assert_eq!(
            segment_style(InlineStyle::default(), Some(TriggerMatcher::NAME)),
            Style::default().fg(Color::Yellow)
        );
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_suggestions_drawn_below_trigger() {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let mut app = App::new(words(&["world", "word", "work"]), false);
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        app.after_draw();

        for c in "Hi <>wor".chars() {
            app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let popup = app.popup.unwrap();
        // Text starts at (1, 1); the trigger is three cells in, list below it
        assert_eq!(popup.list_area, Rect::new(5, 3, 10, 3));
        let rows: Vec<String> = screen(&terminal).lines().map(String::from).collect();
        assert!(rows[1].contains("Hi <>wor"));
        assert!(rows[3].contains("> world"));
        assert!(rows[4].contains("word"));
        assert!(rows[5].contains("work"));
    }

    #[test]
    fn test_no_popup_without_session() {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let mut app = App::new(words(&["world"]), false);

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        assert_eq!(app.popup, None);
    }

    #[test]
    fn test_placeholder_until_first_character() {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let mut app = App::new(words(&["world"]), false);

        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let rows: Vec<String> = screen(&terminal).lines().map(String::from).collect();
        assert!(rows[1].contains(PLACEHOLDER));
        assert_eq!(terminal.backend().buffer()[(1u16, 1u16)].fg, Color::DarkGray);

        app.on_key(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::NONE));
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let rows: Vec<String> = screen(&terminal).lines().map(String::from).collect();
        assert!(!rows[1].contains(PLACEHOLDER));
        assert!(rows[1].starts_with("│H "));
    }
}
