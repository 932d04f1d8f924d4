/*!
# Entity Decorators

Render strategies that tag parts of a block so a host can draw them
differently. A [`Decorator`] runs its registered [`EntityMatcher`]s over a
block and splits it into consecutive [`Segment`]s.

## Matchers

- **`AutocompleteEntryMatcher`**: committed suggestions (`AUTOCOMPLETE_ENTRY` entities)
- **`TriggerMatcher`**: every free-standing `<>` in the text

## Overlap

Matchers are consulted in registration order. A range is dropped if any of
its characters was already claimed by an earlier range.
*/

use std::ops::Range;

use crate::autocomplete::{AUTOCOMPLETE_ENTRY, TRIGGER};
use crate::document::{Block, Content, InlineStyle};

/// Finds the ranges of a block one decoration applies to
pub trait EntityMatcher {
    fn name(&self) -> &'static str;

    /// Character ranges in ascending order
    fn find_ranges(&self, block: &Block, content: &Content) -> Vec<Range<usize>>;
}

/// Matches text committed from the suggestion list
#[derive(Copy, Clone, Debug, Default)]
pub struct AutocompleteEntryMatcher;

impl AutocompleteEntryMatcher {
    pub const NAME: &'static str = "autocomplete-entry";
}

impl EntityMatcher for AutocompleteEntryMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn find_ranges(&self, block: &Block, content: &Content) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut offset = 0;
        while offset < block.len() {
            match block.entity_range(offset) {
                Some(range) => {
                    let is_entry = block
                        .entity_at(offset)
                        .and_then(|key| content.entity(key))
                        .is_some_and(|entity| entity.kind == AUTOCOMPLETE_ENTRY);
                    offset = range.end;
                    if is_entry {
                        ranges.push(range);
                    }
                }
                None => offset += 1,
            }
        }
        ranges
    }
}

/// Matches trigger sequences that are not part of an entity
#[derive(Copy, Clone, Debug, Default)]
pub struct TriggerMatcher;

impl TriggerMatcher {
    pub const NAME: &'static str = "trigger";
}

impl EntityMatcher for TriggerMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn find_ranges(&self, block: &Block, _content: &Content) -> Vec<Range<usize>> {
        let trigger: Vec<char> = TRIGGER.chars().collect();
        let text: Vec<char> = block.text_cow().chars().collect();
        let mut ranges = Vec::new();
        let mut offset = 0;
        while offset + trigger.len() <= text.len() {
            let range = offset..offset + trigger.len();
            let free = range.clone().all(|i| block.entity_at(i).is_none());
            if text[range.clone()] == trigger[..] && free {
                offset = range.end;
                ranges.push(range);
            } else {
                offset += 1;
            }
        }
        ranges
    }
}

/// A stretch of a block with uniform decoration and style
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub range: Range<usize>,
    pub decoration: Option<&'static str>,
    pub style: InlineStyle,
}

/// Ordered set of matchers applied to every block
pub struct Decorator {
    matchers: Vec<Box<dyn EntityMatcher>>,
}

impl Default for Decorator {
    fn default() -> Self {
        Self::new(vec![
            Box::new(AutocompleteEntryMatcher),
            Box::new(TriggerMatcher),
        ])
    }
}

impl std::fmt::Debug for Decorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.matchers.iter().map(|m| m.name()).collect();
        f.debug_struct("Decorator").field("matchers", &names).finish()
    }
}

impl Decorator {
    pub fn new(matchers: Vec<Box<dyn EntityMatcher>>) -> Self {
        Self { matchers }
    }

    /// Split `block` into segments covering every character
    ///
    /// A new segment starts wherever the decoration, the matched range or the
    /// inline style changes. An empty block yields no segments.
    pub fn decorate(&self, block: &Block, content: &Content) -> Vec<Segment> {
        let len = block.len();
        // (matcher index, range index) claiming each character
        let mut claims: Vec<Option<(usize, usize)>> = vec![None; len];

        for (matcher_index, matcher) in self.matchers.iter().enumerate() {
            for (range_index, range) in matcher.find_ranges(block, content).into_iter().enumerate()
            {
                let range = range.start.min(len)..range.end.min(len);
                if claims[range.clone()].iter().any(Option::is_some) {
                    continue;
                }
                for claim in &mut claims[range] {
                    *claim = Some((matcher_index, range_index));
                }
            }
        }

        let mut segments: Vec<Segment> = Vec::new();
        let mut start = 0;
        for offset in 1..=len {
            let boundary = offset == len
                || claims[offset] != claims[start]
                || block.style_at(offset) != block.style_at(start);
            if boundary {
                segments.push(Segment {
                    range: start..offset,
                    decoration: claims[start].map(|(index, _)| self.matchers[index].name()),
                    style: block.style_at(start).unwrap_or_default(),
                });
                start = offset;
            }
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Mutability, TextRange};
    use pretty_assertions::assert_eq;

    fn with_entry(text: &str, range: Range<usize>, word: &str) -> Content {
        let content = Content::from_text(text);
        let key = content.first_block().key();
        let (content, entity) = content.create_entity(AUTOCOMPLETE_ENTRY, Mutability::Immutable);
        content
            .replace_text(
                TextRange::new(key, range.start, range.end),
                word,
                InlineStyle::default(),
                Some(entity),
            )
            .unwrap()
    }

    /// Compact rendering: `[name:text]` for decorated segments
    fn render(content: &Content) -> String {
        let block = content.first_block();
        Decorator::default()
            .decorate(block, content)
            .into_iter()
            .map(|segment| {
                let text = block.slice(segment.range);
                match segment.decoration {
                    Some(name) => format!("[{name}:{text}]"),
                    None => text,
                }
            })
            .collect()
    }

    #[test]
    fn test_entry_matcher_finds_committed_text() {
        let content = with_entry("Hello <>wor!", 6..11, "work");
        let ranges = AutocompleteEntryMatcher.find_ranges(content.first_block(), &content);

        assert_eq!(ranges, vec![6..10]);
    }

    #[test]
    fn test_adjacent_entries_stay_separate() {
        let content = with_entry("<>a", 0..3, "alpha");
        let key = content.first_block().key();
        let (content, entity) = content.create_entity(AUTOCOMPLETE_ENTRY, Mutability::Immutable);
        let content = content
            .replace_text(
                TextRange::collapsed(key, 5),
                "beta",
                InlineStyle::default(),
                Some(entity),
            )
            .unwrap();

        let ranges = AutocompleteEntryMatcher.find_ranges(content.first_block(), &content);

        assert_eq!(ranges, vec![0..5, 5..9]);
        assert_eq!(render(&content), "[autocomplete-entry:alpha][autocomplete-entry:beta]");
    }

    #[test]
    fn test_other_entity_kinds_are_ignored() {
        let content = Content::from_text("link");
        let key = content.first_block().key();
        let (content, entity) = content.create_entity("LINK", Mutability::Mutable);
        let content = content
            .replace_text(
                TextRange::new(key, 0, 4),
                "link",
                InlineStyle::default(),
                Some(entity),
            )
            .unwrap();

        assert!(
            AutocompleteEntryMatcher
                .find_ranges(content.first_block(), &content)
                .is_empty()
        );
    }

    #[test]
    fn test_trigger_matcher_finds_every_free_trigger() {
        let content = Content::from_text("<>a <><> <b");
        let ranges = TriggerMatcher.find_ranges(content.first_block(), &content);

        assert_eq!(ranges, vec![0..2, 4..6, 6..8]);
    }

    #[test]
    fn test_segments_cover_block() {
        let content = with_entry("Hi <>wo and <>x", 3..7, "world");

        insta::assert_snapshot!(render(&content), @"Hi [autocomplete-entry:world] and [trigger:<>]x");
    }

    #[test]
    fn test_style_change_splits_segment() {
        let state = crate::document::EditorState::new(Content::from_text("ab"))
            .toggle_style(crate::document::StyleFlag::Bold)
            .insert_text("cd");
        let content = state.content();
        let segments = Decorator::default().decorate(content.first_block(), content);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].range, 0..2);
        assert_eq!(segments[1].range, 2..4);
        assert!(segments[1].style.bold);
        assert_eq!(segments[1].decoration, None);
    }

    #[test]
    fn test_first_matcher_wins_on_overlap() {
        struct Everything;
        impl EntityMatcher for Everything {
            fn name(&self) -> &'static str {
                "everything"
            }
            fn find_ranges(&self, block: &Block, _content: &Content) -> Vec<Range<usize>> {
                vec![0..block.len()]
            }
        }

        let content = Content::from_text("a <> b");
        let decorator = Decorator::new(vec![Box::new(Everything), Box::new(TriggerMatcher)]);
        let segments = decorator.decorate(content.first_block(), &content);

        assert_eq!(
            segments,
            vec![Segment {
                range: 0..6,
                decoration: Some("everything"),
                style: InlineStyle::default(),
            }]
        );
    }

    #[test]
    fn test_empty_block_has_no_segments() {
        let content = Content::from_text("");

        assert!(Decorator::default().decorate(content.first_block(), &content).is_empty());
    }
}
