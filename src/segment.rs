//! Segment model — classified tokens of a parsed dataset title.
//!
//! A title is held as one owned, append-only [`Segments`] list. Neighbour
//! links are indices into that list, so a sequence has no ownership cycles
//! and can be cloned or serialized freely.

use serde::Serialize;

/// Word categories whose members are interchangeable when comparing titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCategory {
    /// Japanese era names (昭和, 平成, 令和).
    Era,
    /// Single-letter era abbreviations followed by a year (H30, S.63).
    EraAlphabet,
}

/// Tag of a contextual segment; selects its resolution rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKey {
    /// "元" as the first year of an era.
    YearOne,
    /// Era abbreviation letters.
    EraAlphabet,
}

/// A bracketed span and the segments parsed from its interior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bracket {
    pub open: String,
    /// Empty when the input ended before a closing delimiter.
    pub close: String,
    pub children: Segments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SegmentKind {
    Character,
    Word(WordCategory),
    Digit,
    Bracket(Bracket),
    Contextual(ContextKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    value: String,
    len: usize,
    prev: Option<usize>,
    next: Option<usize>,
    kind: SegmentKind,
}

impl Segment {
    /// The substring of the input this segment covers.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Length of [`Segment::value`] in code points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }
}

/// Ordered segments of one string (or of one bracket interior).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Segments {
    items: Vec<Segment>,
}

impl Segments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, linking it to the current tail. Returns its index.
    pub fn push(&mut self, value: impl Into<String>, kind: SegmentKind) -> usize {
        let value = value.into();
        let index = self.items.len();
        let prev = index.checked_sub(1);
        if let Some(p) = prev {
            self.items[p].next = Some(index);
        }
        self.items.push(Segment {
            len: value.chars().count(),
            value,
            prev,
            next: None,
            kind,
        });
        index
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.items.get(index)
    }

    pub fn last(&self) -> Option<&Segment> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.items.iter()
    }

    /// Total length of all segment values in code points.
    pub fn char_len(&self) -> usize {
        self.items.iter().map(|s| s.len).sum()
    }

    pub fn values(&self) -> Vec<&str> {
        self.items.iter().map(|s| s.value.as_str()).collect()
    }

    /// Concatenation of all values; equals the segmented input.
    pub fn concat(&self) -> String {
        self.items.iter().map(|s| s.value.as_str()).collect()
    }
}

impl std::ops::Index<usize> for Segments {
    type Output = Segment;

    fn index(&self, index: usize) -> &Segment {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
