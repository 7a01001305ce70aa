//! Contextual resolution — reinterpreting a segment by its neighbours.
//!
//! Resolution happens at comparison time because a contextual segment may
//! depend on a segment parsed after it.

use crate::segment::{Bracket, ContextKey, SegmentKind, Segments, WordCategory};

/// How a segment takes part in a distance computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// Compared character by character.
    Literal,
    Word(WordCategory),
    Digit,
    Bracket(&'a Bracket),
}

type Resolver = fn(&Segments, usize) -> Option<Resolved<'static>>;

static RESOLVERS: &[(ContextKey, Resolver)] = &[
    (ContextKey::YearOne, year_one),
    (ContextKey::EraAlphabet, era_alphabet),
];

/// "元" counts as a year only right after an era word.
///
/// Only a literal era `Word` qualifies; a preceding contextual segment is
/// not resolved first.
fn year_one(seq: &Segments, index: usize) -> Option<Resolved<'static>> {
    let prev = &seq[seq[index].prev()?];
    match prev.kind() {
        SegmentKind::Word(WordCategory::Era) => Some(Resolved::Digit),
        _ => None,
    }
}

/// An era letter counts as an era word when a short year follows it,
/// optionally after a single ".".
fn era_alphabet(seq: &Segments, index: usize) -> Option<Resolved<'static>> {
    let mut next = &seq[seq[index].next()?];
    if matches!(next.kind(), SegmentKind::Character) && next.value() == "." {
        next = &seq[next.next()?];
    }
    match next.kind() {
        SegmentKind::Digit if next.len() <= 2 => Some(Resolved::Word(WordCategory::EraAlphabet)),
        _ => None,
    }
}

/// Apply the rule registered for `key` to the segment at `index`.
pub fn resolve_contextual(key: ContextKey, seq: &Segments, index: usize) -> Option<Resolved<'static>> {
    RESOLVERS
        .iter()
        .find(|(k, _)| *k == key)
        .and_then(|(_, rule)| rule(seq, index))
}

/// Classify the segment at `index` for comparison purposes.
pub fn resolve(seq: &Segments, index: usize) -> Resolved<'_> {
    match seq[index].kind() {
        SegmentKind::Character => Resolved::Literal,
        SegmentKind::Word(category) => Resolved::Word(*category),
        SegmentKind::Digit => Resolved::Digit,
        SegmentKind::Bracket(bracket) => Resolved::Bracket(bracket),
        SegmentKind::Contextual(key) => {
            resolve_contextual(*key, seq, index).unwrap_or(Resolved::Literal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(parts: &[(&str, SegmentKind)]) -> Segments {
        let mut s = Segments::new();
        for (v, k) in parts {
            s.push(*v, k.clone());
        }
        s
    }

    const ERA: SegmentKind = SegmentKind::Word(WordCategory::Era);
    const YEAR_ONE: SegmentKind = SegmentKind::Contextual(ContextKey::YearOne);
    const ALPHA: SegmentKind = SegmentKind::Contextual(ContextKey::EraAlphabet);

    #[test]
    fn test_year_one_after_era() {
        let s = seq(&[("平成", ERA), ("元", YEAR_ONE), ("年", SegmentKind::Character)]);
        assert_eq!(resolve(&s, 1), Resolved::Digit);
    }

    #[test]
    fn test_year_one_without_era() {
        let s = seq(&[("紀", SegmentKind::Character), ("元", YEAR_ONE)]);
        assert_eq!(resolve(&s, 1), Resolved::Literal);

        let first = seq(&[("元", YEAR_ONE)]);
        assert_eq!(resolve(&first, 0), Resolved::Literal);
    }

    #[test]
    fn test_year_one_after_unresolved_contextual() {
        // An era letter resolving to a word does not make "元" a year.
        let s = seq(&[("H", ALPHA), ("元", YEAR_ONE)]);
        assert_eq!(resolve(&s, 1), Resolved::Literal);
    }

    #[test]
    fn test_era_alphabet_before_short_year() {
        let s = seq(&[("H", ALPHA), ("30", SegmentKind::Digit)]);
        assert_eq!(resolve(&s, 0), Resolved::Word(WordCategory::EraAlphabet));
    }

    #[test]
    fn test_era_alphabet_skips_one_dot() {
        let s = seq(&[
            ("S", ALPHA),
            (".", SegmentKind::Character),
            ("63", SegmentKind::Digit),
        ]);
        assert_eq!(resolve(&s, 0), Resolved::Word(WordCategory::EraAlphabet));
    }

    #[test]
    fn test_era_alphabet_rejects_long_number() {
        let s = seq(&[("R", ALPHA), ("2020", SegmentKind::Digit)]);
        assert_eq!(resolve(&s, 0), Resolved::Literal);

        let trailing = seq(&[("R", ALPHA)]);
        assert_eq!(resolve(&trailing, 0), Resolved::Literal);

        let dot_only = seq(&[("R", ALPHA), (".", SegmentKind::Character)]);
        assert_eq!(resolve(&dot_only, 0), Resolved::Literal);
    }
}
