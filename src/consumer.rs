//! Segmenter — greedy tokenization of titles by an ordered rule table.
//!
//! At each position the rules are tried in priority order and the first one
//! that accepts claims a non-empty prefix as one segment.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::error::ParseError;
use crate::segment::{Bracket, ContextKey, SegmentKind, Segments, WordCategory};

// ASCII and full-width digit runs
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9０-９]+").unwrap());

static DEFAULT_RULES: Lazy<RuleTable> = Lazy::new(RuleTable::default);

/// Deepest bracket nesting parsed as brackets; openers below it are characters.
pub const MAX_BRACKET_DEPTH: usize = 32;

/// Opening and closing delimiter sets of one bracket kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPair {
    open: Vec<char>,
    close: Vec<char>,
}

impl BracketPair {
    /// Every character of `open` opens the pair, every character of `close`
    /// closes it.
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.chars().collect(),
            close: close.chars().collect(),
        }
    }

    fn opens(&self, c: char) -> bool {
        self.open.contains(&c)
    }

    fn closes(&self, c: char) -> bool {
        self.close.contains(&c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerRule {
    /// Literal words of one category.
    Word {
        category: WordCategory,
        words: Vec<String>,
    },
    /// Literal words resolved against their neighbours at comparison time.
    Contextual { key: ContextKey, words: Vec<String> },
    /// Bracketed span, interior segmented recursively.
    Bracket { pairs: Vec<BracketPair> },
    /// Maximal run of digits.
    Digit,
    /// Any single character; always accepts.
    Character,
}

fn match_word<'w>(words: &'w [String], rest: &str) -> Option<&'w str> {
    words
        .iter()
        .map(String::as_str)
        .find(|w| !w.is_empty() && rest.starts_with(w))
}

impl ConsumerRule {
    /// Try to claim a prefix of `rest`, appending the segment to `seq`.
    /// Returns the number of bytes consumed, or `None` if the rule declines.
    /// `depth` is the bracket nesting level of `seq`.
    fn consume(
        &self,
        table: &RuleTable,
        seq: &mut Segments,
        rest: &str,
        depth: usize,
    ) -> Result<Option<usize>, ParseError> {
        let consumed = match self {
            ConsumerRule::Word { category, words } => match_word(words, rest).map(|w| {
                seq.push(w, SegmentKind::Word(*category));
                w.len()
            }),
            ConsumerRule::Contextual { key, words } => match_word(words, rest).map(|w| {
                seq.push(w, SegmentKind::Contextual(*key));
                w.len()
            }),
            ConsumerRule::Bracket { pairs } => return consume_bracket(pairs, table, seq, rest, depth),
            ConsumerRule::Digit => DIGIT_RUN.find(rest).map(|m| {
                seq.push(m.as_str(), SegmentKind::Digit);
                m.end()
            }),
            ConsumerRule::Character => rest.chars().next().map(|c| {
                seq.push(c, SegmentKind::Character);
                c.len_utf8()
            }),
        };
        Ok(consumed)
    }
}

fn consume_bracket(
    pairs: &[BracketPair],
    table: &RuleTable,
    seq: &mut Segments,
    rest: &str,
    depth: usize,
) -> Result<Option<usize>, ParseError> {
    if depth >= table.max_depth {
        return Ok(None);
    }
    let mut chars = rest.chars();
    // A lone opener at the end of input is an ordinary character.
    let (Some(open), Some(_)) = (chars.next(), chars.next()) else {
        return Ok(None);
    };
    let Some(pair) = pairs.iter().find(|p| p.opens(open)) else {
        return Ok(None);
    };

    let interior = &rest[open.len_utf8()..];
    let mut children = Segments::new();
    let inner = table.parse_into(&mut children, interior, Some(pair), depth + 1)?;
    // parse_into stops on a closer or at end of input
    let close = interior[inner..].chars().next();
    let end = open.len_utf8() + inner + close.map_or(0, char::len_utf8);

    seq.push(
        &rest[..end],
        SegmentKind::Bracket(Bracket {
            open: open.to_string(),
            close: close.map(String::from).unwrap_or_default(),
            children,
        }),
    );
    Ok(Some(end))
}

/// Ordered, immutable list of consumer rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<ConsumerRule>,
    max_depth: usize,
}

impl RuleTable {
    /// Build a table from rules in priority order. A table whose last rule is
    /// not [`ConsumerRule::Character`] may fail with [`ParseError`].
    pub fn new(rules: Vec<ConsumerRule>) -> Self {
        Self {
            rules,
            max_depth: MAX_BRACKET_DEPTH,
        }
    }

    /// Limit bracket nesting; deeper openers are segmented by later rules.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn rules(&self) -> &[ConsumerRule] {
        &self.rules
    }

    /// Split `input` into segments covering it exactly.
    pub fn segment(&self, input: &str) -> Result<Segments, ParseError> {
        let mut seq = Segments::new();
        self.parse_into(&mut seq, input, None, 0)?;
        trace!(input, segments = seq.len(), "segmented title");
        Ok(seq)
    }

    /// Segment `input` into `seq` until it is exhausted or, inside a bracket,
    /// a closing delimiter of `closer` is reached. Returns bytes consumed.
    fn parse_into(
        &self,
        seq: &mut Segments,
        input: &str,
        closer: Option<&BracketPair>,
        depth: usize,
    ) -> Result<usize, ParseError> {
        let mut offset = 0;
        while let Some(c) = input[offset..].chars().next() {
            if closer.is_some_and(|p| p.closes(c)) {
                break;
            }
            offset += self.consume_one(seq, &input[offset..], depth)?;
        }
        Ok(offset)
    }

    fn consume_one(&self, seq: &mut Segments, rest: &str, depth: usize) -> Result<usize, ParseError> {
        for rule in &self.rules {
            if let Some(consumed) = rule.consume(self, seq, rest, depth)? {
                return Ok(consumed);
            }
        }
        Err(ParseError::NoRuleAccepted {
            remaining: rest.to_string(),
        })
    }
}

/// Segment `input` with the default rule table.
pub fn segment(input: &str) -> Result<Segments, ParseError> {
    DEFAULT_RULES.segment(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(seq: &Segments) -> Vec<&SegmentKind> {
        seq.iter().map(|s| s.kind()).collect()
    }

    #[test]
    fn test_era_title() {
        let seq = segment("平成30年静岡").unwrap();
        assert_eq!(seq.values(), vec!["平成", "30", "年", "静", "岡"]);
        assert_eq!(
            kinds(&seq)[..3],
            [
                &SegmentKind::Word(WordCategory::Era),
                &SegmentKind::Digit,
                &SegmentKind::Character,
            ]
        );
    }

    #[test]
    fn test_contextual_tokens() {
        let seq = segment("平成元年").unwrap();
        assert_eq!(seq[1].kind(), &SegmentKind::Contextual(ContextKey::YearOne));

        let seq = segment("Ｈ３０年").unwrap();
        assert_eq!(seq.values(), vec!["Ｈ", "３０", "年"]);
        assert_eq!(seq[0].kind(), &SegmentKind::Contextual(ContextKey::EraAlphabet));
    }

    #[test]
    fn test_bracket_children() {
        let seq = segment("人口(H30)統計").unwrap();
        assert_eq!(seq.values(), vec!["人", "口", "(H30)", "統", "計"]);
        let SegmentKind::Bracket(bracket) = seq[2].kind() else {
            panic!("expected bracket, got {:?}", seq[2].kind());
        };
        assert_eq!(bracket.open, "(");
        assert_eq!(bracket.close, ")");
        assert_eq!(bracket.children.values(), vec!["H", "30"]);
    }

    #[test]
    fn test_full_width_bracket_and_nesting() {
        let seq = segment("（a(b)c）").unwrap();
        assert_eq!(seq.len(), 1);
        let SegmentKind::Bracket(outer) = seq[0].kind() else {
            panic!("expected bracket");
        };
        assert_eq!(outer.close, "）");
        assert_eq!(outer.children.values(), vec!["a", "(b)", "c"]);
    }

    #[test]
    fn test_unclosed_bracket_runs_to_end() {
        let seq = segment("統計(令和2年").unwrap();
        let SegmentKind::Bracket(bracket) = seq[2].kind() else {
            panic!("expected bracket");
        };
        assert_eq!(seq[2].value(), "(令和2年");
        assert_eq!(bracket.close, "");
        assert_eq!(bracket.children.values(), vec!["令和", "2", "年"]);
    }

    #[test]
    fn test_lone_opener_and_empty_bracket() {
        let seq = segment("a(").unwrap();
        assert_eq!(seq[1].kind(), &SegmentKind::Character);

        let seq = segment("()").unwrap();
        let SegmentKind::Bracket(bracket) = seq[0].kind() else {
            panic!("expected bracket");
        };
        assert!(bracket.children.is_empty());
    }

    #[test]
    fn test_stray_closer_is_character() {
        let seq = segment("a)b").unwrap();
        assert_eq!(seq.values(), vec!["a", ")", "b"]);
    }

    fn nesting_depth(seq: &Segments) -> usize {
        seq.iter()
            .map(|s| match s.kind() {
                SegmentKind::Bracket(b) => 1 + nesting_depth(&b.children),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_deep_nesting_is_capped() {
        let input = "(".repeat(3000);
        let seq = segment(&input).unwrap();
        assert_eq!(seq.concat(), input);
        assert_eq!(seq.len(), 1);
        assert_eq!(nesting_depth(&seq), MAX_BRACKET_DEPTH);
    }

    #[test]
    fn test_custom_max_depth() {
        let table = RuleTable::default().with_max_depth(1);
        let seq = table.segment("((a))").unwrap();
        let SegmentKind::Bracket(outer) = seq[0].kind() else {
            panic!("expected bracket");
        };
        assert_eq!(outer.children.values(), vec!["(", "a"]);
        assert_eq!(outer.close, ")");
        assert_eq!(seq.values(), vec!["((a)", ")"]);

        let flat = RuleTable::default().with_max_depth(0).segment("(a)").unwrap();
        assert_eq!(flat.values(), vec!["(", "a", ")"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_catch_all_is_parse_error() {
        let table = RuleTable::new(vec![ConsumerRule::Digit]);
        let err = table.segment("12年").unwrap_err();
        assert_eq!(
            err,
            ParseError::NoRuleAccepted {
                remaining: "年".to_string()
            }
        );
    }

    #[test]
    fn test_custom_table_priority() {
        let table = RuleTable::new(vec![
            ConsumerRule::Word {
                category: WordCategory::Era,
                words: vec!["大正".to_string()],
            },
            ConsumerRule::Character,
        ]);
        let seq = table.segment("大正12").unwrap();
        assert_eq!(seq.values(), vec!["大正", "1", "2"]);
    }

    proptest! {
        #[test]
        fn prop_segments_cover_input(input in "\\PC{0,40}") {
            let seq = segment(&input).unwrap();
            prop_assert_eq!(seq.concat(), input);
        }

        #[test]
        fn prop_segments_cover_title_alphabet(
            parts in prop::collection::vec(
                prop::sample::select(vec!["平成", "元", "H", "Ｓ", ".", "30", "１", "(", "）", "年", "静"]),
                0..12,
            )
        ) {
            let input = parts.concat();
            let seq = segment(&input).unwrap();
            prop_assert_eq!(seq.concat(), input);
        }
    }
}
