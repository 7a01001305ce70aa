//! Classifier configuration and the default rule table.
//!
//! Token tables are generated at build time from `config/segment_rules.toml`.

use crate::consumer::{BracketPair, ConsumerRule, RuleTable};
use crate::segment::{ContextKey, WordCategory};

include!(concat!(env!("OUT_DIR"), "/segment_rules.rs"));

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for RuleTable {
    /// Era words, "元", era letters, brackets, digits, then single characters.
    fn default() -> Self {
        RuleTable::new(vec![
            ConsumerRule::Word {
                category: WordCategory::Era,
                words: owned(ERA_WORDS),
            },
            ConsumerRule::Contextual {
                key: ContextKey::YearOne,
                words: owned(YEAR_ONE_WORDS),
            },
            ConsumerRule::Contextual {
                key: ContextKey::EraAlphabet,
                words: owned(ERA_ALPHABET_WORDS),
            },
            ConsumerRule::Bracket {
                pairs: BRACKET_PAIRS
                    .iter()
                    .map(|(open, close)| BracketPair::new(open, close))
                    .collect(),
            },
            ConsumerRule::Digit,
            ConsumerRule::Character,
        ])
    }
}

/// Settings for one classification run.
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    /// Rules used to segment titles.
    pub rules: RuleTable,
    /// Largest title distance at which two same-host records are grouped.
    pub similarity_threshold: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            rules: RuleTable::default(),
            similarity_threshold: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_order() {
        let table = RuleTable::default();
        let rules = table.rules();
        assert_eq!(rules.len(), 6);
        assert!(matches!(
            &rules[0],
            ConsumerRule::Word { category: WordCategory::Era, words } if words.len() == 3
        ));
        assert!(matches!(&rules[1], ConsumerRule::Contextual { key: ContextKey::YearOne, .. }));
        assert!(matches!(&rules[2], ConsumerRule::Contextual { key: ContextKey::EraAlphabet, .. }));
        assert!(matches!(&rules[3], ConsumerRule::Bracket { .. }));
        assert_eq!(rules[4], ConsumerRule::Digit);
        assert_eq!(rules[5], ConsumerRule::Character);
    }

    #[test]
    fn test_generated_tables() {
        assert_eq!(ERA_WORDS, &["昭和", "平成", "令和"]);
        assert_eq!(YEAR_ONE_WORDS, &["元"]);
        assert_eq!(ERA_ALPHABET_WORDS.len(), 6);
        assert_eq!(BRACKET_PAIRS, &[("(（", ")）")]);
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(SeriesConfig::default().similarity_threshold, 0);
    }
}
