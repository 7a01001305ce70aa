//! Generates the default segmentation tables from config/segment_rules.toml.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const RULES_PATH: &str = "config/segment_rules.toml";

fn string_list(table: &toml::Table, section: &str) -> Vec<String> {
    table
        .get(section)
        .and_then(|s| s.get("words"))
        .and_then(|w| w.as_array())
        .unwrap_or_else(|| panic!("{RULES_PATH}: [{section}] needs a `words` array"))
        .iter()
        .map(|v| {
            v.as_str()
                .unwrap_or_else(|| panic!("{RULES_PATH}: [{section}] words must be strings"))
                .to_string()
        })
        .collect()
}

fn bracket_pairs(table: &toml::Table) -> Vec<(String, String)> {
    let Some(entries) = table.get("bracket").and_then(|b| b.as_array()) else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| {
            let field = |key: &str| {
                entry
                    .get(key)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| panic!("{RULES_PATH}: [[bracket]] needs a non-empty `{key}`"))
                    .to_string()
            };
            (field("open"), field("close"))
        })
        .collect()
}

fn emit_list(out: &mut String, name: &str, words: &[String]) {
    writeln!(out, "pub(crate) const {name}: &[&str] = &{words:?};").unwrap();
}

fn main() {
    println!("cargo:rerun-if-changed={RULES_PATH}");

    let text = fs::read_to_string(RULES_PATH)
        .unwrap_or_else(|e| panic!("cannot read {RULES_PATH}: {e}"));
    let table: toml::Table =
        toml::from_str(&text).unwrap_or_else(|e| panic!("cannot parse {RULES_PATH}: {e}"));

    let mut out = String::from("// @generated by build.rs from config/segment_rules.toml\n");
    emit_list(&mut out, "ERA_WORDS", &string_list(&table, "era"));
    emit_list(&mut out, "YEAR_ONE_WORDS", &string_list(&table, "year_one"));
    emit_list(&mut out, "ERA_ALPHABET_WORDS", &string_list(&table, "era_alphabet"));
    writeln!(
        out,
        "pub(crate) const BRACKET_PAIRS: &[(&str, &str)] = &{:?};",
        bracket_pairs(&table)
    )
    .unwrap();

    let dest = Path::new(&env::var("OUT_DIR").unwrap()).join("segment_rules.rs");
    fs::write(dest, out).unwrap();
}
