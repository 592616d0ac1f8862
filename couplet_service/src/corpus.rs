// Corpus loading: turns a file into a flat list of raw lines.
//
// Two formats:
// - `.json`: an array whose items are strings, or objects holding the line
//   under a named column (`{"lyric_line": "..."}`). Null items and objects
//   missing the column are skipped.
// - anything else: plain text, one line per line.
//
// Blank lines are dropped in both formats. No cleaning happens here; the
// engine normalizes lines itself.
//
// `check_coverage` measures how many of a corpus's words the dictionary can
// pronounce and warns when it is under half, which is what the small
// embedded dictionary gives on real text.

use std::path::Path;

use couplet_phonetics::{PhoneticDictionary, Tokenizer, WordTokenizer};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ServiceError;

/// Load the raw lines of a corpus file. `column` selects the field when a
/// JSON corpus holds objects.
pub fn load_corpus(path: &Path, column: Option<&str>) -> Result<Vec<String>, ServiceError> {
    let text = std::fs::read_to_string(path).map_err(|source| ServiceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let lines = if is_json {
        parse_json_corpus(&text, column).map_err(|reason| ServiceError::Corpus {
            path: path.display().to_string(),
            reason,
        })?
    } else {
        parse_text_corpus(&text)
    };
    if lines.is_empty() {
        warn!(path = %path.display(), "corpus has no lines");
    }
    info!(path = %path.display(), lines = lines.len(), "loaded corpus");
    Ok(lines)
}

/// Below this share of known words a corpus is reported as poorly covered.
pub const LOW_COVERAGE: f64 = 0.5;

/// Share of word tokens in `lines` with at least one pronunciation, or
/// `None` for a corpus without words.
pub fn dictionary_coverage<D, S>(dictionary: &D, lines: &[S]) -> Option<f64>
where
    D: PhoneticDictionary + ?Sized,
    S: AsRef<str>,
{
    let mut known = 0usize;
    let mut total = 0usize;
    for line in lines {
        for word in WordTokenizer.tokenize(&line.as_ref().to_lowercase()) {
            total += 1;
            if !dictionary.pronunciations(&word).is_empty() {
                known += 1;
            }
        }
    }
    (total > 0).then(|| known as f64 / total as f64)
}

/// Log the coverage of one corpus, warning when it is below `LOW_COVERAGE`.
pub fn check_coverage<D, S>(label: &str, dictionary: &D, lines: &[S]) -> Option<f64>
where
    D: PhoneticDictionary + ?Sized,
    S: AsRef<str>,
{
    let coverage = dictionary_coverage(dictionary, lines)?;
    let percent = (coverage * 100.0).round() as u32;
    if coverage < LOW_COVERAGE {
        warn!(
            corpus = label,
            known_words_pct = percent,
            "most words are missing from the dictionary; pass --dict with a full CMU dictionary"
        );
    } else {
        info!(corpus = label, known_words_pct = percent, "dictionary coverage");
    }
    Some(coverage)
}

fn parse_text_corpus(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_json_corpus(text: &str, column: Option<&str>) -> Result<Vec<String>, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err("expected a JSON array of lines".to_string());
    };
    let mut lines = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let line = match item {
            Value::String(s) => s,
            Value::Null => continue,
            Value::Object(mut fields) => {
                let Some(column) = column else {
                    return Err(format!("item {i} is an object but no column was given"));
                };
                match fields.remove(column) {
                    Some(Value::String(s)) => s,
                    Some(Value::Null) | None => continue,
                    Some(other) => {
                        return Err(format!("item {i}: column '{column}' holds {other}"));
                    }
                }
            }
            other => return Err(format!("item {i}: expected a string, got {other}")),
        };
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use couplet_phonetics::default_dictionary;

    #[test]
    fn text_corpus_skips_blank_lines() {
        let lines = parse_text_corpus("first line\n\n   \n  second line  \n");
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn json_array_of_strings() {
        let lines = parse_json_corpus(r#"["one", "", null, "two"]"#, None).unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn json_objects_with_column() {
        let json = r#"[
            {"lyric_line": "stay up all night", "album": "x"},
            {"album": "no line here"},
            {"lyric_line": null},
            {"lyric_line": "counting my blessings"}
        ]"#;
        let lines = parse_json_corpus(json, Some("lyric_line")).unwrap();
        assert_eq!(lines, vec!["stay up all night", "counting my blessings"]);
    }

    #[test]
    fn json_objects_without_column_rejected() {
        let err = parse_json_corpus(r#"[{"lyric_line": "x"}]"#, None).unwrap_err();
        assert!(err.contains("no column"), "{err}");
    }

    #[test]
    fn json_non_array_rejected() {
        assert!(parse_json_corpus(r#"{"lines": []}"#, None).is_err());
        assert!(parse_json_corpus("[1, 2]", None).is_err());
        assert!(parse_json_corpus("not json", None).is_err());
    }

    #[test]
    fn coverage_counts_known_words() {
        let dict = default_dictionary();
        let lines = ["we stay up all night", "zyzzyva quokka night"];
        // 5 of 5, then 1 of 3.
        let coverage = dictionary_coverage(&dict, &lines).unwrap();
        assert!((coverage - 6.0 / 8.0).abs() < 1e-9, "{coverage}");
        assert_eq!(check_coverage("a", &dict, &lines), Some(coverage));
    }

    #[test]
    fn coverage_of_unknown_text_is_low() {
        let dict = default_dictionary();
        let lines = ["zyzzyva quokka axolotl", "!!! ..."];
        assert_eq!(dictionary_coverage(&dict, &lines), Some(0.0));
        assert!(check_coverage("b", &dict, &lines).unwrap() < LOW_COVERAGE);
    }

    #[test]
    fn coverage_of_wordless_corpus_is_none() {
        let dict = default_dictionary();
        let empty: [&str; 0] = [];
        assert_eq!(dictionary_coverage(&dict, &empty), None);
        assert_eq!(dictionary_coverage(&dict, &["..."]), None);
    }

    #[test]
    fn json_column_with_wrong_type_rejected() {
        let err = parse_json_corpus(r#"[{"line": 5}]"#, Some("line")).unwrap_err();
        assert!(err.contains("column 'line'"), "{err}");
    }
}
