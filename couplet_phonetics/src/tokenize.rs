// Word tokenization for syllable counting and rhyme-key extraction.
//
// `Tokenizer` is the capability the phonetic index depends on; any splitter
// can be plugged in. `WordTokenizer` is the default: it splits on whitespace,
// peels surrounding punctuation, and separates English clitics ("world's" ->
// "world", "'s"; "don't" -> "do", "n't") the way treebank-style tokenizers
// do, so that each piece can be looked up in a pronouncing dictionary.
//
// Punctuation-only pieces are dropped rather than emitted as tokens. This
// keeps the last token of a line a real word, which is what the rhyme key
// needs.

/// Splits text into word tokens.
pub trait Tokenizer {
    /// Split `text` into tokens, in order. The phonetic index passes
    /// lowercased text.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Clitic suffixes split off into their own tokens, longest first.
const CLITICS: &[&str] = &["n't", "'re", "'ve", "'ll", "'s", "'d", "'m"];

/// Whitespace and punctuation tokenizer with clitic splitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            let chunk = chunk.replace('\u{2019}', "'");
            let word = chunk
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_end_matches('\'');
            if !word.chars().any(char::is_alphanumeric) {
                continue;
            }
            match split_clitic(word) {
                Some((stem, clitic)) => {
                    tokens.push(stem.to_string());
                    tokens.push(clitic.to_string());
                }
                None => tokens.push(word.to_string()),
            }
        }
        tokens
    }
}

/// Split a trailing clitic off `word`, if it has one and something is left
/// in front of it.
fn split_clitic(word: &str) -> Option<(&str, &str)> {
    for clitic in CLITICS {
        if word.len() <= clitic.len() {
            continue;
        }
        let at = word.len() - clitic.len();
        let (Some(stem), Some(tail)) = (word.get(..at), word.get(at..)) else {
            continue;
        };
        if tail.eq_ignore_ascii_case(clitic) && stem.chars().any(char::is_alphanumeric) {
            return Some((stem, tail));
        }
    }
    None
}
