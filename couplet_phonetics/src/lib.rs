// Phonetic feature extraction for couplet matching.
//
// Turns raw lines into the two features the matcher compares: syllable
// count and the rhyme set of the final word. No randomness lives here.
//
// Architecture:
// - `normalize.rs`: `clean_line` (parenthetical removal + whitespace) and
//   `word_count`
// - `tokenize.rs`: `Tokenizer` capability and the default `WordTokenizer`
// - `dictionary.rs`: `PhoneticDictionary` capability and `CmuDictionary`,
//   a CMU Pronouncing Dictionary loader with a rhyming-part index
// - `index.rs`: `PhoneticIndex`, the memoizing cache over a dictionary
// - `lib.rs` (this file): re-exports and the embedded default dictionary
//
// The default dictionary is embedded from `data/pronouncing.dict` with
// `include_str!`. It covers about a hundred common words; real corpora
// should load a full CMU dictionary file with `CmuDictionary::from_path`.

pub mod dictionary;
pub mod index;
pub mod normalize;
pub mod tokenize;

pub use dictionary::{CmuDictionary, DictionaryError, PhoneticDictionary, Pronunciation};
pub use index::{CacheStats, PhoneticIndex};
pub use normalize::{clean_line, word_count};
pub use tokenize::{Tokenizer, WordTokenizer};

/// Load the default dictionary embedded at compile time.
///
/// Panics if the embedded file is malformed (should never happen in a
/// released build).
pub fn default_dictionary() -> CmuDictionary {
    let text = include_str!("../data/pronouncing.dict");
    CmuDictionary::parse(text).expect("embedded pronouncing.dict is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dictionary_loads() {
        let dict = default_dictionary();
        assert!(
            dict.len() >= 100,
            "Expected >= 100 words, got {}",
            dict.len()
        );
    }

    #[test]
    fn test_default_dictionary_rhymes() {
        let dict = default_dictionary();
        let rhymes = dict.rhymes_of("night");
        for word in ["light", "bright", "sight", "right", "flight"] {
            assert!(rhymes.contains(word), "night should rhyme with {word}");
        }
    }

    #[test]
    fn test_default_dictionary_every_word_has_a_vowel() {
        let dict = default_dictionary();
        for word in ["blessings", "dressings", "confessions", "expressions", "the"] {
            let counts = dict.pronunciations(word);
            assert!(!counts.is_empty(), "{word} missing");
            assert!(counts[0] > 0, "{word} has no syllables");
        }
    }
}
