// Pronouncing dictionary: pronunciation variants and rhyme sets per word.
//
// `PhoneticDictionary` is the capability the phonetic index depends on. It
// answers two questions about a single lowercase word: the syllable count
// of each pronunciation variant (in dictionary order), and the set of words
// that rhyme with it.
//
// `CmuDictionary` implements it over text in the CMU Pronouncing Dictionary
// format:
//
//   ;;; comment
//   WORD  PH1 PH2 PH3
//   WORD(2)  PH1 PH2
//
// Vowel phones carry a stress digit (0 unstressed, 1 primary, 2 secondary),
// so a pronunciation's syllable count is its number of digit-bearing phones.
// Its rhyming part runs from the last vowel with primary or secondary stress
// to the end ("blessings" B L EH1 S IH0 NG Z -> EH1 S IH0 NG Z). Two words
// rhyme when any of their pronunciations share a rhyming part. A reverse
// index from rhyming part to words is built at load time, so `rhymes_of` is
// a handful of map lookups.

use std::collections::BTreeSet;
use std::path::Path;

use rustc_hash::FxHashMap;

/// Errors from loading a pronouncing dictionary.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dictionary line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Looks up pronunciations and rhymes for single words.
pub trait PhoneticDictionary {
    /// Syllable count of each pronunciation variant of `word`, in dictionary
    /// order. Empty when the word is unknown.
    fn pronunciations(&self, word: &str) -> Vec<usize>;

    /// Every known word that rhymes with `word`, excluding `word` itself.
    /// Empty when the word is unknown.
    fn rhymes_of(&self, word: &str) -> BTreeSet<String>;
}

/// One pronunciation variant: a sequence of ARPABET phones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pronunciation {
    phones: Vec<String>,
}

impl Pronunciation {
    pub fn new(phones: Vec<String>) -> Self {
        Self { phones }
    }

    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// Number of vowel (stress-marked) phones.
    pub fn syllable_count(&self) -> usize {
        self.phones.iter().filter(|p| stress_of(p).is_some()).count()
    }

    /// Phones from the last stressed vowel to the end, joined by spaces.
    /// The whole pronunciation when no vowel carries stress.
    pub fn rhyming_part(&self) -> String {
        let start = self
            .phones
            .iter()
            .rposition(|p| matches!(stress_of(p), Some('1' | '2')))
            .unwrap_or(0);
        self.phones[start..].join(" ")
    }
}

/// The stress digit of a vowel phone, `None` for consonants.
fn stress_of(phone: &str) -> Option<char> {
    phone.chars().last().filter(char::is_ascii_digit)
}

/// A pronouncing dictionary loaded from CMU-format text.
#[derive(Debug, Clone, Default)]
pub struct CmuDictionary {
    entries: FxHashMap<String, Vec<Pronunciation>>,
    /// Rhyming part -> every word with a pronunciation ending that way.
    rhyme_groups: FxHashMap<String, BTreeSet<String>>,
}

impl CmuDictionary {
    /// Parse dictionary text. Words are stored lowercased; variant markers
    /// such as `(2)` are stripped and variants keep file order.
    pub fn parse(text: &str) -> Result<Self, DictionaryError> {
        let mut dict = CmuDictionary::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut parts = line.split_whitespace();
            let head = parts.next().unwrap_or_default();
            let phones: Vec<String> = parts.map(str::to_string).collect();
            if phones.is_empty() {
                return Err(DictionaryError::Malformed {
                    line: idx + 1,
                    reason: format!("no phones for '{head}'"),
                });
            }
            let word = strip_variant(head).to_lowercase();
            if word.is_empty() {
                return Err(DictionaryError::Malformed {
                    line: idx + 1,
                    reason: format!("empty word in '{head}'"),
                });
            }
            dict.insert(word, Pronunciation::new(phones));
        }
        Ok(dict)
    }

    /// Read and parse a dictionary file.
    pub fn from_path(path: &Path) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dict = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            words = dict.len(),
            "loaded pronouncing dictionary"
        );
        Ok(dict)
    }

    /// Add one pronunciation variant for `word` (already lowercase).
    pub fn insert(&mut self, word: String, pronunciation: Pronunciation) {
        self.rhyme_groups
            .entry(pronunciation.rhyming_part())
            .or_default()
            .insert(word.clone());
        self.entries.entry(word).or_default().push(pronunciation);
    }

    /// All pronunciation variants of `word`, in insertion order.
    pub fn variants(&self, word: &str) -> &[Pronunciation] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PhoneticDictionary for CmuDictionary {
    fn pronunciations(&self, word: &str) -> Vec<usize> {
        self.variants(word)
            .iter()
            .map(Pronunciation::syllable_count)
            .collect()
    }

    fn rhymes_of(&self, word: &str) -> BTreeSet<String> {
        let mut rhymes = BTreeSet::new();
        for pronunciation in self.variants(word) {
            if let Some(group) = self.rhyme_groups.get(&pronunciation.rhyming_part()) {
                rhymes.extend(group.iter().filter(|w| *w != word).cloned());
            }
        }
        rhymes
    }
}

/// `WORD(2)` -> `WORD`. Heads that merely start with `(` are left alone.
fn strip_variant(head: &str) -> &str {
    match head.rfind('(') {
        Some(open) if open > 0 && head.ends_with(')') => &head[..open],
        _ => head,
    }
}
