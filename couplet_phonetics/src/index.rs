// Memoized phonetic index over lines of text.
//
// `PhoneticIndex` answers the two questions the matcher asks about every
// line: how many syllables it has, and which words rhyme with its final
// word. Both answers are pure functions of the text, so they are cached by
// exact text and never evicted:
//
// - `syllables`: line or word text -> syllable count. A word's count is the
//   syllable count of its first pronunciation variant; unknown words count
//   zero. A line's count is the sum over its lowercased tokens.
// - `final_words`: line text -> last token (the rhyme key).
// - `rhymes`: line text or rhyme-key word -> shared rhyme set.
//
// The index borrows its dictionary and owns its caches. A caller that wants
// a warm cache across generation runs keeps one index alive and passes it
// by `&mut`; a caller that wants isolation builds a fresh one per run. The
// type is single-threaded (`Rc`, no locking); serialize access if sharing.

use std::collections::BTreeSet;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::dictionary::PhoneticDictionary;
use crate::tokenize::{Tokenizer, WordTokenizer};

/// Hit/miss counters, reported in debug logs after a run.
///
/// `syllable_*` count whole-text queries; `word_*` count the per-word
/// lookups behind them, so `word_misses` is the number of dictionary
/// pronunciation lookups made. `unknown_words` counts misses the dictionary
/// had no pronunciation for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub syllable_hits: usize,
    pub syllable_misses: usize,
    pub word_hits: usize,
    pub word_misses: usize,
    pub unknown_words: usize,
    pub rhyme_hits: usize,
    pub rhyme_misses: usize,
}

/// Cached syllable counts and rhyme sets, backed by a phonetic dictionary.
pub struct PhoneticIndex<'d, D: ?Sized, T = WordTokenizer> {
    dictionary: &'d D,
    tokenizer: T,
    syllables: FxHashMap<String, usize>,
    final_words: FxHashMap<String, Option<Rc<str>>>,
    rhymes: FxHashMap<String, Rc<BTreeSet<String>>>,
    stats: CacheStats,
}

impl<'d, D: PhoneticDictionary + ?Sized> PhoneticIndex<'d, D, WordTokenizer> {
    /// Create an empty index using the default `WordTokenizer`.
    pub fn new(dictionary: &'d D) -> Self {
        Self::with_tokenizer(dictionary, WordTokenizer)
    }
}

impl<'d, D: PhoneticDictionary + ?Sized, T: Tokenizer> PhoneticIndex<'d, D, T> {
    /// Create an empty index with a custom tokenizer.
    pub fn with_tokenizer(dictionary: &'d D, tokenizer: T) -> Self {
        Self {
            dictionary,
            tokenizer,
            syllables: FxHashMap::default(),
            final_words: FxHashMap::default(),
            rhymes: FxHashMap::default(),
            stats: CacheStats::default(),
        }
    }

    /// Total syllables in `text`. Unknown words contribute zero.
    pub fn syllable_count(&mut self, text: &str) -> usize {
        if let Some(&count) = self.syllables.get(text) {
            self.stats.syllable_hits += 1;
            return count;
        }
        self.stats.syllable_misses += 1;
        let words = self.tokenizer.tokenize(&text.to_lowercase());
        let count = words.iter().map(|w| self.word_syllables(w)).sum();
        self.syllables.insert(text.to_string(), count);
        count
    }

    /// Syllables of a single lowercase word, from its first pronunciation.
    pub fn word_syllables(&mut self, word: &str) -> usize {
        if let Some(&count) = self.syllables.get(word) {
            self.stats.word_hits += 1;
            return count;
        }
        self.stats.word_misses += 1;
        let count = match self.dictionary.pronunciations(word).first() {
            Some(&count) => count,
            None => {
                self.stats.unknown_words += 1;
                0
            }
        };
        self.syllables.insert(word.to_string(), count);
        count
    }

    /// The lowercased last token of `line`, or `None` if it has no tokens.
    pub fn final_word(&mut self, line: &str) -> Option<Rc<str>> {
        if let Some(word) = self.final_words.get(line) {
            return word.clone();
        }
        let word: Option<Rc<str>> = self
            .tokenizer
            .tokenize(&line.to_lowercase())
            .pop()
            .map(Rc::from);
        self.final_words.insert(line.to_string(), word.clone());
        word
    }

    /// Words rhyming with the final word of `line`. Empty for a line with
    /// no tokens or a final word the dictionary does not know.
    pub fn rhyme_words(&mut self, line: &str) -> Rc<BTreeSet<String>> {
        if let Some(set) = self.rhymes.get(line) {
            self.stats.rhyme_hits += 1;
            return Rc::clone(set);
        }
        let set = match self.final_word(line) {
            None => Rc::new(BTreeSet::new()),
            Some(word) => match self.rhymes.get(&*word) {
                Some(set) => {
                    self.stats.rhyme_hits += 1;
                    Rc::clone(set)
                }
                None => {
                    self.stats.rhyme_misses += 1;
                    let set = Rc::new(self.dictionary.rhymes_of(&word));
                    self.rhymes.insert(word.to_string(), Rc::clone(&set));
                    set
                }
            },
        };
        self.rhymes.insert(line.to_string(), Rc::clone(&set));
        set
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached syllable entries (lines and words).
    pub fn cached_syllable_entries(&self) -> usize {
        self.syllables.len()
    }
}
