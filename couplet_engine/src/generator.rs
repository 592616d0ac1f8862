// Couplet generation: pool preparation and the bounded sampling loop.
//
// `CoupletGenerator::generate` turns two raw corpora into a batch of
// couplets:
//
// 1. Prepare each pool: `clean_line` every raw line, keep lines with more
//    than `min_words_exclusive` words, then keep lines whose syllable count
//    is inside `[min_syllables, max_syllables]`.
// 2. Shuffle both pools independently.
// 3. Up to `attempt_budget` times: sample a line from pool A uniformly; skip
//    it if its final word already ended an accepted couplet; otherwise ask
//    the matcher for a partner in pool B and accept the pair when the score
//    is strictly above `acceptance_threshold`.
// 4. Stop at `target` couplets or when the budget runs out.
//
// Every attempt costs budget, including skipped duplicates and rejected
// matches, so the loop always terminates. A short batch is a normal outcome.
//
// See also: `matcher.rs` for the search, `config.rs` for the tunables.

use std::collections::BTreeSet;
use std::rc::Rc;

use couplet_phonetics::{PhoneticDictionary, PhoneticIndex, Tokenizer, clean_line, word_count};
use couplet_prng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::matcher::Matcher;

/// A pair of lines, one from each corpus, with the score that matched them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Couplet {
    pub line_a: String,
    pub line_b: String,
    pub score: f64,
}

/// Drives pool preparation and the sampling loop under one `EngineConfig`.
#[derive(Debug, Clone, Default)]
pub struct CoupletGenerator {
    config: EngineConfig,
}

impl CoupletGenerator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clean a raw corpus and keep only lines fit for matching.
    pub fn prepare_pool<D, T, S>(
        &self,
        index: &mut PhoneticIndex<'_, D, T>,
        raw: &[S],
    ) -> Vec<String>
    where
        D: PhoneticDictionary + ?Sized,
        T: Tokenizer,
        S: AsRef<str>,
    {
        let window = self.config.min_syllables..=self.config.max_syllables;
        raw.iter()
            .map(|line| clean_line(line.as_ref()))
            .filter(|line| word_count(line) > self.config.min_words_exclusive)
            .filter(|line| window.contains(&index.syllable_count(line)))
            .collect()
    }

    /// Generate up to `target` couplets pairing lines of `corpus_a` with
    /// lines of `corpus_b`.
    pub fn generate<D, T, R, S>(
        &self,
        index: &mut PhoneticIndex<'_, D, T>,
        corpus_a: &[S],
        corpus_b: &[S],
        target: usize,
        rng: &mut R,
    ) -> Vec<Couplet>
    where
        D: PhoneticDictionary + ?Sized,
        T: Tokenizer,
        R: RandomSource,
        S: AsRef<str>,
    {
        let mut pool_a = self.prepare_pool(index, corpus_a);
        let mut pool_b = self.prepare_pool(index, corpus_b);
        debug!(
            raw_a = corpus_a.len(),
            raw_b = corpus_b.len(),
            pool_a = pool_a.len(),
            pool_b = pool_b.len(),
            "prepared candidate pools"
        );
        if target == 0 || pool_a.is_empty() || pool_b.is_empty() {
            return Vec::new();
        }
        rng.shuffle(&mut pool_a);
        rng.shuffle(&mut pool_b);

        let matcher = Matcher::from_config(&self.config);
        let mut couplets = Vec::with_capacity(target);
        let mut used_rhymes: BTreeSet<Rc<str>> = BTreeSet::new();
        let mut attempts = 0;

        while couplets.len() < target && attempts < self.config.attempt_budget {
            attempts += 1;
            let Some(line_a) = rng.choose(&pool_a) else {
                break;
            };
            let Some(rhyme_key) = index.final_word(line_a) else {
                continue;
            };
            if used_rhymes.contains(&rhyme_key) {
                continue;
            }
            let found = matcher.find_rhyming_line(index, line_a, &pool_b, rng);
            let accepted = found
                .line
                .filter(|_| found.score > self.config.acceptance_threshold);
            let Some(line_b) = accepted else {
                continue;
            };
            debug!(
                attempt = attempts,
                score = found.score,
                rhyme = %rhyme_key,
                "accepted couplet"
            );
            couplets.push(Couplet {
                line_a: line_a.clone(),
                line_b: line_b.to_string(),
                score: found.score,
            });
            used_rhymes.insert(rhyme_key);
        }

        let stats = index.stats();
        info!(
            requested = target,
            produced = couplets.len(),
            attempts,
            "couplet generation finished"
        );
        debug!(
            syllable_hits = stats.syllable_hits,
            syllable_misses = stats.syllable_misses,
            word_hits = stats.word_hits,
            word_misses = stats.word_misses,
            unknown_words = stats.unknown_words,
            rhyme_hits = stats.rhyme_hits,
            rhyme_misses = stats.rhyme_misses,
            "phonetic cache"
        );
        couplets
    }
}
