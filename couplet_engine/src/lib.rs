// Couplet matching engine.
//
// Pairs lines from two independent corpora into rhyming couplets with
// compatible syllable counts. The engine is a bounded, randomized heuristic:
// it samples, searches, and gives up after a fixed attempt budget, so a
// batch may come back shorter than requested.
//
// Architecture:
// - `config.rs`: `EngineConfig`, every tunable of the search, JSON-loadable
// - `group.rs`: `group_by_syllable_count`, the candidate grouper
// - `matcher.rs`: `Matcher::find_rhyming_line`, the per-line search
// - `generator.rs`: `CoupletGenerator`, pool preparation and sampling loop
// - `lib.rs` (this file): `generate_couplets`, the one-call entry point
//
// Phonetic features come from `couplet_phonetics::PhoneticIndex`, which the
// caller either builds fresh per run (what `generate_couplets` does) or
// keeps alive across runs and passes to `CoupletGenerator::generate`.
// Randomness comes from any `couplet_prng::RandomSource`; seeding it pins
// the output.
//
// Single-threaded and synchronous. No internal locking.

pub mod config;
pub mod generator;
pub mod group;
pub mod matcher;

pub use config::{ConfigError, EngineConfig};
pub use generator::{Couplet, CoupletGenerator};
pub use group::group_by_syllable_count;
pub use matcher::{MatchResult, Matcher};

use couplet_phonetics::{PhoneticDictionary, PhoneticIndex};
use couplet_prng::RandomSource;

/// Generate up to `num_couplets` `(line_a, line_b)` pairs with the stock
/// configuration and a fresh phonetic index.
///
/// The caller clamps `num_couplets`; the attempt budget is the only other
/// bound on the batch size.
pub fn generate_couplets<S, D, R>(
    lines_a: &[S],
    lines_b: &[S],
    num_couplets: usize,
    dictionary: &D,
    rng: &mut R,
) -> Vec<(String, String)>
where
    S: AsRef<str>,
    D: PhoneticDictionary + ?Sized,
    R: RandomSource,
{
    let mut index = PhoneticIndex::new(dictionary);
    CoupletGenerator::default()
        .generate(&mut index, lines_a, lines_b, num_couplets, rng)
        .into_iter()
        .map(|c| (c.line_a, c.line_b))
        .collect()
}
