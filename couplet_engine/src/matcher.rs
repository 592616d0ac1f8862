// Rhyming-line search over a candidate pool.
//
// Given one line and a pool, find a pool line whose final word is in the
// line's rhyme set and whose syllable count is within `tolerance` of the
// line's. The search is a bounded, randomized heuristic:
//
// 1. Bucket the pool by syllable count (`group.rs`).
// 2. Draw one rotation offset into the pool. Every bucket is scanned
//    starting at `offset % bucket.len()` and wrapping around, so identical
//    inputs do not always surface the same candidate.
// 3. Widen outward from the target count: diff 0, then diff 1, up to
//    `tolerance`. Within a diff level the lower count is scanned before the
//    higher one.
// 4. A qualifying candidate scores `1 / (1 + diff)` times a random bonus of
//    up to `jitter`. The best score so far is tracked, and the first score
//    above `early_exit_score` is returned at once without finishing the
//    scan.
//
// With the stock tuning an exact-count match always scores in [1.0, 1.1]
// and so ends the search on sight; diff-1 matches score in [0.5, 0.55].

use couplet_phonetics::{PhoneticDictionary, PhoneticIndex, Tokenizer};
use couplet_prng::RandomSource;

use crate::config::EngineConfig;
use crate::group::group_by_syllable_count;

/// Outcome of a search: the best candidate, or `None` with score 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'p> {
    pub line: Option<&'p str>,
    pub score: f64,
}

impl MatchResult<'_> {
    /// The "no match" sentinel.
    pub fn none() -> Self {
        MatchResult {
            line: None,
            score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.line.is_some()
    }
}

/// Search parameters for `find_rhyming_line`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    pub tolerance: usize,
    pub score_jitter: f64,
    pub early_exit_score: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Matcher {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.syllable_tolerance,
            score_jitter: config.score_jitter,
            early_exit_score: config.early_exit_score,
        }
    }

    /// Find the best rhyming, syllable-compatible line in `pool`.
    pub fn find_rhyming_line<'p, D, T, R>(
        &self,
        index: &mut PhoneticIndex<'_, D, T>,
        line: &str,
        pool: &'p [String],
        rng: &mut R,
    ) -> MatchResult<'p>
    where
        D: PhoneticDictionary + ?Sized,
        T: Tokenizer,
        R: RandomSource,
    {
        if pool.is_empty() {
            return MatchResult::none();
        }
        let target = index.syllable_count(line);
        let rhyme_set = index.rhyme_words(line);
        if rhyme_set.is_empty() {
            return MatchResult::none();
        }

        let buckets = group_by_syllable_count(index, pool);
        let highest = buckets.keys().next_back().copied().unwrap_or(0);
        let offset = rng.range_usize(0, pool.len());

        let mut best = MatchResult::none();
        for diff in 0..=self.tolerance {
            // Past both ends of the bucket range nothing more can match.
            if target.checked_sub(diff).is_none() && target.saturating_add(diff) > highest {
                break;
            }
            let weight = 1.0 / (1 + diff) as f64;
            for count in bucket_order(target, diff).into_iter().flatten() {
                let Some(bucket) = buckets.get(&count) else {
                    continue;
                };
                let start = offset % bucket.len();
                for &candidate in bucket[start..].iter().chain(&bucket[..start]) {
                    let Some(word) = index.final_word(candidate) else {
                        continue;
                    };
                    if !rhyme_set.contains(&*word) {
                        continue;
                    }
                    let score = weight * (1.0 + self.score_jitter * rng.next_f64());
                    if score > best.score {
                        best = MatchResult {
                            line: Some(candidate),
                            score,
                        };
                    }
                    if score > self.early_exit_score {
                        return best;
                    }
                }
            }
        }
        best
    }
}

/// Syllable counts to scan at one diff level, lower first. A count below
/// zero does not exist; diff 0 has a single count.
fn bucket_order(target: usize, diff: usize) -> [Option<usize>; 2] {
    if diff == 0 {
        [Some(target), None]
    } else {
        [target.checked_sub(diff), target.checked_add(diff)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use couplet_phonetics::default_dictionary;
    use couplet_prng::CoupletRng;

    fn pool(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bucket_order_cases() {
        assert_eq!(bucket_order(5, 0), [Some(5), None]);
        assert_eq!(bucket_order(5, 2), [Some(3), Some(7)]);
        assert_eq!(bucket_order(1, 2), [None, Some(3)]);
        assert_eq!(bucket_order(3, usize::MAX), [None, None]);
    }

    #[test]
    fn empty_pool_is_no_match() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let mut rng = CoupletRng::new(1);
        let result = Matcher::default().find_rhyming_line(&mut index, "all night", &[], &mut rng);
        assert_eq!(result, MatchResult::none());
        assert!(!result.is_match());
    }

    #[test]
    fn exact_count_match_scores_high() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let candidates = pool(&["you and the bright light", "stay up all night"]);
        for seed in 0..20 {
            let mut rng = CoupletRng::new(seed);
            let result = Matcher::default().find_rhyming_line(
                &mut index,
                "we stay up all night",
                &candidates,
                &mut rng,
            );
            assert_eq!(result.line, Some("you and the bright light"));
            assert!((1.0..=1.1).contains(&result.score), "score {}", result.score);
        }
    }

    #[test]
    fn one_off_match_scores_half() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        // 5 syllables against a 6-syllable candidate.
        let candidates = pool(&["you and me in the light"]);
        let mut rng = CoupletRng::new(3);
        let result = Matcher::default().find_rhyming_line(
            &mut index,
            "we stay up all night",
            &candidates,
            &mut rng,
        );
        assert!(result.is_match());
        assert!((0.5..=0.55).contains(&result.score), "score {}", result.score);
    }

    #[test]
    fn prefers_exact_count_over_near_count() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let candidates = pool(&["you and me in the light", "you and the bright light"]);
        for seed in 0..20 {
            let mut rng = CoupletRng::new(seed);
            let result = Matcher::default().find_rhyming_line(
                &mut index,
                "we stay up all night",
                &candidates,
                &mut rng,
            );
            assert_eq!(result.line, Some("you and the bright light"));
        }
    }

    #[test]
    fn outside_tolerance_is_no_match() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        // 2 syllables against 5: diff 3 > tolerance 2.
        let candidates = pool(&["the light"]);
        let mut rng = CoupletRng::new(9);
        let result = Matcher::default().find_rhyming_line(
            &mut index,
            "we stay up all night",
            &candidates,
            &mut rng,
        );
        assert_eq!(result, MatchResult::none());
    }

    #[test]
    fn non_rhyming_candidates_are_skipped() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let candidates = pool(&["you and the bright day", "we stay up all night"]);
        let mut rng = CoupletRng::new(4);
        // "night" does not rhyme with itself, and "day" does not rhyme with it.
        let result = Matcher::default().find_rhyming_line(
            &mut index,
            "we stay up all night",
            &candidates,
            &mut rng,
        );
        assert!(!result.is_match());
    }

    #[test]
    fn unknown_final_word_is_no_match() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let candidates = pool(&["you and the bright light"]);
        let mut rng = CoupletRng::new(4);
        let result = Matcher::default().find_rhyming_line(
            &mut index,
            "we stay up all zzyzx",
            &candidates,
            &mut rng,
        );
        assert!(!result.is_match());
    }

    #[test]
    fn rotation_varies_the_pick_among_equals() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let candidates = pool(&[
            "you and the bright light",
            "you and me in sight",
            "you and me so bright",
            "you and me in flight",
        ]);
        let mut picks = std::collections::BTreeSet::new();
        for seed in 0..40 {
            let mut rng = CoupletRng::new(seed);
            let result = Matcher::default().find_rhyming_line(
                &mut index,
                "we stay up all night",
                &candidates,
                &mut rng,
            );
            picks.insert(result.line.unwrap().to_string());
        }
        assert!(picks.len() > 1, "rotation should surface different lines");
    }

    #[test]
    fn no_early_exit_keeps_best_of_scan() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let matcher = Matcher {
            early_exit_score: f64::INFINITY,
            ..Matcher::default()
        };
        let candidates = pool(&["you and me in the light", "you and the bright light"]);
        let mut rng = CoupletRng::new(11);
        let result =
            matcher.find_rhyming_line(&mut index, "we stay up all night", &candidates, &mut rng);
        assert_eq!(result.line, Some("you and the bright light"));
        assert!(result.score >= 1.0);
    }

    #[test]
    fn unbounded_tolerance_stops_past_last_bucket() {
        let dict = default_dictionary();
        let mut index = PhoneticIndex::new(&dict);
        let matcher = Matcher {
            tolerance: usize::MAX,
            ..Matcher::default()
        };
        // 2 syllables against 5: reachable at diff 3, then nothing further.
        let candidates = pool(&["the light", "you and the bright day"]);
        let mut rng = CoupletRng::new(6);
        let result =
            matcher.find_rhyming_line(&mut index, "we stay up all night", &candidates, &mut rng);
        assert_eq!(result.line, Some("the light"));
        assert!((0.25..=0.275).contains(&result.score), "score {}", result.score);

        let misses = pool(&["you and the bright day"]);
        let result =
            matcher.find_rhyming_line(&mut index, "we stay up all night", &misses, &mut rng);
        assert_eq!(result, MatchResult::none());
    }
}
