// Candidate grouping by syllable count.
//
// One pass over a candidate pool, bucketing each line under its syllable
// count so the matcher can jump straight to the counts it wants. Buckets
// preserve pool order. Built fresh per matcher call; the phonetic index
// makes the repeated syllable lookups cheap.

use std::collections::BTreeMap;

use couplet_phonetics::{PhoneticDictionary, PhoneticIndex, Tokenizer};

/// Partition `lines` by syllable count, keeping pool order within a bucket.
pub fn group_by_syllable_count<'p, D, T>(
    index: &mut PhoneticIndex<'_, D, T>,
    lines: &'p [String],
) -> BTreeMap<usize, Vec<&'p str>>
where
    D: PhoneticDictionary + ?Sized,
    T: Tokenizer,
{
    let mut buckets: BTreeMap<usize, Vec<&'p str>> = BTreeMap::new();
    for line in lines {
        buckets
            .entry(index.syllable_count(line))
            .or_default()
            .push(line.as_str());
    }
    buckets
}
