// End-to-end generation scenarios through the public engine API.
//
// Uses the embedded default dictionary, plus a fixture dictionary that
// widens one rhyme set, to drive `generate_couplets` and
// `CoupletGenerator::generate` from raw corpora to finished batches.

use std::collections::BTreeSet;

use couplet_engine::{CoupletGenerator, EngineConfig, generate_couplets};
use couplet_phonetics::{
    CmuDictionary, PhoneticDictionary, PhoneticIndex, clean_line, default_dictionary,
};
use couplet_prng::CoupletRng;

/// The default dictionary, except that "blessings" is declared to rhyme with
/// "confessions" and "expressions".
struct SlantRhymes {
    inner: CmuDictionary,
}

impl SlantRhymes {
    fn new() -> Self {
        Self {
            inner: default_dictionary(),
        }
    }
}

impl PhoneticDictionary for SlantRhymes {
    fn pronunciations(&self, word: &str) -> Vec<usize> {
        self.inner.pronunciations(word)
    }

    fn rhymes_of(&self, word: &str) -> BTreeSet<String> {
        if word == "blessings" {
            return ["confessions", "expressions"]
                .iter()
                .map(|w| w.to_string())
                .collect();
        }
        self.inner.rhymes_of(word)
    }
}

const BLESSINGS: &[&str] = &["I stay up all night counting my blessings"];
const CONFESSIONS: &[&str] = &[
    "The world's a stage for endless confessions",
    "A quiet storm of silent expressions",
];

#[test]
fn blessings_pair_with_a_confession() {
    let dict = SlantRhymes::new();
    for seed in 0..10 {
        let mut index = PhoneticIndex::new(&dict);
        let mut rng = CoupletRng::new(seed);
        let couplets =
            CoupletGenerator::default().generate(&mut index, BLESSINGS, CONFESSIONS, 1, &mut rng);
        assert_eq!(couplets.len(), 1);
        let couplet = &couplets[0];
        assert_eq!(couplet.line_a, BLESSINGS[0]);
        assert!(CONFESSIONS.contains(&couplet.line_b.as_str()));
        assert!(couplet.score > 0.4);
    }
}

#[test]
fn scenario_lines_have_equal_syllables() {
    let dict = SlantRhymes::new();
    let mut index = PhoneticIndex::new(&dict);
    let a = index.syllable_count(BLESSINGS[0]);
    for line in CONFESSIONS {
        assert_eq!(index.syllable_count(line), a, "{line}");
    }
}

#[test]
fn real_rhyme_found_with_default_dictionary() {
    let dict = default_dictionary();
    let mut rng = CoupletRng::new(2);
    let couplets = generate_couplets(
        BLESSINGS,
        &["He taught me patience through all the dressings", "A quiet storm of silent expressions"],
        1,
        &dict,
        &mut rng,
    );
    assert_eq!(
        couplets,
        vec![(
            BLESSINGS[0].to_string(),
            "He taught me patience through all the dressings".to_string()
        )]
    );
}

#[test]
fn empty_first_corpus_yields_nothing() {
    let dict = default_dictionary();
    let empty: &[&str] = &[];
    let mut rng = CoupletRng::new(1);
    assert!(generate_couplets(empty, CONFESSIONS, 5, &dict, &mut rng).is_empty());
}

#[test]
fn zero_requested_yields_nothing() {
    let dict = SlantRhymes::new();
    let mut rng = CoupletRng::new(1);
    assert!(generate_couplets(BLESSINGS, CONFESSIONS, 0, &dict, &mut rng).is_empty());
}

#[test]
fn over_asking_returns_short_batch() {
    let dict = SlantRhymes::new();
    let mut rng = CoupletRng::new(1);
    // One line in A means one distinct rhyme word, so at most one couplet.
    let couplets = generate_couplets(BLESSINGS, CONFESSIONS, 10, &dict, &mut rng);
    assert_eq!(couplets.len(), 1);
}

#[test]
fn no_rhymes_exhausts_budget_without_blocking() {
    let dict = default_dictionary();
    let mut rng = CoupletRng::new(1);
    let couplets = generate_couplets(
        &["so we go down to the town"],
        &["I know we will stay and play"],
        3,
        &dict,
        &mut rng,
    );
    assert!(couplets.is_empty());
}

#[test]
fn seeded_runs_are_identical() {
    let dict = default_dictionary();
    let a = [
        "I stay up all night counting my blessings",
        "we stay up all night",
        "so we go down to the town",
        "you and me in the day",
    ];
    let b = [
        "he taught me patience through all the dressings",
        "you and the bright light",
        "so we see the crown go down",
        "you and me so bright",
        "you and me in flight",
        "I know we will stay and play",
    ];
    let run = |seed| generate_couplets(&a, &b, 4, &dict, &mut CoupletRng::new(seed));
    for seed in [0, 17, 99] {
        assert_eq!(run(seed), run(seed));
    }
}

#[test]
fn parenthetical_asides_are_removed_before_pairing() {
    assert_eq!(
        clean_line("This is a (whispered) secret kept (forever) hidden"),
        "This is a secret kept hidden"
    );
    let dict = default_dictionary();
    let mut index = PhoneticIndex::new(&dict);
    let pool = CoupletGenerator::default().prepare_pool(
        &mut index,
        &["This is a (whispered) secret kept (forever) hidden"],
    );
    assert_eq!(pool, vec!["This is a secret kept hidden"]);
}

#[test]
fn dictionary_can_be_a_trait_object() {
    let dict = SlantRhymes::new();
    let dyn_dict: &dyn PhoneticDictionary = &dict;
    let mut rng = CoupletRng::new(3);
    let couplets = generate_couplets(BLESSINGS, CONFESSIONS, 1, dyn_dict, &mut rng);
    assert_eq!(couplets.len(), 1);
}

#[test]
fn custom_config_tightens_tolerance() {
    let dict = default_dictionary();
    let generator = CoupletGenerator::new(EngineConfig {
        syllable_tolerance: 0,
        ..EngineConfig::default()
    });
    let mut index = PhoneticIndex::new(&dict);
    let mut rng = CoupletRng::new(8);
    // 6 syllables against 7: only reachable with tolerance >= 1.
    let couplets = generator.generate(
        &mut index,
        &["you and me in the day"],
        &["I know we will stay and play"],
        1,
        &mut rng,
    );
    assert!(couplets.is_empty());
}
