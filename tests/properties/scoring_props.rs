use proptest::prelude::*;

use rolematch::config::ScoringConfig;
use rolematch::scoring::recalibrate;

fn config() -> ScoringConfig {
    ScoringConfig::default()
}

proptest! {
    #[test]
    fn score_stays_in_unit_interval(
        raw in -10.0f64..10.0,
        title in "[a-z]{1,12}( [a-z]{1,12}){0,3}",
        query in "[a-z]{1,12}( [a-z]{1,12}){0,5}",
    ) {
        let score = recalibrate(raw, &title, &query, &config());
        prop_assert!((0.0..=1.0).contains(&score), "raw {raw} gave {score}");
    }

    #[test]
    fn score_is_monotone_in_raw_score(
        raw_a in 0.0f64..1.0,
        raw_b in 0.0f64..1.0,
        title in "[a-z]{1,12}( [a-z]{1,12}){0,3}",
        query in "[a-z]{1,12}( [a-z]{1,12}){0,5}",
    ) {
        let (lo, hi) = if raw_a <= raw_b { (raw_a, raw_b) } else { (raw_b, raw_a) };
        let score_lo = recalibrate(lo, &title, &query, &config());
        let score_hi = recalibrate(hi, &title, &query, &config());
        prop_assert!(score_lo <= score_hi + 1e-12);
    }

    #[test]
    fn lexical_overlap_never_hurts(
        raw in 0.0f64..1.0,
        query in "[a-z]{4,12}( [a-z]{4,12}){0,4}",
    ) {
        // The query itself as title maximizes overlap; a disjoint title
        // (digits never tokenize out of a letter-only query) gets none.
        let overlapping = recalibrate(raw, &query, &query, &config());
        let disjoint = recalibrate(raw, "0000 1111", &query, &config());
        prop_assert!(overlapping >= disjoint - 1e-12);
    }

    #[test]
    fn zero_raw_score_is_never_relevant(
        title in "[a-z]{1,12}( [a-z]{1,12}){0,3}",
        query in "[a-z]{1,12}( [a-z]{1,12}){0,5}",
    ) {
        let score = recalibrate(0.0, &title, &query, &config());
        prop_assert!(score < config().min_relevancy);
    }
}
