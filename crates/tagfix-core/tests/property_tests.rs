//! Property tests for normalization and result soundness

use proptest::prelude::*;
use tagfix_core::{
    normalize, Category, SearchOptions, Strategy as MatchStrategy, TagEngine, TagRecord,
};

const VOCAB: &[&str] = &[
    "blonde", "hair", "long", "eyes", "red", "ok", "a", "school", "uniform", "cat", "ears", "bl",
];

fn name_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 1..4).prop_map(|words| words.join(" "))
}

fn catalogue() -> impl Strategy<Value = Vec<TagRecord>> {
    prop::collection::btree_map(
        name_strategy(),
        (0u64..1000, prop::collection::vec(name_strategy(), 0..3)),
        1..25,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, (count, aliases))| {
                TagRecord::new(name, Category::General, count).with_aliases(aliases)
            })
            .collect()
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        name_strategy(),
        "[a-z_ ]{0,12}",
        name_strategy().prop_map(|n| n.replace(' ', "_").to_uppercase()),
    ]
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in "\\PC*") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
        prop_assert!(!once.contains('_'));
    }

    #[test]
    fn normalize_handles_separator_soup(raw in "[ _\t\n]*") {
        prop_assert_eq!(normalize(&raw), "");
    }

    #[test]
    fn results_are_bounded_and_distinct(
        records in catalogue(),
        query in query_strategy(),
        limit in 0usize..8,
    ) {
        let engine = TagEngine::default();
        engine.load(records).unwrap();

        let results = engine.search(&query, limit, &SearchOptions::default());
        prop_assert!(results.len() <= limit.max(1));

        let mut unique = results.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), results.len());
    }

    #[test]
    fn strategy_results_are_sound(records in catalogue(), query in query_strategy()) {
        let engine = TagEngine::default();
        engine.load(records).unwrap();
        let normalized = normalize(&query);

        for hit in engine.search_ranked(&query, 20, &SearchOptions::default()) {
            let name = normalize(&hit.name);
            match hit.strategy {
                MatchStrategy::Exact => prop_assert_eq!(&name, &normalized),
                MatchStrategy::Prefix => prop_assert!(name.starts_with(&normalized)),
                MatchStrategy::Word => {
                    let tokens: Vec<&str> = name.split(' ').collect();
                    for token in normalized.split(' ') {
                        prop_assert!(token.chars().count() >= 3);
                        prop_assert!(tokens.contains(&token));
                    }
                }
                MatchStrategy::Alias | MatchStrategy::Fuzzy => {}
            }
        }
    }

    #[test]
    fn indexed_names_resolve_to_themselves(records in catalogue()) {
        let engine = TagEngine::default();
        engine.load(records.clone()).unwrap();

        for record in &records {
            prop_assert_eq!(
                engine.search(&record.canonical_name, 5, &SearchOptions::default()),
                vec![record.canonical_name.clone()]
            );
        }
    }
}
