use std::sync::Arc;

use proptest::prelude::*;

use resume_ats::semantic::{EmbeddingCache, EmbeddingGenerator};
use resume_ats::test_utils::fixtures::CountingEmbedder;

fn arb_texts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{1,24}", 1..64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cache_never_exceeds_capacity(capacity in 1usize..16, texts in arb_texts()) {
        let cache = EmbeddingCache::new(capacity);
        for (index, text) in texts.iter().enumerate() {
            cache.set(text, vec![index as f32]);
            prop_assert!(cache.len() <= capacity);
        }
        let stats = cache.stats();
        prop_assert_eq!(stats.size, cache.len());
        prop_assert_eq!(stats.max_size, capacity);
    }

    #[test]
    fn overflow_evicts_least_recently_used(capacity in 1usize..12) {
        let cache = EmbeddingCache::new(capacity);
        for index in 0..capacity {
            cache.set(&format!("text-{index}"), vec![index as f32]);
        }
        // touch the oldest so the second oldest becomes the victim
        prop_assert!(cache.get("text-0").is_some());
        cache.set("overflow", vec![-1.0]);

        prop_assert_eq!(cache.len(), capacity);
        prop_assert!(cache.contains("overflow"));
        if capacity == 1 {
            prop_assert!(!cache.contains("text-0"));
        } else {
            prop_assert!(cache.contains("text-0"));
            prop_assert!(!cache.contains("text-1"));
        }
        prop_assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn repeated_embedding_is_a_cache_hit(text in "[a-z]{2,12}( [a-z]{2,12}){0,6}") {
        let embedder = Arc::new(CountingEmbedder::new(64));
        let generator = EmbeddingGenerator::with_embedder(embedder.clone());

        let first = generator.embed(&text).unwrap();
        let before = generator.cache_stats().unwrap();
        let second = generator.embed(&text).unwrap();
        let after = generator.cache_stats().unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(after.misses, before.misses);
        prop_assert_eq!(after.hits, before.hits + 1);
        prop_assert_eq!(embedder.calls(), 1);
    }
}
