use proptest::prelude::*;

use rolematch::embedding::{EmbeddingProvider, HashEmbedder, EMBEDDING_DIMS};

proptest! {
    #[test]
    fn vectors_are_deterministic(text in "[a-z]{1}[a-z0-9 ]{0,80}") {
        let embedder = HashEmbedder::default();
        let first = embedder.embed(&text).unwrap();
        let second = embedder.embed(&text).unwrap();
        prop_assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn vectors_have_fixed_dimension_and_are_finite(text in "[a-z]{1}[a-z0-9 ]{0,80}") {
        let vector = HashEmbedder::default().embed(&text).unwrap();
        prop_assert_eq!(vector.as_slice().len(), EMBEDDING_DIMS);
        prop_assert!(vector.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn vectors_are_unit_length(text in "[a-z]{1}[a-z0-9 ]{0,80}") {
        let vector = HashEmbedder::default().embed(&text).unwrap();
        let norm: f32 = vector.as_slice().iter().map(|v| v * v).sum::<f32>().sqrt();
        prop_assert!((norm - 1.0).abs() < 1e-3, "norm was {norm}");
    }

    #[test]
    fn self_similarity_is_maximal(text in "[a-z]{1}[a-z0-9 ]{0,40}") {
        let embedder = HashEmbedder::default();
        let vector = embedder.embed(&text).unwrap();
        let cosine = vector.cosine(&vector);
        prop_assert!((cosine - 1.0).abs() < 1e-3);
    }
}
