//! End-to-end tests for specific-word learning, plus word-list loading.

use debias_rs::{words, BiasAudit, MemoryStore};
use pretty_assertions::assert_eq;

/// Synthetic vocabulary: specific words carry a strong ±first-coordinate
/// component and no mass on the last coordinate; everything else leans
/// on the last coordinate. Linearly separable.
fn vocabulary_store() -> MemoryStore {
    let mut store = MemoryStore::new(4);
    let specific: [(&str, [f32; 4]); 8] = [
        ("he", [1.0, 0.05, 0.02, 0.0]),
        ("she", [-1.0, 0.05, 0.02, 0.0]),
        ("man", [0.9, -0.04, 0.01, 0.0]),
        ("woman", [-0.9, -0.04, 0.01, 0.0]),
        ("king", [0.8, 0.1, -0.03, 0.0]),
        ("queen", [-0.8, 0.1, -0.03, 0.0]),
        ("father", [0.85, 0.0, 0.05, 0.0]),
        ("mother", [-0.85, 0.0, 0.05, 0.0]),
    ];
    for (word, v) in specific {
        store.insert(word, v.to_vec()).unwrap();
    }
    for i in 0..60 {
        let phase = i as f32 * 0.37;
        store
            .insert(
                format!("word{i:02}"),
                vec![
                    0.03 * phase.sin(),
                    0.5 * phase.cos(),
                    0.3 * (phase * 1.7).sin(),
                    1.0,
                ],
            )
            .unwrap();
    }
    store
}

fn seeds() -> Vec<String> {
    ["he", "she", "man", "woman"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

// ============================================================================
// 1. Seeds are recovered and the set is non-empty
// ============================================================================

#[test]
fn test_learner_recovers_seeds() {
    let audit = BiasAudit::new(vocabulary_store());
    let learned = audit
        .learn_full_specific_words(&seeds(), 100, false)
        .unwrap();

    assert!(!learned.words.is_empty());
    for seed in seeds() {
        assert!(learned.words.contains(&seed), "missing seed {seed}");
    }
}

// ============================================================================
// 2. The expansion reaches specific words beyond the seeds
// ============================================================================

#[test]
fn test_learner_expands_beyond_seeds() {
    let audit = BiasAudit::new(vocabulary_store());
    let learned = audit
        .learn_full_specific_words(&seeds(), 100, false)
        .unwrap();

    for word in ["king", "queen", "father", "mother"] {
        assert!(
            learned.words.contains(&word.to_string()),
            "expected {word} in {:?}",
            learned.words
        );
    }
}

// ============================================================================
// 3. Deterministic under the fixed seed
// ============================================================================

#[test]
fn test_learner_is_reproducible() {
    let audit = BiasAudit::new(vocabulary_store());
    let first = audit
        .learn_full_specific_words(&seeds(), 100, false)
        .unwrap();
    let second = audit
        .learn_full_specific_words(&seeds(), 100, false)
        .unwrap();
    assert_eq!(first.words, second.words);
}

// ============================================================================
// 4. Debug mode exposes the training set, cap respected
// ============================================================================

#[test]
fn test_debug_mode_and_cap() {
    let audit = BiasAudit::new(vocabulary_store());
    let learned = audit
        .learn_full_specific_words(&seeds(), 10, true)
        .unwrap();

    let features = learned.features.expect("debug features");
    let labels = learned.labels.expect("debug labels");

    // 4 seed positives + 10 capped negatives.
    assert_eq!(features.nrows(), 14);
    assert_eq!(labels.len(), 14);
    assert_eq!(labels.iter().filter(|&&l| l).count(), 4);
}

// ============================================================================
// 5. Classifier reuse on held-out vectors
// ============================================================================

#[test]
fn test_classifier_scores_held_out_vectors() {
    let audit = BiasAudit::new(vocabulary_store());
    let learned = audit
        .learn_full_specific_words(&seeds(), 100, false)
        .unwrap();

    // A fresh vector shaped like the specific cluster.
    let specific_like = ndarray::array![0.7f32, 0.02, 0.0, 0.0];
    let neutral_like = ndarray::array![0.0f32, 0.3, 0.1, 0.95];
    assert!(learned.classifier.predict(&specific_like.view()));
    assert!(!learned.classifier.predict(&neutral_like.view()));
}

// ============================================================================
// 6. Word-list loading feeds the learner
// ============================================================================

#[test]
fn test_seed_list_loads_from_json_and_file() {
    let parsed = words::word_list_from_json(r#"["he", "she", "man", "woman"]"#).unwrap();
    assert_eq!(parsed, seeds());

    let path = std::env::temp_dir().join("debias_rs_seed_words_test.json");
    std::fs::write(&path, r#"["he", "she"]"#).unwrap();
    let from_file = words::word_list_from_file(&path).unwrap();
    assert_eq!(from_file, vec!["he", "she"]);
    std::fs::remove_file(&path).ok();

    let audit = BiasAudit::new(vocabulary_store());
    let learned = audit
        .learn_full_specific_words(&parsed, 100, false)
        .unwrap();
    assert!(!learned.words.is_empty());
}
