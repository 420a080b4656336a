use imagedb_core::traits::EmbeddingExtractor;
use imagedb_embed::{default_extractor, HashingExtractor, DEFAULT_EMBED_DIM};

#[test]
fn hashing_extractor_shapes_and_determinism() {
    let extractor = HashingExtractor::new(512);
    let buffer: Vec<f32> = (0..600).map(|i| (i % 255) as f32 - 103.939).collect();

    let out = extractor
        .extract(&[buffer.clone(), buffer])
        .expect("extract");

    let v1 = &out[0];
    let v2 = &out[1];
    assert_eq!(v1.len(), 512, "embedding dim is 512");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn different_inputs_produce_different_vectors() {
    let extractor = HashingExtractor::new(128);
    let a: Vec<f32> = (0..300).map(|i| i as f32).collect();
    let b: Vec<f32> = (0..300).map(|i| (i + 1) as f32).collect();

    let out = extractor.extract(&[a, b]).expect("extract");
    assert_ne!(out[0], out[1]);
}

#[test]
fn default_extractor_reports_its_dim() {
    let extractor = default_extractor().expect("extractor");
    assert_eq!(extractor.dim(), DEFAULT_EMBED_DIM);
}
