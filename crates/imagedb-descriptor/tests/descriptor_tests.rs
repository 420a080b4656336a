use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};

use imagedb_core::error::Error;
use imagedb_core::traits::{Descriptor, EmbeddingExtractor};
use imagedb_descriptor::{ColorHistogram, DescriptorRegistry, EmbeddingDescriptor};
use imagedb_embed::HashingExtractor;

fn solid(rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(16, 16, Rgb(rgb))
}

#[test]
fn histogram_of_solid_color_is_one_hot() {
    let descriptor = ColorHistogram::new();
    let hist = descriptor.compute(&solid([255, 0, 0])).expect("compute");

    assert_eq!(hist.len(), 512);
    // All pixels land in the single joint cell (7, 0, 0)
    let cell = (7 * 8 + 0) * 8 + 0;
    assert!((hist[cell] - 1.0).abs() < 1e-6);
    let mass: f32 = hist.iter().map(|x| x * x).sum();
    assert!((mass - 1.0).abs() < 1e-5, "unit L2 norm");
}

#[test]
fn histogram_splits_mass_between_occupied_cells() {
    let mut image = RgbImage::new(2, 1);
    image.put_pixel(0, 0, Rgb([255, 0, 0]));
    image.put_pixel(1, 0, Rgb([0, 0, 255]));

    let hist = ColorHistogram::new().compute(&image).expect("compute");

    let red_cell = (7 * 8 + 0) * 8 + 0;
    let blue_cell = (0 * 8 + 0) * 8 + 7;
    let expected = 1.0 / 2f32.sqrt();
    assert!((hist[red_cell] - expected).abs() < 1e-6);
    assert!((hist[blue_cell] - expected).abs() < 1e-6);
}

#[test]
fn histogram_batch_matches_single_computation_in_order() {
    let descriptor = ColorHistogram::new();
    let images = vec![solid([255, 0, 0]), solid([0, 255, 0]), solid([0, 0, 255])];
    let refs: Vec<&RgbImage> = images.iter().collect();

    let matrix = descriptor.compute_batch(&refs).expect("batch");

    assert_eq!(matrix.rows(), 3);
    for (i, image) in images.iter().enumerate() {
        let single = descriptor.compute(image).expect("compute");
        assert_eq!(matrix.row(i), single.as_slice(), "row {i} matches image {i}");
    }
}

#[test]
fn registry_lookup_miss_is_unknown_descriptor() {
    let registry = DescriptorRegistry::with_defaults(Box::new(HashingExtractor::new(64)));

    assert!(registry.contains("color_histogram"));
    assert!(registry.contains("embedding"));
    assert_eq!(registry.names(), vec!["color_histogram", "embedding"]);

    let err = registry.get("invalid_desc").expect_err("miss");
    assert!(
        matches!(err, Error::UnknownDescriptor(ref name) if name == "invalid_desc"),
        "got {err:?}"
    );
}

/// Extractor that records what it was handed and answers with a fixed
/// per-vector length.
struct RecordingExtractor {
    dim: usize,
    output_len: usize,
    seen: Mutex<Vec<Vec<f32>>>,
}

impl RecordingExtractor {
    fn new(dim: usize, output_len: usize) -> Self {
        Self { dim, output_len, seen: Mutex::new(Vec::new()) }
    }
}

impl EmbeddingExtractor for RecordingExtractor {
    fn dim(&self) -> usize {
        self.dim
    }

    fn extract(&self, batch: &[Vec<f32>]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.seen.lock().expect("lock").extend(batch.iter().cloned());
        Ok(batch.iter().map(|_| vec![0.5; self.output_len]).collect())
    }
}

/// Delegating handle so tests keep a view of the recorder after the
/// descriptor takes ownership of its extractor.
struct SharedExtractor(Arc<RecordingExtractor>);

impl EmbeddingExtractor for SharedExtractor {
    fn dim(&self) -> usize {
        self.0.dim()
    }

    fn extract(&self, batch: &[Vec<f32>]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.0.extract(batch)
    }
}

#[test]
fn embedding_preprocessing_is_bgr_with_means_subtracted() {
    let recorder = Arc::new(RecordingExtractor::new(4, 4));
    let descriptor = EmbeddingDescriptor::new(Box::new(SharedExtractor(Arc::clone(&recorder))));

    let image = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
    let vector = descriptor.compute(&image).expect("compute");
    assert_eq!(vector.len(), 4);

    let seen = recorder.seen.lock().expect("lock");
    let buffer = &seen[0];
    // A black pixel becomes the negated BGR channel means
    assert!((buffer[0] + 103.939).abs() < 1e-4);
    assert!((buffer[1] + 116.779).abs() < 1e-4);
    assert!((buffer[2] + 123.68).abs() < 1e-4);
}

#[test]
fn embedding_wrong_dim_is_shape_mismatch() {
    // Declares dim 16 but answers with 8-long vectors
    let descriptor = EmbeddingDescriptor::new(Box::new(RecordingExtractor::new(16, 8)));

    let err = descriptor.compute(&solid([1, 2, 3])).expect_err("mismatch");
    assert!(
        matches!(err, Error::ShapeMismatch { expected: 16, got: 8, .. }),
        "got {err:?}"
    );
}

#[test]
fn embedding_batch_row_count_must_match_input() {
    struct Truncating;
    impl EmbeddingExtractor for Truncating {
        fn dim(&self) -> usize {
            4
        }
        fn extract(&self, batch: &[Vec<f32>]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(batch.iter().skip(1).map(|_| vec![0.0; 4]).collect())
        }
    }

    let descriptor = EmbeddingDescriptor::new(Box::new(Truncating));
    let images = vec![solid([1, 1, 1]), solid([2, 2, 2])];
    let refs: Vec<&RgbImage> = images.iter().collect();

    let err = descriptor.compute_batch(&refs).expect_err("short batch");
    assert!(matches!(err, Error::Extractor(_)), "got {err:?}");
}
