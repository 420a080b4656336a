//! Corpus loading: directory listing, canonical decode, deterministic order.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Corpus, CANONICAL_HEIGHT, CANONICAL_WIDTH};

/// Extensions admitted into the corpus, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Load every decodable image directly under `dir` into a fresh corpus.
///
/// Candidate files are taken in lexicographic path order so ids, and
/// therefore ranking tie-breaks, are reproducible across runs. A file that
/// fails to decode is skipped with a warning and never aborts the load; an
/// unreadable directory is an I/O error.
pub fn load_corpus(dir: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    for path in list_image_files(dir)? {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match image::open(&path) {
            Ok(decoded) => corpus.push(filename, canonicalize(decoded)),
            Err(err) => warn!(path = %path.display(), %err, "skipping undecodable image"),
        }
    }
    debug!(count = corpus.len(), dir = %dir.display(), "corpus loaded");
    Ok(corpus)
}

/// Decode and canonicalize a single query image.
pub fn load_query_image(path: &Path) -> Result<RgbImage> {
    let decoded = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(io) => Error::Io(io),
        other => Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            other,
        )),
    })?;
    Ok(canonicalize(decoded))
}

/// Resize to the canonical 224x224 and force RGB channel order.
pub fn canonicalize(decoded: DynamicImage) -> RgbImage {
    decoded
        .resize_exact(CANONICAL_WIDTH, CANONICAL_HEIGHT, FilterType::Triangle)
        .to_rgb8()
}

/// Bring an already-decoded image to canonical size, cloning only when a
/// resize is actually needed.
pub fn ensure_canonical(image: &RgbImage) -> Cow<'_, RgbImage> {
    if image.dimensions() == (CANONICAL_WIDTH, CANONICAL_HEIGHT) {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(canonicalize(DynamicImage::ImageRgb8(image.clone())))
    }
}

fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1) {
        let entry = entry.map_err(|err| Error::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let admitted = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.iter().any(|ok| ext.eq_ignore_ascii_case(ok)))
            .unwrap_or(false);
        if admitted {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
