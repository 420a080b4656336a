use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no images loaded; load a corpus before building or searching")]
    EmptyCorpus,

    #[error("unknown descriptor: {0}")]
    UnknownDescriptor(String),

    #[error("index not built for descriptor: {0}")]
    IndexNotBuilt(String),

    #[error("descriptor {descriptor} produced a {got}-dim vector, expected {expected}")]
    ShapeMismatch {
        descriptor: String,
        expected: usize,
        got: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Extractor(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
