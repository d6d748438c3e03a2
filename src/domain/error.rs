// ============================================================
// Layer 3 — Dataset Error Taxonomy
// ============================================================
// Every failure the indexing pipeline can surface, as one enum.
//
// Two families of errors live here:
//   Build-time  — MissingAnnotation, Parse, UnknownToken
//                 These abort the whole index build. A half-built
//                 vocabulary must never reach disk.
//   Per-item    — IndexOutOfRange, ImageNotFound, ImageDecode,
//                 MalformedQuestion
//                 These belong to a single `item(index)` call and
//                 leave the rest of the dataset usable.
//
// The application and CLI layers wrap these in anyhow::Error
// with extra context; library callers can match on the variant.
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Recoverable Errors with Result)

use std::path::PathBuf;

/// Convenience alias used throughout the data and infra layers
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A split's raw annotation file could not be read at all
    #[error("annotation file '{path}' could not be read: {source}")]
    MissingAnnotation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was read but does not have the expected JSON structure
    #[error("cannot parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted index artifact is absent; run `build-index` first
    #[error("persisted index '{path}' not found")]
    MissingIndex { path: PathBuf },

    /// The persisted index exists but breaks its own invariants
    #[error("persisted index '{path}' is corrupt: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    /// A token has no id in the vocabulary it is being encoded with
    #[error("token '{token}' is not in the {vocabulary} vocabulary")]
    UnknownToken {
        token: String,
        vocabulary: &'static str,
    },

    #[error("index {index} is out of range for a dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("image '{path}' not found")]
    ImageNotFound { path: PathBuf },

    #[error("cannot decode image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A one-hot question vector whose segments do not each hold one active bit
    #[error("malformed question vector: {0}")]
    MalformedQuestion(String),

    /// A synthetic scene record whose group sizes or image buffer are inconsistent
    #[error("malformed scene {scene}: {reason}")]
    MalformedScene { scene: usize, reason: String },

    #[error("split '{split}' is not available for {dataset}")]
    UnsupportedSplit {
        split: &'static str,
        dataset: &'static str,
    },

    #[error("i/o error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    /// True for failures that only concern one item of a loaded view.
    /// The burn adapter uses this to decide between a warning and an error log.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            DatasetError::IndexOutOfRange { .. }
                | DatasetError::ImageNotFound { .. }
                | DatasetError::ImageDecode { .. }
                | DatasetError::MalformedQuestion(_)
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let e = DatasetError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(
            e.to_string(),
            "index 7 is out of range for a dataset of length 3"
        );
    }

    #[test]
    fn test_per_item_classification() {
        assert!(DatasetError::ImageNotFound { path: "x.png".into() }.is_per_item());
        assert!(!DatasetError::MissingIndex { path: "data_dict.json".into() }.is_per_item());
        assert!(!DatasetError::UnknownToken {
            token: "cube".into(),
            vocabulary: "question",
        }
        .is_per_item());
    }
}
