// ============================================================
// Layer 4 — CLEVR Annotation Loader
// ============================================================
// Reads the raw question files of a CLEVR download.
//
// Directory layout (relative to the dataset root):
//
//   questions/
//     CLEVR_train_questions.json
//     CLEVR_val_questions.json
//     CLEVR_sample_questions.json
//   images/
//     train/   ← also used by the `sample` split
//     val/
//
// Each questions file is one JSON object with a `questions`
// array; only image_filename, question and answer are read.
//
// Unlike a best-effort loader, a missing or malformed file is
// an error: the vocabulary has to cover every split, so
// skipping one would leave holes in it.
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{DatasetError, DatasetResult};
use crate::domain::example::{AnnotationFile, RawAnnotation};
use crate::domain::split::Split;
use crate::domain::traits::AnnotationSource;

/// Path of a split's raw questions file
pub fn annotation_path(root: &Path, split: Split) -> PathBuf {
    root.join("questions")
        .join(format!("CLEVR_{}_questions.json", split.as_str()))
}

/// Directory holding a split's images
pub fn image_dir(root: &Path, split: Split) -> PathBuf {
    root.join("images").join(split.image_split().as_str())
}

/// Loads CLEVR question files from a dataset root.
/// Implements the AnnotationSource trait from Layer 3.
pub struct ClevrAnnotationLoader {
    root: PathBuf,
}

impl ClevrAnnotationLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AnnotationSource for ClevrAnnotationLoader {
    fn load_split(&self, split: Split) -> DatasetResult<Vec<RawAnnotation>> {
        let path = annotation_path(&self.root, split);
        tracing::debug!("Reading annotations from '{}'", path.display());

        let text = fs::read_to_string(&path)
            .map_err(|source| DatasetError::MissingAnnotation { path: path.clone(), source })?;

        let file: AnnotationFile = serde_json::from_str(&text)
            .map_err(|source| DatasetError::Parse { path, source })?;

        Ok(file.questions)
    }
}
