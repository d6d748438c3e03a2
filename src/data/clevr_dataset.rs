// ============================================================
// Layer 4 — CLEVR Random-Access Dataset View
// ============================================================
// A read-only view over one split of a persisted CLEVR index.
//
// What is held in memory:
//   - the shared vocabularies (for rendering predictions)
//   - the split's encoded examples (small: a few ints each)
// What is NOT held in memory:
//   - images; each is decoded only when its item is requested
//
// item(index):
//   1. bounds check                → IndexOutOfRange
//   2. image_dir.join(filename)    → must exist, else ImageNotFound
//   3. ImageSource::load           → decode (+ resize)
//   4. return image with the already-encoded question and answer
//
// The view is immutable and Send + Sync, so burn's DataLoader
// workers can call `get` from several threads without locks.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §16 (Send and Sync)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use burn::data::dataset::Dataset;

use crate::data::annotations::image_dir;
use crate::domain::error::{DatasetError, DatasetResult};
use crate::domain::example::EncodedExample;
use crate::domain::image::ImageArray;
use crate::domain::split::Split;
use crate::domain::traits::ImageSource;
use crate::domain::vocabulary::{Vocabularies, Vocabulary};
use crate::infra::index_store::IndexStore;

/// One materialised CLEVR example: (image, question ids, answer id)
#[derive(Debug, Clone)]
pub struct ClevrItem {
    pub image:    ImageArray,
    pub question: Vec<u32>,
    pub answer:   u32,
}

pub struct ClevrDataset {
    split:     Split,
    image_dir: PathBuf,
    vocabs:    Vocabularies,
    examples:  Vec<EncodedExample>,
    images:    Arc<dyn ImageSource>,
}

impl ClevrDataset {
    pub fn new(
        split:     Split,
        image_dir: impl Into<PathBuf>,
        vocabs:    Vocabularies,
        examples:  Vec<EncodedExample>,
        images:    Arc<dyn ImageSource>,
    ) -> Self {
        Self { split, image_dir: image_dir.into(), vocabs, examples, images }
    }

    /// Open a split from a dataset root whose index has already been built.
    /// Fails with MissingIndex if `build-index` has not been run.
    pub fn open(root: &Path, split: Split, images: Arc<dyn ImageSource>) -> DatasetResult<Self> {
        let (vocabs, examples) = IndexStore::new(root).load(split)?;
        tracing::info!(
            "Opened CLEVR split '{}' with {} examples",
            split,
            examples.len()
        );
        Ok(Self::new(split, image_dir(root, split), vocabs, examples, images))
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// The encoded example at `index`, without touching its image
    pub fn example(&self, index: usize) -> DatasetResult<&EncodedExample> {
        self.examples.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.examples.len(),
        })
    }

    /// Where the image of `index` is expected on disk
    pub fn image_path(&self, index: usize) -> DatasetResult<PathBuf> {
        Ok(self.image_dir.join(&self.example(index)?.image_filename))
    }

    /// Materialise item `index`: decode its image and pair it with
    /// the encoded question and answer.
    pub fn item(&self, index: usize) -> DatasetResult<ClevrItem> {
        let example = self.example(index)?;
        let path    = self.image_path(index)?;

        if !path.is_file() {
            return Err(DatasetError::ImageNotFound { path });
        }

        Ok(ClevrItem {
            image:    self.images.load(&path)?,
            question: example.question_ids.clone(),
            answer:   example.answer_id,
        })
    }

    pub fn question_vocabulary(&self) -> &Vocabulary {
        &self.vocabs.question
    }

    pub fn answer_vocabulary(&self) -> &Vocabulary {
        &self.vocabs.answer
    }

    /// Size of the question vocabulary, control ids included
    pub fn q_size(&self) -> usize {
        self.vocabs.question.len()
    }

    /// Number of distinct answers
    pub fn a_size(&self) -> usize {
        self.vocabs.answer.len()
    }
}

// ─── Burn Dataset Trait Implementation ────────────────────────────────────────
// Burn's iterator stops at the first None, so None is reserved for
// `index >= len`. An in-range item that fails is logged and yielded
// as Some(None); the batcher drops it. Callers that need the reason
// use `item()`.
impl Dataset<Option<ClevrItem>> for ClevrDataset {
    fn get(&self, index: usize) -> Option<Option<ClevrItem>> {
        if index >= self.examples.len() {
            return None;
        }
        match self.item(index) {
            Ok(item) => Some(Some(item)),
            Err(e) if e.is_per_item() => {
                tracing::warn!("Skipping CLEVR item {} of split '{}': {}", index, self.split, e);
                Some(None)
            }
            Err(e) => {
                tracing::error!("CLEVR item {} of split '{}' failed: {}", index, self.split, e);
                Some(None)
            }
        }
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::{EOS_ID, SOS_ID};

    /// Returns a 1x1 grey image for any existing path
    struct FlatImages;

    impl ImageSource for FlatImages {
        fn load(&self, _path: &Path) -> DatasetResult<ImageArray> {
            Ok(ImageArray::from_hwc_u8(1, 1, 3, &[128, 128, 128]).unwrap())
        }
    }

    fn dataset(image_dir: &Path) -> ClevrDataset {
        let vocabs = Vocabularies::new(
            Vocabulary::for_questions(["cube"]),
            Vocabulary::for_answers(["no", "yes"]),
        );
        let examples = vec![
            EncodedExample { image_filename: "present.png".into(), question_ids: vec![SOS_ID, 3, EOS_ID], answer_id: 1 },
            EncodedExample { image_filename: "missing.png".into(), question_ids: vec![SOS_ID, EOS_ID], answer_id: 0 },
        ];
        ClevrDataset::new(Split::Val, image_dir, vocabs, examples, Arc::new(FlatImages))
    }

    #[test]
    fn test_item_pairs_image_with_encoded_question() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present.png"), b"").unwrap();

        let ds   = dataset(dir.path());
        let item = ds.item(0).unwrap();
        assert_eq!(item.question, vec![SOS_ID, 3, EOS_ID]);
        assert_eq!(item.answer, 1);
        assert_eq!(item.image.shape(), [3, 1, 1]);
        assert_eq!(ds.q_size(), 4);
        assert_eq!(ds.a_size(), 2);
    }

    #[test]
    fn test_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let ds  = dataset(dir.path());
        assert!(matches!(ds.item(ds.len()), Err(DatasetError::IndexOutOfRange { index: 2, len: 2 })));
        // -1 as seen through an unsigned index
        assert!(matches!(ds.item(usize::MAX), Err(DatasetError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_missing_image_is_local_to_its_item() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present.png"), b"").unwrap();
        let ds = dataset(dir.path());

        assert!(matches!(ds.item(1), Err(DatasetError::ImageNotFound { .. })));
        // the rest of the view still works
        assert!(ds.item(0).is_ok());
        assert!(matches!(Dataset::get(&ds, 1), Some(None)));
        assert!(matches!(Dataset::get(&ds, 0), Some(Some(_))));
        assert_eq!(Dataset::len(&ds), 2);
    }

    #[test]
    fn test_open_without_index_is_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClevrDataset::open(dir.path(), Split::Train, Arc::new(FlatImages))
            .err()
            .unwrap();
        assert!(matches!(err, DatasetError::MissingIndex { .. }));
    }
}
