// ============================================================
// Layer 6 — Persistent Index Store
// ============================================================
// Saves and restores the products of an index build, so later
// runs never re-scan the raw question text.
//
// File layout (inside the dataset root):
//
//   data_dict.json          ← both vocabularies, shared by all splits
//   qa_idx_data_train.json  ← encoded examples of the train split
//   qa_idx_data_val.json
//   qa_idx_data_sample.json
//
// One file per split means loading `val` never reads `train`.
//
// This store never rebuilds anything by itself. A missing file
// is reported as MissingIndex and the caller decides whether to
// run `build-index`, so the expensive corpus scan is always an
// explicit step.
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::error::{DatasetError, DatasetResult};
use crate::domain::example::EncodedExample;
use crate::domain::split::Split;
use crate::domain::vocabulary::{Vocabularies, RESERVED_QUESTION_IDS};

const VOCABULARY_FILE: &str = "data_dict.json";

pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.dir.join(VOCABULARY_FILE)
    }

    pub fn examples_path(&self, split: Split) -> PathBuf {
        self.dir.join(format!("qa_idx_data_{}.json", split.as_str()))
    }

    /// True when everything `load(split)` needs is on disk
    pub fn exists(&self, split: Split) -> bool {
        self.vocabulary_path().is_file() && self.examples_path(split).is_file()
    }

    /// Write the shared vocabularies and one example file per split.
    /// Called once per dataset version, by the index build.
    pub fn save(
        &self,
        vocabs:   &Vocabularies,
        examples: &BTreeMap<Split, Vec<EncodedExample>>,
    ) -> DatasetResult<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| DatasetError::Io { path: self.dir.clone(), source })?;

        let vocab_path = self.vocabulary_path();
        write_json(&vocab_path, vocabs)?;
        tracing::info!("Saved vocabularies to '{}'", vocab_path.display());

        for (&split, list) in examples {
            let path = self.examples_path(split);
            write_json(&path, list)?;
            tracing::info!("Saved {} encoded examples to '{}'", list.len(), path.display());
        }
        Ok(())
    }

    /// Load the shared vocabularies and the encoded examples of one split
    pub fn load(&self, split: Split) -> DatasetResult<(Vocabularies, Vec<EncodedExample>)> {
        let vocabs   = self.load_vocabularies()?;
        let examples = self.load_examples(split)?;
        self.validate(split, &vocabs, &examples)?;
        Ok((vocabs, examples))
    }

    pub fn load_vocabularies(&self) -> DatasetResult<Vocabularies> {
        read_json(&self.vocabulary_path())
    }

    pub fn load_examples(&self, split: Split) -> DatasetResult<Vec<EncodedExample>> {
        read_json(&self.examples_path(split))
    }

    /// Reject example files that do not fit the vocabulary they are
    /// loaded with, e.g. an examples file left over from an older build.
    fn validate(
        &self,
        split:    Split,
        vocabs:   &Vocabularies,
        examples: &[EncodedExample],
    ) -> DatasetResult<()> {
        let q_size = vocabs.question.len() as u32;
        let a_size = vocabs.answer.len() as u32;

        for (i, ex) in examples.iter().enumerate() {
            let reason = if !ex.is_framed() {
                Some(format!("example {i} is not framed by SOS/EOS"))
            } else if let Some(id) = ex.word_ids().iter().find(|&&id| id < RESERVED_QUESTION_IDS) {
                Some(format!("example {i} has control id {id} between SOS and EOS"))
            } else if let Some(id) = ex.question_ids.iter().find(|&&id| id >= q_size) {
                Some(format!("example {i} uses question id {id} but the vocabulary has {q_size}"))
            } else if ex.answer_id >= a_size {
                Some(format!("example {i} uses answer id {} but the vocabulary has {a_size}", ex.answer_id))
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(DatasetError::CorruptIndex { path: self.examples_path(split), reason });
            }
        }
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> DatasetResult<()> {
    let io_err = |source: std::io::Error| DatasetError::Io { path: path.to_path_buf(), source };

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer(&mut writer, value).map_err(|e| io_err(e.into()))?;
    writer.flush().map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DatasetResult<T> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DatasetError::MissingIndex { path: path.to_path_buf() },
        _ => DatasetError::Io { path: path.to_path_buf(), source },
    })?;

    serde_json::from_str(&text)
        .map_err(|source| DatasetError::Parse { path: path.to_path_buf(), source })
}
