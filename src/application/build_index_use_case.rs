// ============================================================
// Layer 2 — BuildIndexUseCase
// ============================================================
// The one-time, blocking index build for a CLEVR root:
//
//   Step 1: Load raw annotations of every split   (Layer 4 - data)
//   Step 2: Build the shared vocabularies          (Layer 4 - data)
//   Step 3: Encode each split's examples           (Layer 4 - data)
//   Step 4: Persist vocabularies + per-split files (Layer 6 - infra)
//
// Any failure aborts before Step 4, so a partial vocabulary is
// never written. Dataset views can only be opened afterwards.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::data::{annotations::ClevrAnnotationLoader, encoder::encode_split, vocab_builder};
use crate::domain::split::Split;
use crate::infra::index_store::IndexStore;

/// What a finished build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub question_vocab_size: usize,
    pub answer_vocab_size:   usize,
    pub examples_per_split:  BTreeMap<Split, usize>,
}

pub struct BuildIndexUseCase {
    root:   PathBuf,
    splits: Vec<Split>,
}

impl BuildIndexUseCase {
    pub fn new(root: impl Into<PathBuf>, splits: Vec<Split>) -> Self {
        Self { root: root.into(), splits }
    }

    /// Build over train, val and sample
    pub fn all_splits(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Split::ALL.to_vec())
    }

    pub fn execute(&self) -> Result<BuildSummary> {
        // ── Step 1 + 2: Load every split and build the vocabularies ──────────
        tracing::info!("Building index for '{}' over {:?}", self.root.display(), self.splits);
        let loader = ClevrAnnotationLoader::new(&self.root);
        let corpus = vocab_builder::build_from_source(&loader, &self.splits)
            .context("Index build aborted while reading annotations")?;

        // ── Step 3: Encode each split ─────────────────────────────────────────
        let mut encoded = BTreeMap::new();
        for (&split, examples) in &corpus.examples {
            let list = encode_split(examples, &corpus.vocabularies)
                .with_context(|| format!("Cannot encode split '{split}'"))?;
            encoded.insert(split, list);
        }

        // ── Step 4: Persist ───────────────────────────────────────────────────
        IndexStore::new(&self.root)
            .save(&corpus.vocabularies, &encoded)
            .context("Cannot persist the index")?;

        Ok(BuildSummary {
            question_vocab_size: corpus.vocabularies.question.len(),
            answer_vocab_size:   corpus.vocabularies.answer.len(),
            examples_per_split:  encoded.iter().map(|(&s, l)| (s, l.len())).collect(),
        })
    }
}
