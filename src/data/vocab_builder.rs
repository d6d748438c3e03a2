// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// One pass over the raw annotations of EVERY split produces:
//   - the question vocabulary (PAD, SOS, EOS, then words from id 3)
//   - the answer vocabulary   (labels from id 0)
//   - each split's normalised examples, kept for the encoder
//
// Why scan all splits together?
//   A word that only appears in `val` must still have an id, or
//   encoding the validation split would fail. The vocabulary is
//   the union of every split's tokens.
//
// Ids are assigned in sorted token order (BTreeSet), so the same
// corpus always produces the same ids, across runs as well as
// within one.
//
// The builder is a pure function: raw records in, an immutable
// CorpusIndex out. Nothing is cached and nothing touches disk;
// the IndexStore decides what gets persisted.
//
// Reference: Rust Book §8 (Collections)
//            Rust Book §13 (Iterators)

use std::collections::{BTreeMap, BTreeSet};

use crate::data::normalizer::{normalize_answer, normalize_question};
use crate::domain::error::DatasetResult;
use crate::domain::example::{NormalizedExample, RawAnnotation};
use crate::domain::split::Split;
use crate::domain::traits::AnnotationSource;
use crate::domain::vocabulary::{Vocabularies, Vocabulary};

/// Result of a full-corpus scan
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    pub vocabularies: Vocabularies,
    /// Normalised examples per split, in annotation file order
    pub examples: BTreeMap<Split, Vec<NormalizedExample>>,
}

impl CorpusIndex {
    pub fn example_count(&self, split: Split) -> usize {
        self.examples.get(&split).map_or(0, Vec::len)
    }
}

/// Build both vocabularies from already-loaded raw annotations.
pub fn build(raw: &BTreeMap<Split, Vec<RawAnnotation>>) -> CorpusIndex {
    let mut question_words: BTreeSet<String> = BTreeSet::new();
    let mut answer_labels: BTreeSet<String>  = BTreeSet::new();
    let mut examples = BTreeMap::new();

    for (&split, records) in raw {
        let mut normalized = Vec::with_capacity(records.len());

        for record in records {
            let words  = normalize_question(&record.question);
            let answer = normalize_answer(&record.answer);

            question_words.extend(words.iter().cloned());
            answer_labels.insert(answer.clone());

            normalized.push(NormalizedExample {
                image_filename: record.image_filename.clone(),
                question_words: words,
                answer,
            });
        }

        tracing::debug!("Normalised {} examples for split '{}'", normalized.len(), split);
        examples.insert(split, normalized);
    }

    let vocabularies = Vocabularies::new(
        Vocabulary::for_questions(question_words),
        Vocabulary::for_answers(answer_labels),
    );

    tracing::info!(
        "Vocabulary built: {} question tokens, {} answers",
        vocabularies.question.len(),
        vocabularies.answer.len()
    );

    CorpusIndex { vocabularies, examples }
}

/// Load every listed split from `source` and build the vocabularies.
/// Any split that fails to load aborts the whole build.
pub fn build_from_source<S: AnnotationSource + ?Sized>(
    source: &S,
    splits: &[Split],
) -> DatasetResult<CorpusIndex> {
    let mut raw = BTreeMap::new();
    for &split in splits {
        let records = source.load_split(split)?;
        tracing::info!("Loaded {} annotations for split '{}'", records.len(), split);
        raw.insert(split, records);
    }
    Ok(build(&raw))
}
