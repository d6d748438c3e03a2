// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw annotation files and tensor batches.
//
// CLEVR flows in this order:
//
//   CLEVR_<split>_questions.json
//       │
//       ▼
//   ClevrAnnotationLoader → raw (image, question, answer) records
//       │
//       ▼
//   normalizer            → lower-cased word tokens / answer labels
//       │
//       ▼
//   vocab_builder         → frozen question + answer vocabularies
//       │
//       ▼
//   encoder               → [SOS, ids..., EOS] and answer ids
//       │
//       ▼
//   IndexStore (infra)    → persisted once, loaded by every later run
//       │
//       ▼
//   ClevrDataset          → random access, images decoded lazily
//       │
//       ▼
//   ClevrBatcher          → padded tensor batches
//
// Sort-of-CLEVR skips the text steps: its questions are already
// one-hot vectors, decoded by sort_of_clevr.rs.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the CLEVR question files of each split
pub mod annotations;

/// Normalises question and answer strings
pub mod normalizer;

/// Full-corpus vocabulary construction
pub mod vocab_builder;

/// Question/answer → id encoding
pub mod encoder;

/// Random-access view over a persisted CLEVR split
pub mod clevr_dataset;

/// One-hot decoding and random access for Sort-of-CLEVR
pub mod sort_of_clevr;

/// Burn Batcher implementations for both datasets
pub mod batcher;

/// Burn DataLoader construction from a DataConfig
pub mod dataloaders;
