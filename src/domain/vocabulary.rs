// ============================================================
// Layer 3 — Vocabulary Domain Type
// ============================================================
// A frozen, bidirectional token ↔ id mapping.
//
// Two instances exist per dataset:
//   question vocabulary — ids 0,1,2 are reserved control ids
//                         (PAD, SOS, EOS), corpus words start at 3
//   answer vocabulary   — no reserved ids, labels start at 0
//
// Ids are dense (0..len), so the id → token direction is just a
// Vec<String> indexed by id. The token → id direction is a HashMap.
// Both are filled together in `push_new` and never mutated after
// construction, which keeps the mapping a bijection.
//
// On disk the vocabulary is stored as two JSON maps
// (`word_to_idx`, `idx_to_word`). Loading goes through
// `TryFrom<VocabularyRecord>`, so a hand-edited or stale file
// that is not a bijection is rejected by serde itself.
//
// Reference: Rust Book §8 (Hash Maps)
//            serde docs — container attributes `try_from` / `into`

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Padding id used when batching variable-length questions
pub const PAD_ID: u32 = 0;
/// Start-of-sequence marker, first element of every encoded question
pub const SOS_ID: u32 = 1;
/// End-of-sequence marker, last element of every encoded question
pub const EOS_ID: u32 = 2;

pub const PAD_TOKEN: &str = "PAD";
pub const SOS_TOKEN: &str = "SOS";
pub const EOS_TOKEN: &str = "EOS";

/// Number of reserved control ids at the start of a question vocabulary
pub const RESERVED_QUESTION_IDS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyRecord", into = "VocabularyRecord")]
pub struct Vocabulary {
    token_to_id: HashMap<String, u32>,
    id_to_token: Vec<String>,
}

impl Vocabulary {
    fn empty() -> Self {
        Self {
            token_to_id: HashMap::new(),
            id_to_token: Vec::new(),
        }
    }

    /// Question vocabulary: PAD/SOS/EOS first, then every word in
    /// iteration order. Duplicate words keep their first id.
    pub fn for_questions<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::empty();
        for reserved in [PAD_TOKEN, SOS_TOKEN, EOS_TOKEN] {
            vocab.push_new(reserved.to_string());
        }
        for word in words {
            vocab.push_new(word.into());
        }
        vocab
    }

    /// Answer vocabulary: every label in iteration order, starting at id 0.
    pub fn for_answers<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::empty();
        for label in labels {
            vocab.push_new(label.into());
        }
        vocab
    }

    fn push_new(&mut self, token: String) {
        if self.token_to_id.contains_key(&token) {
            return;
        }
        let id = self.id_to_token.len() as u32;
        self.token_to_id.insert(token.clone(), id);
        self.id_to_token.push(token);
    }

    /// Look up the id of a token
    pub fn id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    /// Look up the token behind an id
    pub fn token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }
}

// ─── On-disk record ───────────────────────────────────────────────────────────
// BTreeMaps keep the JSON output stable between builds of the same corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub word_to_idx: BTreeMap<String, u32>,
    pub idx_to_word: BTreeMap<u32, String>,
}

impl From<Vocabulary> for VocabularyRecord {
    fn from(v: Vocabulary) -> Self {
        let idx_to_word: BTreeMap<u32, String> = v
            .id_to_token
            .into_iter()
            .enumerate()
            .map(|(id, token)| (id as u32, token))
            .collect();
        Self {
            word_to_idx: v.token_to_id.into_iter().collect(),
            idx_to_word,
        }
    }
}

impl TryFrom<VocabularyRecord> for Vocabulary {
    type Error = String;

    fn try_from(record: VocabularyRecord) -> Result<Self, Self::Error> {
        if record.word_to_idx.len() != record.idx_to_word.len() {
            return Err(format!(
                "word_to_idx has {} entries but idx_to_word has {}",
                record.word_to_idx.len(),
                record.idx_to_word.len()
            ));
        }

        let mut vocab = Self::empty();
        // BTreeMap iterates in key order, so dense ids arrive as 0,1,2,...
        for (expected, (id, token)) in record.idx_to_word.into_iter().enumerate() {
            if id as usize != expected {
                return Err(format!("ids are not dense: expected {expected}, found {id}"));
            }
            match record.word_to_idx.get(&token) {
                Some(&back) if back == id => {}
                Some(&back) => {
                    return Err(format!(
                        "'{token}' maps to {back} but id {id} maps to '{token}'"
                    ))
                }
                None => return Err(format!("'{token}' (id {id}) missing from word_to_idx")),
            }
            vocab.token_to_id.insert(token.clone(), id);
            vocab.id_to_token.push(token);
        }
        Ok(vocab)
    }
}

// ─── Vocabularies ─────────────────────────────────────────────────────────────
/// The pair of frozen vocabularies shared by every split of a dataset.
/// Serialises to `{ "question": {...}, "answer": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabularies {
    pub question: Vocabulary,
    pub answer: Vocabulary,
}

impl Vocabularies {
    pub fn new(question: Vocabulary, answer: Vocabulary) -> Self {
        Self { question, answer }
    }
}
