// ============================================================
// Layer 3 — Example Domain Types
// ============================================================
// The three shapes a question/answer pair takes on its way
// through the pipeline:
//
//   RawAnnotation      → exactly as it appears in the CLEVR json
//   NormalizedExample  → lower-cased words + answer label
//   EncodedExample     → integer ids, ready for a tensor
//
// Only EncodedExample is persisted. The other two live for the
// duration of a single index build.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

use crate::domain::vocabulary::{EOS_ID, SOS_ID};

/// One record of a CLEVR `questions` array.
/// Unknown fields (program, question_family_index, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAnnotation {
    pub image_filename: String,
    pub question: String,
    pub answer: String,
}

/// Top-level layout of `CLEVR_<split>_questions.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub questions: Vec<RawAnnotation>,
}

/// A question split into normalised words, with its normalised answer label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedExample {
    pub image_filename: String,
    pub question_words: Vec<String>,
    pub answer: String,
}

/// An example ready for numeric consumption.
/// `question_ids` is always framed as [SOS, w1, ..., wn, EOS].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub image_filename: String,
    pub question_ids: Vec<u32>,
    pub answer_id: u32,
}

impl EncodedExample {
    /// The word ids between the SOS and EOS markers
    pub fn word_ids(&self) -> &[u32] {
        match self.question_ids.len() {
            0 | 1 => &[],
            n => &self.question_ids[1..n - 1],
        }
    }

    /// True when the question is framed by SOS/EOS
    pub fn is_framed(&self) -> bool {
        self.question_ids.len() >= 2
            && self.question_ids.first() == Some(&SOS_ID)
            && self.question_ids.last() == Some(&EOS_ID)
    }
}
