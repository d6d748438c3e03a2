// ============================================================
// Layer 4 — Sequence Encoder
// ============================================================
// Converts normalised examples into integer ids.
//
//   question  →  [SOS, id(w1), id(w2), ..., id(wn), EOS]
//   answer    →  id(label)
//
// Every function here is pure: same vocabulary, same input,
// same output. An unknown token is an error rather than a
// silent <UNK>, because with a full-corpus vocabulary it can
// only happen when the persisted index is stale.
//
// Reference: Rust Book §9 (Propagating Errors with ?)

use crate::domain::error::{DatasetError, DatasetResult};
use crate::domain::example::{EncodedExample, NormalizedExample};
use crate::domain::vocabulary::{Vocabularies, Vocabulary, EOS_ID, PAD_ID, SOS_ID};

/// Encode question words, framed by SOS and EOS
pub fn encode_question<S: AsRef<str>>(tokens: &[S], vocab: &Vocabulary) -> DatasetResult<Vec<u32>> {
    let mut ids = Vec::with_capacity(tokens.len() + 2);
    ids.push(SOS_ID);
    for token in tokens {
        let token = token.as_ref();
        let id = vocab.id(token).ok_or_else(|| DatasetError::UnknownToken {
            token:      token.to_string(),
            vocabulary: "question",
        })?;
        ids.push(id);
    }
    ids.push(EOS_ID);
    Ok(ids)
}

/// Encode one answer label
pub fn encode_answer(label: &str, vocab: &Vocabulary) -> DatasetResult<u32> {
    vocab.id(label).ok_or_else(|| DatasetError::UnknownToken {
        token:      label.to_string(),
        vocabulary: "answer",
    })
}

/// Encode a whole normalised example against the shared vocabularies
pub fn encode_example(example: &NormalizedExample, vocabs: &Vocabularies) -> DatasetResult<EncodedExample> {
    Ok(EncodedExample {
        image_filename: example.image_filename.clone(),
        question_ids:   encode_question(&example.question_words, &vocabs.question)?,
        answer_id:      encode_answer(&example.answer, &vocabs.answer)?,
    })
}

/// Encode every example of a split; the first unknown token aborts
pub fn encode_split(examples: &[NormalizedExample], vocabs: &Vocabularies) -> DatasetResult<Vec<EncodedExample>> {
    examples
        .iter()
        .map(|ex| encode_example(ex, vocabs))
        .collect()
}

/// Render question ids back into words, dropping PAD/SOS/EOS.
/// Ids with no token are shown as `<id>`.
pub fn decode_question(ids: &[u32], vocab: &Vocabulary) -> String {
    ids.iter()
        .filter(|&&id| id != PAD_ID && id != SOS_ID && id != EOS_ID)
        .map(|&id| match vocab.token(id) {
            Some(token) => token.to_string(),
            None        => format!("<{id}>"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalizer::normalize_question;

    fn vocab() -> Vocabulary {
        Vocabulary::for_questions(["color", "cube", "is", "the", "what"])
    }

    #[test]
    fn test_framing_and_length() {
        let words = normalize_question("What color is the cube?");
        let ids   = encode_question(&words, &vocab()).unwrap();
        assert_eq!(ids.len(), words.len() + 2);
        assert_eq!(ids[0], SOS_ID);
        assert_eq!(*ids.last().unwrap(), EOS_ID);
        assert_eq!(ids[1], vocab().id("what").unwrap());
    }

    #[test]
    fn test_empty_question_is_sos_eos() {
        let none: [&str; 0] = [];
        assert_eq!(encode_question(&none, &vocab()).unwrap(), vec![SOS_ID, EOS_ID]);
    }

    #[test]
    fn test_unknown_token_fails() {
        let err = encode_question(&["what", "sphere"], &vocab()).unwrap_err();
        match err {
            DatasetError::UnknownToken { token, vocabulary } => {
                assert_eq!(token, "sphere");
                assert_eq!(vocabulary, "question");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_answer_encoding() {
        let answers = Vocabulary::for_answers(["no", "yes"]);
        assert_eq!(encode_answer("yes", &answers).unwrap(), 1);
        assert!(encode_answer("maybe", &answers).is_err());
    }

    #[test]
    fn test_decode_question_skips_markers() {
        let v   = vocab();
        let ids = encode_question(&["what", "color"], &v).unwrap();
        assert_eq!(decode_question(&ids, &v), "what color");
        assert_eq!(decode_question(&[SOS_ID, 99, EOS_ID, PAD_ID], &v), "<99>");
    }
}
