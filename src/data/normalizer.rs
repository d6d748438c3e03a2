// ============================================================
// Layer 4 — Question/Answer Normaliser
// ============================================================
// Turns raw CLEVR strings into the exact tokens the vocabulary
// is built from. Build time and encode time must agree on this
// byte for byte, so it is the only place text is touched.
//
// Question steps (applied in order):
//   1. Lower-case
//   2. Collapse every whitespace run (spaces, tabs, newlines)
//      into one space and trim the ends
//   3. Drop the trailing question mark, if there is one
//   4. Split on single spaces, discarding empty fragments
//
// Answers get steps 1 and 2 only and stay one label, so a
// multi-word answer is a single vocabulary entry.
//
// Example:
//   "What   color IS the cube?"  →  ["what", "color", "is", "the", "cube"]
//
// Reference: Rust Book §8 (Strings in Rust)

/// Sentence-terminal mark every CLEVR question ends with
const QUESTION_MARK: char = '?';

/// Normalise a question into its ordered word tokens.
/// Text without any words yields an empty Vec.
pub fn normalize_question(text: &str) -> Vec<String> {
    let collapsed = collapse_whitespace(&text.to_lowercase());
    let body = collapsed
        .strip_suffix(QUESTION_MARK)
        .unwrap_or(collapsed.as_str());

    body.split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalise an answer into a single label
pub fn normalize_answer(text: &str) -> String {
    collapse_whitespace(&text.to_lowercase())
}

/// Replace each whitespace run with one space and trim both ends
fn collapse_whitespace(text: &str) -> String {
    let mut out        = String::with_capacity(text.len());
    let mut last_space = true;

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}
