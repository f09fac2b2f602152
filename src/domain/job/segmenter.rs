use once_cell::sync::Lazy;
use regex::Regex;

static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("valid regex"));

const SENTENCE_SEPARATOR: &str = ". ";
const SENTENCE_SEPARATOR_LEN: usize = 2;

/// Split text into chunks of whole sentences, each shorter than `max_chunk_chars`.
///
/// Sentences are delimited by `.`, trimmed, and re-joined with `". "`. A
/// sentence that alone reaches the bound becomes its own chunk. Text without
/// any `.` is returned whole (trimmed). Lengths are counted in characters.
pub fn segment(text: &str, max_chunk_chars: usize) -> Vec<String> {
    let normalized = NEWLINES.replace_all(text, " ");

    if !normalized.contains('.') {
        let trimmed = normalized.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in normalized.split('.').map(str::trim).filter(|s| !s.is_empty()) {
        let sentence_len = sentence.chars().count();

        if !current.is_empty() && current_len + sentence_len + SENTENCE_SEPARATOR_LEN >= max_chunk_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(sentence);
        current.push_str(SENTENCE_SEPARATOR);
        current_len += sentence_len + SENTENCE_SEPARATOR_LEN;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
