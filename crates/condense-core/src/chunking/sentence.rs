//! Sentence boundary splitting
//!
//! A sentence ends at `.`, `!` or `?` when the terminator is directly followed
//! by whitespace. The whitespace run is dropped; everything else is kept as-is.

/// Characters that can end a sentence
const TERMINATORS: [char; 3] = ['.', '!', '?'];

fn is_terminator(ch: char) -> bool {
    TERMINATORS.contains(&ch)
}

/// Split text into sentences, in order.
///
/// Text without any terminator is returned as a single sentence. Empty pieces
/// are never emitted, so empty input yields an empty vector.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_terminator(ch) {
            continue;
        }

        let end = idx + ch.len_utf8();
        let mut resume = None;
        while let Some(&(next_idx, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            resume = Some(next_idx + next.len_utf8());
            chars.next();
        }

        if let Some(resume) = resume {
            push_piece(&mut sentences, &text[start..end]);
            start = resume;
        }
    }

    push_piece(&mut sentences, &text[start..]);
    sentences
}

fn push_piece<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    if !piece.is_empty() {
        sentences.push(piece);
    }
}
