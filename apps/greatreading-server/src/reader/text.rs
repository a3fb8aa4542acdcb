//! Text segmentation helpers for the reading view

/// Longest paragraph, in characters, that can still be treated as a heading
const MAX_HEADING_CHARS: usize = 100;
/// Headings longer than this many words are never detected
const MAX_HEADING_WORDS: usize = 6;
/// Selection pronunciation reads at most this many words
pub const MAX_SPOKEN_WORDS: usize = 10;

/// Split page text into sentences.
///
/// A boundary is a run of whitespace directly preceded by `.`, `!` or `?`;
/// the whitespace is consumed and fragments that are empty or whitespace-only
/// are dropped. Abbreviations such as "Mr." split like any other full stop.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut after_terminator = false;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if after_terminator && ch.is_whitespace() {
            let mut end = index + ch.len_utf8();
            while let Some(&(next_index, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_index + next.len_utf8();
                chars.next();
            }
            push_fragment(&mut sentences, &text[start..index]);
            start = end;
            after_terminator = false;
            continue;
        }
        after_terminator = matches!(ch, '.' | '!' | '?');
    }
    push_fragment(&mut sentences, &text[start..]);

    sentences
}

fn push_fragment<'a>(out: &mut Vec<&'a str>, fragment: &'a str) {
    if !fragment.trim().is_empty() {
        out.push(fragment);
    }
}

/// Split page text into paragraphs on runs of two or more newlines
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' && bytes.get(i + 1) == Some(&b'\n') {
            let mut end = i + 2;
            while bytes.get(end) == Some(&b'\n') {
                end += 1;
            }
            push_fragment(&mut paragraphs, &text[start..i]);
            start = end;
            i = end;
        } else {
            i += 1;
        }
    }
    push_fragment(&mut paragraphs, &text[start..]);

    paragraphs
}

/// Rendering heuristic: short, unpunctuated, mostly capitalized paragraphs
/// are displayed as headings.
pub fn is_heading(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADING_CHARS {
        return false;
    }
    if trimmed.ends_with(&['.', ',', ';'][..]) {
        return false;
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() > MAX_HEADING_WORDS {
        return false;
    }

    let capitalized = words
        .iter()
        .filter(|word| {
            word.chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        })
        .count();

    capitalized * 2 >= words.len()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '\'' || c == '-'
}

/// Keep only letters, apostrophes and hyphens
pub fn clean_word(word: &str) -> String {
    word.chars().filter(|&c| is_word_char(c)).collect()
}

/// Everything [`clean_word`] strips, in order
pub fn word_punctuation(word: &str) -> String {
    word.chars().filter(|&c| !is_word_char(c)).collect()
}

/// The dictionary word captured by a double-click selection.
///
/// Multi-word selections and selections without any word characters yield
/// `None`.
pub fn selected_word(selection: &str) -> Option<String> {
    let trimmed = selection.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return None;
    }

    let word = clean_word(trimmed);
    (!word.is_empty()).then_some(word)
}

/// The phrase spoken when a selection is released: its first words, joined
/// by single spaces.
pub fn spoken_phrase(selection: &str) -> Option<String> {
    let words: Vec<&str> = selection.split_whitespace().take(MAX_SPOKEN_WORDS).collect();
    (!words.is_empty()).then(|| words.join(" "))
}
