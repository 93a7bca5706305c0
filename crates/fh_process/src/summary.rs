use fh_core::config::{PipelineConfig, SummaryStrategy};

use crate::clean::clean_html;
use crate::matcher::contains_term;

pub const ELLIPSIS: &str = "...";

/// Words that make a sentence worth keeping in a summary.
const IMPORTANT_WORDS: &[&str] = &[
    "発表", "発売", "公開", "開始", "リリース", "新機能", "初", "最新", "提供", "登場",
    "announce", "announced", "launch", "launches", "release", "released", "new", "first",
    "unveil", "unveils",
];

const SENTENCE_ENDINGS: &[char] = &['。', '！', '？', '.', '!', '?'];

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cuts `text` to `max_length` characters, backing off to the last space when
/// it sits in the final fifth, and appends an ellipsis.
pub fn truncate_summary(text: &str, max_length: usize) -> String {
    let text = text.trim();
    if char_len(text) <= max_length {
        return text.to_string();
    }

    let truncated = take_chars(text, max_length);
    let cut = match truncated.rfind(' ') {
        Some(idx) if char_len(&truncated[..idx]) * 5 > max_length * 4 => &truncated[..idx],
        _ => truncated,
    };
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if SENTENCE_ENDINGS.contains(&c) {
            let end = idx + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

pub fn score_sentence(sentence: &str) -> u32 {
    let lower = sentence.to_lowercase();
    let mut score = IMPORTANT_WORDS
        .iter()
        .filter(|word| contains_term(&lower, word))
        .count() as u32
        * 2;
    let len = char_len(sentence);
    if (20..=120).contains(&len) {
        score += 2;
    } else if (10..20).contains(&len) {
        score += 1;
    }
    if sentence.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    score
}

/// Joins the best scoring sentences, highest score first, then fits the
/// result into `max_length`, preferring to end on a sentence boundary.
pub fn sentence_summary(text: &str, max_length: usize, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return String::new();
    }

    let mut ranked: Vec<(usize, u32)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| (i, score_sentence(s)))
        .collect();
    // Stable: equal scores keep their original order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let joined = ranked
        .iter()
        .take(max_sentences.max(1))
        .map(|(i, _)| sentences[*i])
        .collect::<Vec<_>>()
        .join(" ");

    if char_len(&joined) <= max_length {
        return joined;
    }

    let window = take_chars(&joined, max_length);
    let boundary = window
        .char_indices()
        .filter(|(_, c)| SENTENCE_ENDINGS.contains(c))
        .map(|(idx, c)| idx + c.len_utf8())
        .last();
    match boundary {
        Some(end) if char_len(&window[..end]) * 2 >= max_length => window[..end].to_string(),
        _ => truncate_summary(&joined, max_length),
    }
}

/// Builds the summary for an article body according to the configured
/// strategy. Empty input yields an empty summary.
pub fn create_summary(text: &str, config: &PipelineConfig) -> String {
    let clean = clean_html(text);
    if clean.is_empty() {
        return clean;
    }
    match config.summary_strategy {
        SummaryStrategy::Truncate => truncate_summary(&clean, config.summary_length),
        SummaryStrategy::Sentences => {
            sentence_summary(&clean, config.summary_length, config.summary_sentences)
        }
    }
}
