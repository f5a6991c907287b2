//! Splitting of long documents into bounded, order-preserving chunks.
//!
//! Text is normalized before it is split:
//!
//! - `\r\n` and lone `\r` become `\n`
//! - trailing whitespace is removed from every line
//! - runs of blank lines collapse to a single blank line, and leading or
//!   trailing blank lines are dropped
//!
//! Every [`Chunk`] remembers the exact text that separated it from the
//! previous chunk, so [`join_source`] rebuilds the normalized document byte
//! for byte. Translated chunks are joined by [`join_translations`], which maps
//! each source separator to a blank line, a line break or a single space.
//!
//! Boundaries are tried in order: paragraphs, then sentences and line breaks,
//! then a hard split near the budget. The hard split only cuts at extended
//! grapheme cluster boundaries and avoids cutting inside an unclosed `<...>`
//! tag or right after a backslash. That protection is
//! best-effort; a window made entirely of one construct is still cut.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

/// Default chunk budget, in characters.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 6000;

const PARAGRAPH_BREAK: &str = "\n\n";

/// A bounded slice of the normalized source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in document order, starting at zero.
    pub index: usize,
    /// Text between the previous chunk and this one (empty for the first).
    pub separator: String,
    pub text: String,
}

impl Chunk {
    /// Length of the chunk text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// The model's output for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedChunk {
    pub index: usize,
    pub separator: String,
    pub text: String,
}

impl TranslatedChunk {
    pub fn new(chunk: &Chunk, text: String) -> Self {
        Self {
            index: chunk.index,
            separator: chunk.separator.clone(),
            text,
        }
    }
}

/// Applies the whitespace normalization described in the module docs.
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(text.len());
    let mut pending_break = false;

    for line in text.split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            pending_break = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_break { PARAGRAPH_BREAK } else { "\n" });
        }
        pending_break = false;
        out.push_str(line);
    }

    out
}

/// Splits `text` into chunks of at most `max_chunk_chars` characters.
///
/// Empty or whitespace-only input yields no chunks.
pub fn split(text: &str, max_chunk_chars: usize) -> Result<Vec<Chunk>> {
    if max_chunk_chars == 0 {
        return Err(Error::InvalidConfiguration(
            "max_chunk_chars must be greater than zero".to_string(),
        ));
    }

    let normalized = normalize(text);
    let mut builder = ChunkBuilder::new(max_chunk_chars);
    let mut prev_end = 0;
    let mut offset = 0;

    for paragraph in normalized.split(PARAGRAPH_BREAK) {
        let para_start = offset;
        offset += paragraph.len() + PARAGRAPH_BREAK.len();
        if paragraph.is_empty() {
            continue;
        }

        // Leading indentation travels with the separator so no unit starts
        // with whitespace.
        let body_start = para_start + (paragraph.len() - paragraph.trim_start().len());
        let body_end = para_start + paragraph.len();
        let separator = &normalized[prev_end..body_start];
        let body = &normalized[body_start..body_end];
        prev_end = body_end;

        if char_len(body) <= max_chunk_chars {
            builder.push(separator, body);
            continue;
        }

        for (i, (sentence_sep, sentence)) in sentences(body).into_iter().enumerate() {
            let separator = if i == 0 { separator } else { sentence_sep };
            if char_len(sentence) <= max_chunk_chars {
                builder.push(separator, sentence);
                continue;
            }
            for (j, (piece_sep, piece)) in hard_split(sentence, max_chunk_chars)
                .into_iter()
                .enumerate()
            {
                builder.push(if j == 0 { separator } else { piece_sep }, piece);
            }
        }
    }

    Ok(builder.finish())
}

/// Rebuilds the normalized source from its chunks.
pub fn join_source(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .flat_map(|c| [c.separator.as_str(), c.text.as_str()])
        .collect()
}

/// Joins translated chunks in index order.
pub fn join_translations(translated: &[TranslatedChunk]) -> String {
    let mut ordered: Vec<&TranslatedChunk> = translated.iter().collect();
    ordered.sort_by_key(|t| t.index);

    let mut out = String::new();
    for (i, chunk) in ordered.iter().enumerate() {
        if i > 0 {
            out.push_str(output_separator(&chunk.separator));
        }
        out.push_str(&chunk.text);
    }
    out
}

fn output_separator(source: &str) -> &'static str {
    if source.contains(PARAGRAPH_BREAK) {
        PARAGRAPH_BREAK
    } else if source.contains('\n') {
        "\n"
    } else {
        " "
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedy packer for units that are already within budget.
struct ChunkBuilder {
    max: usize,
    chunks: Vec<Chunk>,
    separator: String,
    text: String,
    len: usize,
}

impl ChunkBuilder {
    const fn new(max: usize) -> Self {
        Self {
            max,
            chunks: Vec::new(),
            separator: String::new(),
            text: String::new(),
            len: 0,
        }
    }

    fn push(&mut self, separator: &str, unit: &str) {
        let unit_len = char_len(unit);

        if !self.text.is_empty() {
            let packed = self.len + char_len(separator) + unit_len;
            if packed <= self.max {
                self.text.push_str(separator);
                self.text.push_str(unit);
                self.len = packed;
                return;
            }
            self.flush();
        }

        self.separator = separator.to_string();
        self.text = unit.to_string();
        self.len = unit_len;
    }

    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        self.chunks.push(Chunk {
            index: self.chunks.len(),
            separator: std::mem::take(&mut self.separator),
            text: std::mem::take(&mut self.text),
        });
        self.len = 0;
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }
}

/// Splits a paragraph body into `(separator, sentence)` units.
///
/// A unit ends after a run of terminators (plus closing quotes or brackets)
/// or before a line break. Whitespace after the end goes into the next
/// unit's separator.
fn sentences(paragraph: &str) -> Vec<(&str, &str)> {
    let mut units = Vec::new();
    let mut sep_start = 0;
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let end = if c == '\n' {
            i
        } else if is_terminator(c) {
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if is_terminator(next) || is_closer(next) {
                    end = j + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            // "3.14" and "e.g." inside a word are not sentence ends.
            let at_boundary = is_wide_terminator(c)
                || chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
            if !at_boundary {
                continue;
            }
            end
        } else {
            continue;
        };

        let mut sep_end = if c == '\n' { i + 1 } else { end };
        while let Some(&(j, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            sep_end = j + next.len_utf8();
            chars.next();
        }

        if end > start {
            units.push((&paragraph[sep_start..start], &paragraph[start..end]));
            sep_start = end;
        }
        start = sep_end;
    }

    if start < paragraph.len() {
        units.push((&paragraph[sep_start..start], &paragraph[start..]));
    }

    units
}

/// Cuts a unit that has no usable sentence boundary into pieces of at most
/// `max` characters.
fn hard_split(text: &str, max: usize) -> Vec<(&str, &str)> {
    let mut pieces = Vec::new();
    let mut sep_start = 0;
    let mut start = 0;

    while start < text.len() {
        let rest = &text[start..];
        let Some((limit, _)) = rest.char_indices().nth(max) else {
            pieces.push((&text[sep_start..start], rest));
            break;
        };

        let cut = cut_point(rest, limit, max);
        let after = &rest[cut..];
        let ws = after.len() - after.trim_start().len();

        pieces.push((&text[sep_start..start], &rest[..cut]));
        sep_start = start + cut;
        start += cut + ws;
    }

    pieces
}

/// Byte offset (in `rest`, at most `limit`) where a hard split should cut.
///
/// The result is always an extended grapheme cluster boundary unless the
/// first cluster alone is longer than the budget.
fn cut_point(rest: &str, limit: usize, max: usize) -> usize {
    let window = &rest[..limit];
    let mut cut = limit;

    // Prefer a word boundary in the second half of the window.
    let word_break = window
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(last_ws, _)| window[..last_ws].trim_end().len())
        .filter(|&run_start| run_start > 0 && char_len(&window[..run_start]) * 2 >= max);

    if let Some(run_start) = word_break {
        cut = run_start;
    } else {
        if let Some(open) = window.rfind('<')
            && open > 0
            && !window[open..].contains('>')
        {
            cut = open;
        }
        let trimmed = rest[..cut].trim_end().len();
        if trimmed > 0 {
            cut = trimmed;
        }
    }

    let boundaries: Vec<usize> = rest
        .grapheme_indices(true)
        .map(|(i, _)| i)
        .chain(std::iter::once(rest.len()))
        .skip(1)
        .take_while(|&i| i <= limit)
        .collect();

    boundaries
        .iter()
        .rev()
        .copied()
        .find(|&i| i <= cut && !rest[..i].ends_with('\\'))
        .or_else(|| boundaries.last().copied())
        .unwrap_or(limit)
}

const fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | ';') || is_wide_terminator(c)
}

const fn is_wide_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？' | '；' | '…' | '｡')
}

const fn is_closer(c: char) -> bool {
    matches!(
        c,
        '"' | '\''
            | ')'
            | ']'
            | '}'
            | '”'
            | '’'
            | '」'
            | '』'
            | '）'
            | '】'
            | '》'
            | '〉'
            | '»'
    )
}
