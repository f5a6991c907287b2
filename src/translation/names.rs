//! Name and title extraction for building a glossary.
//!
//! The completion provider is asked for a JSON object `{"items": [...]}`
//! listing the proper nouns and formal titles in the opening part of the
//! text. Replies are parsed leniently: code fences and surrounding prose are
//! tolerated, and a reply with no usable JSON is split on list separators.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::assembler::{AssembledPrompt, Segment, SegmentRole};
use super::client::TranslationClient;
use super::glossary::term_key;
use super::language::LanguageCode;
use crate::error::Result;

/// Leading characters of the input sent for extraction.
pub const NAME_SAMPLE_CHARS: usize = 20_000;

/// Most names kept from one reply.
pub const MAX_NAMES: usize = 250;

/// Longer items are fragments of sentences, not names.
const MAX_NAME_CHARS: usize = 100;

#[derive(Deserialize)]
struct NameList {
    items: Vec<Value>,
}

/// Builds the extraction request for the first [`NAME_SAMPLE_CHARS`]
/// characters of `text`.
pub fn extraction_prompt(text: &str, language: LanguageCode) -> AssembledPrompt {
    let sample = text
        .char_indices()
        .nth(NAME_SAMPLE_CHARS)
        .map_or(text, |(end, _)| &text[..end]);

    let system = format!(
        "You are an expert linguistic annotator.\n\
         Extract ONLY proper nouns and formal titles from the text: person names, place names, \
         official titles, noble ranks, era names, institutions.\n\
         Return STRICT JSON only.\n\
         Schema: {{\"items\": [\"...\"]}}\n\
         Rules:\n\
         - Return at most {MAX_NAMES} items.\n\
         - Each item must be a short single-line string (no newlines).\n\
         - Do NOT include explanations.\n\
         - Do NOT include duplicates.\n\
         - Do NOT include sentences.\n\
         - No markdown. No code fences."
    );
    let user = format!(
        "Source language: {language}\n\
         Task: Extract unique name/title strings that should be standardized in translation.\n\n\
         Return JSON only:\n\
         {{\"items\": [\"...\"]}}\n\n\
         Text:\n{sample}"
    );

    AssembledPrompt {
        segments: vec![
            Segment {
                role: SegmentRole::System,
                text: system,
            },
            Segment {
                role: SegmentRole::User,
                text: user,
            },
        ],
    }
}

/// Asks `client` for the names and titles in `text`.
pub async fn extract_names<C: TranslationClient + ?Sized>(
    client: &C,
    text: &str,
    language: LanguageCode,
) -> Result<Vec<String>> {
    let prompt = extraction_prompt(text, language);
    let reply = client.translate(&prompt).await?;
    let names = parse_names(&reply);
    crate::debug!("Extracted {} name(s) from the reply", names.len());
    Ok(names)
}

/// Cleans, filters and dedupes the items of an extraction reply, keeping
/// their first-seen order.
pub fn parse_names(reply: &str) -> Vec<String> {
    let items: Vec<String> = json_items(reply).map_or_else(
        || {
            strip_code_fence(reply)
                .split(['\n', ',', '，', '、', ';', '；'])
                .map(str::to_string)
                .collect()
        },
        |items| {
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect()
        },
    );

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for item in items {
        let name = clean_item(&item);
        if is_noise(&name) || !seen.insert(term_key(&name)) {
            continue;
        }
        names.push(name);
        if names.len() >= MAX_NAMES {
            break;
        }
    }
    names
}

fn json_items(reply: &str) -> Option<Vec<Value>> {
    let body = strip_code_fence(reply);
    if let Ok(list) = serde_json::from_str::<NameList>(body) {
        return Some(list.items);
    }
    if let Ok(items) = serde_json::from_str::<Vec<Value>>(body) {
        return Some(items);
    }

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<NameList>(&body[start..=end])
        .ok()
        .map(|list| list.items)
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Collapses whitespace and strips bullets, numbering and wrapping quotes.
fn clean_item(item: &str) -> String {
    let joined = item.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut name = joined.trim_start_matches(['-', '•', '*']).trim_start();

    let digits = name.len() - name.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let after = &name[digits..];
        let rest = after.trim_start_matches([')', '.', '-', ' ']);
        if rest.len() < after.len() {
            name = rest;
        }
    }

    for quote in ['"', '\''] {
        if name.len() >= 2 && name.starts_with(quote) && name.ends_with(quote) {
            name = name[1..name.len() - 1].trim();
        }
    }
    name.to_string()
}

fn is_noise(name: &str) -> bool {
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return true;
    }
    if name.contains(['{', '}', '[', ']']) {
        return true;
    }
    let lower = name.to_lowercase();
    if ["items:", "json", "output", "schema"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return true;
    }
    // Several clause marks mean a sentence slipped through.
    name.chars()
        .filter(|c| matches!(c, '，' | '。' | '；' | ';' | ',' | ':'))
        .count()
        >= 3
}
