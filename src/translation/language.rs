//! Source language codes understood by the prompt templates.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::ui::Style;

/// Source language of the text being translated.
///
/// Each code selects a family of prompt templates; `auto` lets the model
/// detect the language and `other` is the catch-all bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageCode {
    Auto,
    Zh,
    Hv,
    Th,
    Lo,
    En,
    Fr,
    Other,
}

/// Supported language codes and their names.
pub const SUPPORTED_LANGUAGES: &[(LanguageCode, &str)] = &[
    (LanguageCode::Auto, "Auto-detect"),
    (LanguageCode::Zh, "Chinese (classical and modern)"),
    (LanguageCode::Hv, "Sino-Vietnamese reading (Hán-Việt)"),
    (LanguageCode::Th, "Thai"),
    (LanguageCode::Lo, "Lao"),
    (LanguageCode::En, "English"),
    (LanguageCode::Fr, "French"),
    (LanguageCode::Other, "Other"),
];

impl LanguageCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Zh => "zh",
            Self::Hv => "hv",
            Self::Th => "th",
            Self::Lo => "lo",
            Self::En => "en",
            Self::Fr => "fr",
            Self::Other => "other",
        }
    }

}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_LANGUAGES
            .iter()
            .map(|(code, _)| *code)
            .find(|code| code.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "Invalid language code: '{s}'\n\n\
                     Valid language codes: auto, zh, hv, th, lo, en, fr, other\n\
                     Run 'vntl languages' to see all supported codes."
                ))
            })
    }
}

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported source language codes"));
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {} {}", Style::code(format!("{code:6}")), Style::secondary(name));
    }
}
