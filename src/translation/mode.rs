//! Translation modes.
//!
//! A mode picks the template variant within a language family.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::ui::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TranslationMode {
    /// Natural, idiomatic target text.
    #[default]
    Smooth,
    /// Close to the source wording and structure.
    Literal,
}

/// All modes with a short description.
pub const MODES: &[(TranslationMode, &str)] = &[
    (
        TranslationMode::Smooth,
        "Natural, idiomatic, reads like native prose",
    ),
    (
        TranslationMode::Literal,
        "Close to source wording, keeps sentence structure",
    ),
];

impl TranslationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Literal => "literal",
        }
    }

    pub fn description(self) -> &'static str {
        MODES
            .iter()
            .find(|(mode, _)| *mode == self)
            .map_or("", |(_, desc)| desc)
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TranslationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smooth" => Ok(Self::Smooth),
            "literal" => Ok(Self::Literal),
            _ => Err(Error::InvalidConfiguration(format!(
                "Invalid translation mode: '{s}'\n\nAvailable modes: smooth, literal"
            ))),
        }
    }
}

/// Prints the available translation modes to stdout.
pub fn print_modes() {
    println!("{}", Style::header("Translation modes"));
    for (mode, description) in MODES {
        println!("  {} {}", Style::value(format!("{mode:8}")), Style::secondary(description));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("smooth".parse::<TranslationMode>().ok(), Some(TranslationMode::Smooth));
        assert_eq!("literal".parse::<TranslationMode>().ok(), Some(TranslationMode::Literal));
    }

    #[test]
    fn test_parse_unknown_mode() {
        let result = "natural".parse::<TranslationMode>();
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_default_is_smooth() {
        assert_eq!(TranslationMode::default(), TranslationMode::Smooth);
    }

    #[test]
    fn test_every_mode_has_description() {
        for (mode, _) in MODES {
            assert!(!mode.description().is_empty());
        }
    }
}
