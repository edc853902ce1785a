//! Summary request and response types - the wire contract with the summariser.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relative summary length, sent to the backend as an opaque tier code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    Short,
    Medium,
    #[default]
    Long,
}

impl SummaryLength {
    /// Ordinal code understood by the backend
    pub fn code(self) -> u8 {
        match self {
            Self::Short => 1,
            Self::Medium => 2,
            Self::Long => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::Medium => "Medium",
            Self::Long => "Long",
        }
    }

    /// The next tier, wrapping around
    pub fn next(self) -> Self {
        match self {
            Self::Short => Self::Medium,
            Self::Medium => Self::Long,
            Self::Long => Self::Short,
        }
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" | "1" => Ok(Self::Short),
            "medium" | "2" => Ok(Self::Medium),
            "long" | "3" => Ok(Self::Long),
            other => Err(format!("unknown summary length: {}", other)),
        }
    }
}

/// Output shape requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    SingleParagraph,
    BulletPoints,
    Detailed,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 3] = [Self::SingleParagraph, Self::BulletPoints, Self::Detailed];

    /// Key recognised by the backend
    pub fn key(self) -> &'static str {
        match self {
            Self::SingleParagraph => "single_paragraph",
            Self::BulletPoints => "bullet_points",
            Self::Detailed => "detailed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SingleParagraph => "Single Paragraph",
            Self::BulletPoints => "Bullet Points",
            Self::Detailed => "Detailed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::SingleParagraph => Self::BulletPoints,
            Self::BulletPoints => Self::Detailed,
            Self::Detailed => Self::SingleParagraph,
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.key() == s)
            .ok_or_else(|| format!("unknown summary style: {}", s))
    }
}

/// Body of `POST /summarize`.
///
/// Exactly one of `url` and `text` is expected to be set; an empty input is
/// sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryRequest {
    /// Page to fetch and summarise
    pub url: Option<String>,
    /// Raw text to summarise
    pub text: Option<String>,
    /// Length tier: 1 (short), 2 (medium) or 3 (long)
    pub length: u8,
    /// One of `single_paragraph`, `bullet_points`, `detailed`
    pub summary_style: SummaryStyle,
}

impl SummaryRequest {
    /// Build a request from raw form inputs
    pub fn new(url: &str, text: &str, length: SummaryLength, style: SummaryStyle) -> Self {
        Self {
            url: non_empty(url),
            text: non_empty(text),
            length: length.code(),
            summary_style: style,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Successful response body
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    /// Markdown-formatted summary
    pub summary: String,
}

/// Structured failure body
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn length_codes_are_ordinal() {
        assert_eq!(SummaryLength::Short.code(), 1);
        assert_eq!(SummaryLength::Medium.code(), 2);
        assert_eq!(SummaryLength::Long.code(), 3);
    }

    #[test]
    fn request_serialises_empty_inputs_as_null() {
        let request = SummaryRequest::new(
            "https://example.com",
            "",
            SummaryLength::Medium,
            SummaryStyle::BulletPoints,
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "url": "https://example.com",
                "text": null,
                "length": 2,
                "summary_style": "bullet_points"
            })
        );
    }

    #[test]
    fn parses_cli_values() {
        assert_eq!("medium".parse::<SummaryLength>(), Ok(SummaryLength::Medium));
        assert_eq!("3".parse::<SummaryLength>(), Ok(SummaryLength::Long));
        assert!("huge".parse::<SummaryLength>().is_err());
        assert_eq!("detailed".parse::<SummaryStyle>(), Ok(SummaryStyle::Detailed));
        assert!("haiku".parse::<SummaryStyle>().is_err());
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(SummaryLength::Long.next(), SummaryLength::Short);
        assert_eq!(SummaryStyle::Detailed.next(), SummaryStyle::SingleParagraph);
    }
}
