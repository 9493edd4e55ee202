use serde::{Deserialize, Serialize};

/// A typed fragment of paragraph text used for structured display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Span {
    Plain(String),
    Bold(String),
    Italic(String),
}

/// One display node derived from a single line of message content.
///
/// Recomputable at any time from `Message.content`; never mutated after
/// parsing. Heading levels are 2 (`## `) and 3 (`### `), matching the
/// two levels the assistant's replies actually use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    Heading { level: u8, text: String },
    Paragraph { spans: Vec<Span> },
    Blank,
}
