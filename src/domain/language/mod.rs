use serde::{Deserialize, Serialize};

/// Languages the speech pipeline can address, with their short codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechLang {
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
}

impl SpeechLang {
    /// Get the short language code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechLang::Hindi => "hi",
            SpeechLang::English => "en",
            SpeechLang::Bengali => "bn",
            SpeechLang::Tamil => "ta",
            SpeechLang::Telugu => "te",
        }
    }

    /// BCP-47 locale handed to TTS providers
    pub fn locale(&self) -> &'static str {
        match self {
            SpeechLang::Hindi => "hi-IN",
            SpeechLang::English => "en-IN",
            SpeechLang::Bengali => "bn-IN",
            SpeechLang::Tamil => "ta-IN",
            SpeechLang::Telugu => "te-IN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "hi" => Some(SpeechLang::Hindi),
            "en" => Some(SpeechLang::English),
            "bn" => Some(SpeechLang::Bengali),
            "ta" => Some(SpeechLang::Tamil),
            "te" => Some(SpeechLang::Telugu),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpeechLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify text by Unicode script block, first matching range wins.
///
/// The ranges are tested in a fixed order over the whole text, so
/// mixed-script input is classified by the first range that matches
/// anywhere, not by majority script. That is intentional: a reply that
/// quotes a Devanagari phrase should be spoken with the Hindi voice.
/// Total function, defaults to English.
pub fn detect_language(text: &str) -> SpeechLang {
    if has_char_in(text, '\u{0900}', '\u{097F}') {
        SpeechLang::Hindi
    } else if has_char_in(text, '\u{0980}', '\u{09FF}') {
        SpeechLang::Bengali
    } else if has_char_in(text, '\u{0B80}', '\u{0BFF}') {
        SpeechLang::Tamil
    } else if has_char_in(text, '\u{0C00}', '\u{0C7F}') {
        SpeechLang::Telugu
    } else {
        SpeechLang::English
    }
}

fn has_char_in(text: &str, lo: char, hi: char) -> bool {
    text.chars().any(|c| (lo..=hi).contains(&c))
}
