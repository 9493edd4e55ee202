use regex::Regex;

/// Derives the clean, speakable form of message content.
///
/// Used only for speech, never for display. The pipeline order is fixed:
/// tags, heading markers, bold, italic, images, links, inline code,
/// zero-width characters, whitespace collapse, trim. Images are dropped
/// before link unwrapping so image syntax disappears entirely instead of
/// leaving its alt text behind a stray `!`.
pub struct SpeechTextNormalizer {
    html_tags: Regex,
    heading_markers: Regex,
    bold: Regex,
    italic: Regex,
    image: Regex,
    link: Regex,
    inline_code: Regex,
    zero_width: Regex,
    whitespace: Regex,
}

impl SpeechTextNormalizer {
    pub fn new() -> Self {
        Self {
            html_tags: Regex::new(r"<[^>]*>").unwrap(),
            heading_markers: Regex::new(r"#{1,6}\s+").unwrap(),
            bold: Regex::new(r"\*\*(.*?)\*\*").unwrap(),
            italic: Regex::new(r"\*(.*?)\*").unwrap(),
            image: Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap(),
            link: Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(),
            inline_code: Regex::new(r"`([^`]+)`").unwrap(),
            zero_width: Regex::new(r"[\u{200B}-\u{200D}\u{FEFF}]").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Returns `""` for input that normalizes to nothing; callers treat
    /// that as "nothing to speak" and skip silently.
    ///
    /// Unwrapping one marker can splice together a new match for a pass
    /// that already ran (`` `*`a`*` `` becomes ``` ``a`` ``` after the
    /// italic pass), so the pipeline reruns until the text stops
    /// changing. No pass ever lengthens the text, so this terminates.
    pub fn normalize(&self, content: &str) -> String {
        let mut text = self.clean_once(content);
        loop {
            let next = self.clean_once(&text);
            if next == text {
                return text;
            }
            text = next;
        }
    }

    fn clean_once(&self, content: &str) -> String {
        let cleaned = self.html_tags.replace_all(content, "");
        let cleaned = self.heading_markers.replace_all(&cleaned, "");
        let cleaned = self.bold.replace_all(&cleaned, "$1");
        let cleaned = self.italic.replace_all(&cleaned, "$1");
        let cleaned = self.image.replace_all(&cleaned, "");
        let cleaned = self.link.replace_all(&cleaned, "$1");
        let cleaned = self.inline_code.replace_all(&cleaned, "$1");
        let cleaned = self.zero_width.replace_all(&cleaned, "");
        let cleaned = self.whitespace.replace_all(&cleaned, " ");

        cleaned.trim().to_string()
    }
}

impl Default for SpeechTextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn normalize(content: &str) -> String {
        SpeechTextNormalizer::new().normalize(content)
    }

    #[test]
    fn test_normalize_strips_html_tags() {
        assert_eq!(normalize("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_normalize_strips_heading_markers() {
        assert_eq!(normalize("## Monuments of Delhi"), "Monuments of Delhi");
        assert_eq!(normalize("### Sub"), "Sub");
    }

    #[test]
    fn test_normalize_unwraps_emphasis() {
        assert_eq!(normalize("**bold** and *italic*"), "bold and italic");
    }

    #[test]
    fn test_normalize_keeps_link_text() {
        assert_eq!(normalize("see [Taj Mahal](https://example.com)"), "see Taj Mahal");
    }

    #[test]
    fn test_normalize_drops_images_entirely() {
        assert_eq!(normalize("before ![a photo](img.png) after"), "before after");
    }

    #[test]
    fn test_normalize_unwraps_inline_code() {
        assert_eq!(normalize("run `ls` now"), "run ls now");
    }

    #[test]
    fn test_normalize_strips_zero_width_characters() {
        assert_eq!(normalize("a\u{200B}b\u{FEFF}c"), "abc");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("too    many\n\nspaces"), "too many spaces");
    }

    #[test]
    fn test_normalize_empty_results() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
        assert_eq!(normalize("<div></div>"), "");
    }

    #[test]
    fn test_normalize_unwraps_markers_spliced_by_earlier_passes() {
        // The italic pass turns `*`a`*` into ``a``; the code pass must
        // then get another look at the text it produced.
        assert_eq!(normalize("`*`a`*`"), "a");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = SpeechTextNormalizer::new();
        let samples = [
            "",
            "plain text",
            "## Heading\n**bold** *italic* `code`",
            "[link](url) and ![img](url)",
            "a < b > c",
            "odd *marker and ** another",
            "mixed   \u{200B} whitespace\tand\nnewlines",
            "**bold *and italic***",
            "`*`a`*`",
            "*`*b*`*",
        ];

        for sample in samples {
            let once = normalizer.normalize(sample);
            let twice = normalizer.normalize(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }
}
