use super::model::{ContentNode, Span};

/// Parse raw message content into display nodes, one node per line.
///
/// Total over any input: malformed markers degrade to literal text and
/// never fail. Empty input yields no nodes. Lines are processed
/// independently; a heading or emphasis marker never spans lines.
pub fn parse(content: &str) -> Vec<ContentNode> {
    if content.is_empty() {
        return Vec::new();
    }

    content.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> ContentNode {
    if let Some(text) = line.strip_prefix("## ") {
        ContentNode::Heading {
            level: 2,
            text: text.to_string(),
        }
    } else if let Some(text) = line.strip_prefix("### ") {
        ContentNode::Heading {
            level: 3,
            text: text.to_string(),
        }
    } else if line.trim().is_empty() {
        ContentNode::Blank
    } else if line.contains('*') {
        ContentNode::Paragraph {
            spans: extract_spans(line),
        }
    } else {
        ContentNode::Paragraph {
            spans: vec![Span::Plain(line.to_string())],
        }
    }
}

/// Inline span extraction: the bold pass runs over the whole span list
/// first, then the italic pass over the plain spans that survive it, so
/// a `**` run is resolved before `*` sees the remaining `*` characters.
/// Left-to-right by marker, not a nested grammar.
fn extract_spans(line: &str) -> Vec<Span> {
    let spans = vec![Span::Plain(line.to_string())];
    let spans = split_on_marker(spans, "**", Span::Bold);
    split_on_marker(spans, "*", Span::Italic)
}

/// Split every plain span on `marker`. Fewer than 3 parts means the
/// marker occurs at most once there, so an unmatched or odd occurrence
/// stays literal text. Otherwise even-index parts are literal (dropped
/// when empty) and odd-index parts become emphasis spans.
fn split_on_marker(spans: Vec<Span>, marker: &str, emphasis: fn(String) -> Span) -> Vec<Span> {
    let mut result = Vec::new();

    for span in spans {
        let Span::Plain(text) = span else {
            result.push(span);
            continue;
        };

        let parts: Vec<&str> = text.split(marker).collect();
        if parts.len() < 3 {
            result.push(Span::Plain(text));
            continue;
        }

        for (i, part) in parts.iter().enumerate() {
            if i % 2 == 0 {
                if !part.is_empty() {
                    result.push(Span::Plain((*part).to_string()));
                }
            } else {
                result.push(emphasis((*part).to_string()));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(text: &str) -> Span {
        Span::Plain(text.to_string())
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse(""), Vec::new());
    }

    #[test]
    fn test_parse_headings_and_paragraph() {
        let nodes = parse("## A\n### B\nC");
        assert_eq!(
            nodes,
            vec![
                ContentNode::Heading {
                    level: 2,
                    text: "A".to_string()
                },
                ContentNode::Heading {
                    level: 3,
                    text: "B".to_string()
                },
                ContentNode::Paragraph {
                    spans: vec![plain("C")]
                },
            ]
        );
    }

    #[test]
    fn test_parse_blank_lines() {
        let nodes = parse("a\n\n   \nb");
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[1], ContentNode::Blank);
        assert_eq!(nodes[2], ContentNode::Blank);
    }

    #[test]
    fn test_parse_trailing_newline_yields_blank() {
        let nodes = parse("a\n");
        assert_eq!(
            nodes,
            vec![
                ContentNode::Paragraph {
                    spans: vec![plain("a")]
                },
                ContentNode::Blank,
            ]
        );
    }

    #[test]
    fn test_parse_bold_split() {
        let nodes = parse("x **y** z");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![plain("x "), Span::Bold("y".to_string()), plain(" z")]
            }]
        );
    }

    #[test]
    fn test_parse_italic_split() {
        let nodes = parse("x *y* z");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![plain("x "), Span::Italic("y".to_string()), plain(" z")]
            }]
        );
    }

    #[test]
    fn test_parse_unmatched_marker_stays_literal() {
        let nodes = parse("x * y");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![plain("x * y")]
            }]
        );
    }

    #[test]
    fn test_parse_unmatched_bold_falls_through_to_italic() {
        // A lone "**" splits into 2 parts for the bold pass (left
        // untouched), then the italic pass sees 4 parts.
        let nodes = parse("a **b* c");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![
                    plain("a "),
                    Span::Italic("".to_string()),
                    plain("b"),
                    Span::Italic(" c".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn test_parse_nested_emphasis_is_left_to_right() {
        // The bold pass captures everything between the first two "**"
        // runs; the italic pass does not look inside the bold span.
        let nodes = parse("**bold *and italic***");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![Span::Bold("bold *and italic".to_string()), plain("*")]
            }]
        );
    }

    #[test]
    fn test_parse_multiple_bold_runs() {
        let nodes = parse("**a** and **b**");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![
                    Span::Bold("a".to_string()),
                    plain(" and "),
                    Span::Bold("b".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn test_parse_bold_and_italic_in_one_line() {
        let nodes = parse("**a** then *b*");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![
                    Span::Bold("a".to_string()),
                    plain(" then "),
                    Span::Italic("b".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn test_parse_one_node_per_line() {
        let input = "## h\ntext\n\n*i*\nplain **b** end";
        let nodes = parse(input);
        assert_eq!(nodes.len(), input.split('\n').count());
    }

    #[test]
    fn test_parse_heading_marker_without_space_is_paragraph() {
        let nodes = parse("##no-space");
        assert_eq!(
            nodes,
            vec![ContentNode::Paragraph {
                spans: vec![plain("##no-space")]
            }]
        );
    }
}
