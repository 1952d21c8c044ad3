//! `**bold**` inline emphasis.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BOLD_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold markup pattern is a valid regex"));

/// A run of text that is either bold or regular.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn regular(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Splits a line into spans, turning each `**x**` pair into a bold `x`.
///
/// An unpaired `**` is left in the text as-is. Empty spans are dropped.
pub fn parse_emphasis(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in BOLD_MARKUP.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::regular(&line[last..whole.start()]));
        }
        if !inner.as_str().is_empty() {
            spans.push(Span::bold(inner.as_str()));
        }
        last = whole.end();
    }
    if last < line.len() {
        spans.push(Span::regular(&line[last..]));
    }

    spans
}

/// Removes every `**` marker.
pub fn strip_emphasis(line: &str) -> String {
    line.replace("**", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_line_is_one_regular_span() {
        assert_eq!(parse_emphasis("Owned the CI pipeline"), vec![Span::regular("Owned the CI pipeline")]);
    }

    #[test]
    fn test_marked_spans_become_bold() {
        assert_eq!(
            parse_emphasis("• Tuned **Spark** jobs and **Kafka** topics"),
            vec![
                Span::regular("• Tuned "),
                Span::bold("Spark"),
                Span::regular(" jobs and "),
                Span::bold("Kafka"),
                Span::regular(" topics"),
            ]
        );
    }

    #[test]
    fn test_unpaired_marker_is_literal() {
        assert_eq!(parse_emphasis("5 ** 2 = 25"), vec![Span::regular("5 ** 2 = 25")]);
    }

    #[test]
    fn test_whole_line_bold() {
        assert_eq!(parse_emphasis("**Acme**"), vec![Span::bold("Acme")]);
    }

    #[test]
    fn test_empty_pair_is_dropped() {
        assert_eq!(parse_emphasis("a****b"), vec![Span::regular("a"), Span::regular("b")]);
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("**Acme** | Engineer"), "Acme | Engineer");
    }
}
