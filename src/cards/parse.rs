//! Parsing of LLM summarization responses.
//!
//! The prompt contract asks for a numbered list of key points with quote
//! bullets underneath. Models mostly comply; this parser tolerates leading
//! prose, blank lines, and over-long lists by dropping the excess.

use super::KeyPoint;
use regex::Regex;

/// Parse a completion response into key points with supporting quotes.
///
/// Lines matching `N. text` open a new key point; `- text` lines attach a
/// quote to the current point; other lines continue the preceding quote or
/// point text. At most `max_points` points and `max_quotes` quotes per
/// point are kept.
pub fn parse_key_points(content: &str, max_points: usize, max_quotes: usize) -> Vec<KeyPoint> {
    let point_re = Regex::new(r"^\d+[.)]\s+(.*)$").expect("Invalid regex");
    let quote_re = Regex::new(r"^[-*]\s+(.*)$").expect("Invalid regex");

    let mut points: Vec<KeyPoint> = Vec::new();
    // Quotes seen for the current point, including dropped overflow
    let mut quotes_seen = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = point_re.captures(line) {
            let text = strip_emphasis(&caps[1]);
            points.push(KeyPoint {
                text,
                quotes: Vec::new(),
            });
            quotes_seen = 0;
            continue;
        }

        // Everything before the first numbered point is preamble
        let Some(current) = points.last_mut() else {
            continue;
        };

        if let Some(caps) = quote_re.captures(line) {
            quotes_seen += 1;
            if quotes_seen <= max_quotes {
                current.quotes.push(strip_emphasis(&caps[1]));
            }
        } else if let Some(last_quote) = current.quotes.last_mut() {
            // Wrapped continuation of a multi-sentence quote
            last_quote.push(' ');
            last_quote.push_str(line);
        } else {
            current.text.push(' ');
            current.text.push_str(line);
        }
    }

    points.truncate(max_points);
    points
}

/// Remove markdown bold/italic markers and surrounding quote characters.
fn strip_emphasis(text: &str) -> String {
    text.trim()
        .trim_matches('*')
        .trim_matches('"')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_points_with_quotes() {
        let content = "\
Here is the summary you asked for:

1. The host argues that spaced repetition beats cramming.
- \"Every study we looked at showed the same curve. Retention collapses without review.\"
- \"I stopped cramming entirely. My recall doubled within a month.\"
2. **Sleep consolidates memory.**
- \"The hippocampus replays the day during deep sleep. That replay is the learning.\"";

        let points = parse_key_points(content, 10, 3);
        assert_eq!(points.len(), 2);
        assert_eq!(
            points[0].text,
            "The host argues that spaced repetition beats cramming."
        );
        assert_eq!(points[0].quotes.len(), 2);
        assert_eq!(points[1].text, "Sleep consolidates memory.");
        assert_eq!(
            points[1].quotes[0],
            "The hippocampus replays the day during deep sleep. That replay is the learning."
        );
    }

    #[test]
    fn test_caps_are_enforced() {
        let mut content = String::new();
        for i in 1..=14 {
            content.push_str(&format!("{}. Point number {}\n", i, i));
            for q in 1..=5 {
                content.push_str(&format!("- Quote {} for point {}\n", q, i));
            }
        }

        let points = parse_key_points(&content, 10, 3);
        assert_eq!(points.len(), 10);
        assert!(points.iter().all(|p| p.quotes.len() <= 3));
    }

    #[test]
    fn test_quote_continuation_lines_are_joined() {
        let content = "\
1. One point.
- A quote that the model wrapped
  across two lines.";

        let points = parse_key_points(content, 10, 3);
        assert_eq!(points[0].quotes.len(), 1);
        assert_eq!(
            points[0].quotes[0],
            "A quote that the model wrapped across two lines."
        );
    }

    #[test]
    fn test_parenthesized_numbering() {
        let points = parse_key_points("1) First\n2) Second", 10, 3);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].text, "Second");
    }

    #[test]
    fn test_no_numbered_points_yields_nothing() {
        let points = parse_key_points("The model refused to answer.", 10, 3);
        assert!(points.is_empty());
    }
}
