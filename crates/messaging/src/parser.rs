//! Numbered-list parser for generated copy.
//!
//! An item marker is one or more digits, a `.` and whitespace or end of
//! text. A marker counts when it opens a line (leading whitespace allowed)
//! or, inside a line, when it follows whitespace after sentence-ending
//! punctuation (`.`, `!`, `?`). Text up to the next marker belongs to the
//! item, with line breaks folded into single spaces. Text before the first
//! marker is preamble and is dropped. Text without any marker is a single
//! item.

/// Upper bound on messages returned to callers.
pub const MAX_MESSAGES: usize = 4;

const SENTENCE_END: [char; 3] = ['.', '!', '?'];

/// If a marker starts at byte `at`, the byte offset just past its `.`.
fn marker_at(text: &str, at: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if !bytes.get(at)?.is_ascii_digit() || (at > 0 && bytes[at - 1].is_ascii_digit()) {
        return None;
    }
    let digits = bytes[at..].iter().take_while(|b| b.is_ascii_digit()).count();
    let dot = at + digits;
    if bytes.get(dot) != Some(&b'.') {
        return None;
    }
    let body = dot + 1;
    if !text[body..].chars().next().map_or(true, char::is_whitespace) {
        return None;
    }

    let before = &text[..at];
    let line_prefix = before.rsplit('\n').next().unwrap_or_default();
    if line_prefix.trim().is_empty() {
        return Some(body);
    }
    let follows_space = before.chars().last().is_some_and(char::is_whitespace);
    if follows_space && before.trim_end().ends_with(SENTENCE_END) {
        return Some(body);
    }
    None
}

/// Start and body offset of the first marker at or after `from`.
fn find_marker(text: &str, from: usize) -> Option<(usize, usize)> {
    (from..text.len()).find_map(|at| marker_at(text, at).map(|body| (at, body)))
}

fn fold_lines(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lazy iterator over the items of a numbered list, without their numbers.
pub struct NumberedItems<'a> {
    text: &'a str,
    next_marker: Option<usize>,
    unmarked: Option<&'a str>,
}

impl<'a> NumberedItems<'a> {
    pub fn new(text: &'a str) -> Self {
        match find_marker(text, 0) {
            Some((start, _)) => Self {
                text,
                next_marker: Some(start),
                unmarked: None,
            },
            None => {
                let whole = text.trim();
                Self {
                    text,
                    next_marker: None,
                    unmarked: (!whole.is_empty()).then_some(whole),
                }
            }
        }
    }
}

impl Iterator for NumberedItems<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(whole) = self.unmarked.take() {
            return Some(whole.to_string());
        }
        loop {
            let start = self.next_marker.take()?;
            let body_start = marker_at(self.text, start)?;
            let following = find_marker(self.text, body_start);
            self.next_marker = following.map(|(at, _)| at);
            let body_end = self.next_marker.unwrap_or(self.text.len());
            let item = fold_lines(&self.text[body_start..body_end]);
            if !item.is_empty() {
                return Some(item);
            }
        }
    }
}

/// Parse generated text into at most [`MAX_MESSAGES`] messages, re-numbered
/// `1.`, `2.`, ... in order.
pub fn parse_messages(text: &str) -> Vec<String> {
    NumberedItems::new(text)
        .take(MAX_MESSAGES)
        .enumerate()
        .map(|(i, msg)| format!("{}. {}", i + 1, msg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_items() {
        let text = "1. Hi [Customer Name], we miss you!\n2. Your cart is waiting.\n3. 20% off today only.";
        assert_eq!(
            parse_messages(text),
            vec![
                "1. Hi [Customer Name], we miss you!",
                "2. Your cart is waiting.",
                "3. 20% off today only.",
            ]
        );
    }

    #[test]
    fn test_renumbers_and_caps() {
        let text = "3. a\n\n7. b\n8. c\n9. d\n10. e\n";
        assert_eq!(parse_messages(text), vec!["1. a", "2. b", "3. c", "4. d"]);
    }

    #[test]
    fn test_preamble_dropped_and_continuations_joined() {
        let text = "Sure! Here are your messages:\n\n1. First line\n   continues here\n2.   Second  \n";
        assert_eq!(
            parse_messages(text),
            vec!["1. First line continues here", "2. Second"]
        );
    }

    #[test]
    fn test_inline_numbers_are_not_markers() {
        let text = "1. Buy 2. Get one free\n2. Spend 5.5 and save";
        assert_eq!(
            parse_messages(text),
            vec!["1. Buy 2. Get one free", "2. Spend 5.5 and save"]
        );
        assert_eq!(marker_at("2.5 stars", 0), None);
        assert_eq!(marker_at("12.", 0), Some(3));
        assert_eq!(marker_at("12. x", 1), None);
    }

    #[test]
    fn test_single_line_list_is_split() {
        let text = "1. Hi [Customer Name]! 2. Come back soon. 3. 10% off today.";
        assert_eq!(
            parse_messages(text),
            vec![
                "1. Hi [Customer Name]!",
                "2. Come back soon.",
                "3. 10% off today.",
            ]
        );
    }

    #[test]
    fn test_inline_marker_needs_sentence_end() {
        let text = "Here you go! 1. Buy 2. Get one free. 2. Last call, [Customer Name]";
        assert_eq!(
            parse_messages(text),
            vec!["1. Buy 2. Get one free.", "2. Last call, [Customer Name]"]
        );
        // A colon does not end a sentence, so the number stays in the text.
        assert_eq!(parse_messages("Note: 1. Hello"), vec!["1. Note: 1. Hello"]);
    }

    #[test]
    fn test_unnumbered_text_is_one_item() {
        assert_eq!(parse_messages("  Just one message  "), vec!["1. Just one message"]);
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        assert!(parse_messages("").is_empty());
        assert!(parse_messages("   \n  ").is_empty());
        assert!(parse_messages("1.\n2. \n").is_empty());
    }
}
