/// Parses the generator's raw reply into candidate prompt strings.
///
/// Keeps only lines that start with a list number ("1." or "1)") followed by
/// whitespace, strips the numbering, trims, and drops anything left empty.
/// A reply matching no numbered line yields an empty list, not an error.
pub fn parse_candidates(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(strip_numbering)
        .map(|s| s.to_string())
        .collect()
}

fn strip_numbering(line: &str) -> Option<&str> {
    let trimmed = line.trim();

    let after_digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() == trimmed.len() {
        return None; // no leading list number
    }

    let mut chars = after_digits.chars();
    if !matches!(chars.next(), Some('.') | Some(')')) {
        return None;
    }

    // The numbering must be followed by whitespace, not glued to the text
    let rest = chars.as_str();
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_lines_kept_and_stripped() {
        let raw = "1) Write about a lost object\n2. Describe a childhood kitchen\n\n3) ...\nnotes: ignore this";

        assert_eq!(
            parse_candidates(raw),
            vec![
                "Write about a lost object",
                "Describe a childhood kitchen",
                "..."
            ]
        );
    }

    #[test]
    fn test_unnumbered_reply_yields_no_candidates() {
        let raw = "Here are some ideas:\n- a bullet\n- another bullet";
        assert!(parse_candidates(raw).is_empty());
    }

    #[test]
    fn test_numbering_glued_to_text_is_dropped() {
        assert!(parse_candidates("1)no space after the marker").is_empty());
    }

    #[test]
    fn test_multi_digit_numbering_works() {
        assert_eq!(
            parse_candidates("12. Two-digit numbering"),
            vec!["Two-digit numbering"]
        );
    }

    #[test]
    fn test_numbering_with_nothing_behind_is_dropped() {
        assert!(parse_candidates("4.   ").is_empty());
    }

    #[test]
    fn test_indented_numbered_lines_are_kept() {
        assert_eq!(
            parse_candidates("  3. An indented candidate"),
            vec!["An indented candidate"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_candidates("").is_empty());
    }
}
