//! Snippet and matched-line extraction for search results

/// Number of characters of page content shown in a snippet
pub const SNIPPET_CHARS: usize = 200;

/// Appended to every snippet, whether or not the content was cut
pub const ELLIPSIS: &str = "...";

/// First [`SNIPPET_CHARS`] characters of `content` followed by [`ELLIPSIS`]
pub fn make_snippet(content: &str) -> String {
    let mut snippet: String = content.chars().take(SNIPPET_CHARS).collect();
    snippet.push_str(ELLIPSIS);
    snippet
}

/// First line of `content` containing the raw query, ignoring case
///
/// Matches against the query string verbatim, not the parsed query, so a
/// multi-word or boolean query only matches a line holding it literally.
/// Returns an empty string when no line matches.
pub fn matching_line(content: &str, query: &str) -> String {
    let needle = query.to_lowercase();
    content
        .lines()
        .find(|line| line.to_lowercase().contains(&needle))
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_still_gets_ellipsis() {
        assert_eq!(make_snippet("Blake"), "Blake...");
        assert_eq!(make_snippet(""), "...");
    }

    #[test]
    fn test_long_content_is_cut_at_200_chars() {
        let content = "x".repeat(500);
        let snippet = make_snippet(&content);
        assert_eq!(snippet.chars().count(), SNIPPET_CHARS + ELLIPSIS.len());
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let content = "é".repeat(300);
        let snippet = make_snippet(&content);
        assert_eq!(snippet.chars().filter(|c| *c == 'é').count(), SNIPPET_CHARS);
    }

    #[test]
    fn test_matching_line_is_case_insensitive() {
        let content = "Contents\nWILLIAM BLAKE, Songs of Innocence\nblake again";
        assert_eq!(
            matching_line(content, "Blake"),
            "WILLIAM BLAKE, Songs of Innocence"
        );
    }

    #[test]
    fn test_matching_line_uses_raw_query() {
        let content = "Blake and Milton\nMilton Blake";
        assert_eq!(matching_line(content, "Milton Blake"), "Milton Blake");
        assert_eq!(matching_line(content, "Blake AND Milton"), "");
    }

    #[test]
    fn test_no_matching_line() {
        assert_eq!(matching_line("Songs of Experience", "Jerusalem"), "");
    }
}
