const MAX_SLUG_SEGMENTS: usize = 10;

/// URL slug for a question: non-word runs become `-`, lowercased,
/// first ten segments.
pub fn create_slug(content: &str) -> String {
    let mut slug = String::with_capacity(content.len());
    let mut in_separator = false;
    for c in content.chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.extend(c.to_lowercase());
            in_separator = false;
        } else if !in_separator {
            slug.push('-');
            in_separator = true;
        }
    }
    slug.split('-')
        .take(MAX_SLUG_SEGMENTS)
        .collect::<Vec<_>>()
        .join("-")
}

/// Path of a question page.
pub fn question_href(question_id: &str, content: &str) -> String {
    format!("/questions/{question_id}/{}", create_slug(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_collapses_punctuation() {
        assert_eq!(
            create_slug("What is a B-tree, and why?"),
            "what-is-a-b-tree-and-why-"
        );
    }

    #[test]
    fn test_slug_keeps_ten_segments() {
        let content = "one two three four five six seven eight nine ten eleven twelve";
        assert_eq!(
            create_slug(content),
            "one-two-three-four-five-six-seven-eight-nine-ten"
        );
    }

    #[test]
    fn test_href() {
        assert_eq!(question_href("q1", "Two Sum"), "/questions/q1/two-sum");
    }
}
