//! Tag normalization shared by events and tasks

/// Lowercase and trim a single tag; `None` when nothing is left
pub fn normalize_one(tag: &str) -> Option<String> {
    let tag = tag.trim().to_lowercase();
    (!tag.is_empty()).then_some(tag)
}

/// Normalize a tag list: lowercased, blanks dropped, first occurrence wins
pub fn normalize<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if let Some(tag) = normalize_one(tag.as_ref()) {
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
    }
    out
}

/// Split comma separated user input into normalized tags
pub fn parse_list(input: &str) -> Vec<String> {
    normalize(input.split(','))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_first_occurrence() {
        assert_eq!(normalize(["Work", "home", "WORK", ""]), vec!["work", "home"]);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("family, Fun,,fun "), vec!["family", "fun"]);
        assert!(parse_list("  ").is_empty());
    }
}
