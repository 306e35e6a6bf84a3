//! Text normalization helpers shared by the heuristics.

/// Lowercase and drop everything that is not alphanumeric.
///
/// `user_email`, `User-Email` and `userEmail` all become `useremail`.
pub(crate) fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase with whitespace collapsed to single spaces.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `cap` characters of `text`.
pub(crate) fn truncate_chars(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact() {
        assert_eq!(compact("user_email"), "useremail");
        assert_eq!(compact("User-Email Address"), "useremailaddress");
        assert_eq!(compact("Résumé"), "résumé");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  First\n  Name "), "first name");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("éèê", 2), "éè");
    }
}
