use unicode_normalization::UnicodeNormalization;

/// Case-insensitive, punctuation-stripped, Unicode-NFKC loose-token-match
/// normalization (spec §9's resolution of the validator's underspecified
/// "loose token match").
pub fn loose_normalize(s: &str) -> String {
    s.nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Whether `needle` appears as a substring of `haystack` once both are
/// loosely normalized.
pub fn loose_contains(haystack: &str, needle: &str) -> bool {
    let needle = loose_normalize(needle);
    if needle.trim().is_empty() {
        return false;
    }
    loose_normalize(haystack).contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_punctuation_and_case() {
        assert_eq!(loose_normalize("Baltimore, MD!"), "baltimore md");
    }

    #[test]
    fn contains_matches_across_case_and_punctuation() {
        assert!(loose_contains("current conditions for BALTIMORE, MD", "Baltimore"));
    }

    #[test]
    fn empty_needle_never_matches() {
        assert!(!loose_contains("anything", ""));
    }
}
