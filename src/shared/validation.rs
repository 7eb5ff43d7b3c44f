use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for labels that must contain at least one visible character
    /// - Valid: "Books", "  Sci-Fi ", "7"
    /// - Invalid: "", "   ", "\t\n"
    pub static ref NON_BLANK_REGEX: Regex = Regex::new(r"\S").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_regex_valid() {
        assert!(NON_BLANK_REGEX.is_match("Books"));
        assert!(NON_BLANK_REGEX.is_match("  Sci-Fi "));
        assert!(NON_BLANK_REGEX.is_match("7"));
    }

    #[test]
    fn test_non_blank_regex_invalid() {
        assert!(!NON_BLANK_REGEX.is_match(""));
        assert!(!NON_BLANK_REGEX.is_match("   "));
        assert!(!NON_BLANK_REGEX.is_match("\t\n"));
    }
}
