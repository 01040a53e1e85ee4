//! Utterance normalization

/// Lower-case and trim an utterance for matching
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// True if the utterance has no visible characters
pub fn is_blank(utterance: &str) -> bool {
    utterance.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  How MUCH?  "), "how much?");
        assert_eq!(normalize("\tHi\n"), "hi");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \n\t"));
        assert!(!is_blank(" a "));
    }
}
