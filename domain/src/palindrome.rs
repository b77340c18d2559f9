//! Palindrome classification in two modes: strict and normalized.
//!
//! Both checks are pure, deterministic, and total over any string input.

/// Returns true if `s` reads identically forwards and backwards, comparing
/// raw bytes positionally.
///
/// An empty string is a palindrome; a single character is a palindrome.
/// Comparison is byte-wise, so mixed case or punctuation breaks symmetry
/// ("Racecar" is not a strict palindrome).
pub fn is_palindrome_strict(s: &str) -> bool {
    let bytes = s.as_bytes();
    let len = bytes.len();
    (0..len / 2).all(|i| bytes[i] == bytes[len - 1 - i])
}

/// Returns true if `s` is a palindrome after discarding every character
/// outside `[A-Za-z0-9]` and lowercasing the remainder.
pub fn is_palindrome(s: &str) -> bool {
    let normalized: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    is_palindrome_strict(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_empty_string() {
        assert!(is_palindrome_strict(""));
    }

    #[test]
    fn strict_single_character() {
        assert!(is_palindrome_strict("a"));
    }

    #[test]
    fn strict_even_and_odd_lengths() {
        assert!(is_palindrome_strict("abba"));
        assert!(is_palindrome_strict("racecar"));
    }

    #[test]
    fn strict_is_case_sensitive() {
        assert!(!is_palindrome_strict("Racecar"));
    }

    #[test]
    fn strict_rejects_non_palindromes() {
        assert!(!is_palindrome_strict("palindrome"));
        assert!(!is_palindrome_strict("ab"));
    }

    #[test]
    fn normalized_ignores_case_and_punctuation() {
        assert!(is_palindrome("A man, a plan, a canal: Panama"));
        assert!(is_palindrome("No 'x' in Nixon"));
    }

    #[test]
    fn normalized_true_where_strict_is_false() {
        assert!(is_palindrome("racecar!"));
        assert!(!is_palindrome_strict("racecar!"));
    }

    #[test]
    fn normalized_rejects_non_palindromes() {
        assert!(!is_palindrome("hello, world"));
    }

    #[test]
    fn normalized_empty_after_stripping() {
        // Nothing but punctuation normalizes to the empty string
        assert!(is_palindrome("?!, .;"));
    }
}
