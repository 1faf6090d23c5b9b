//! Integration Tests for URL Encoding
//!
//! Validator + vocabulary + encoder working together on realistic URLs.

#[cfg(test)]
mod integration_tests {
    use crate::constants::{FALLBACK_CODE, MAX_LEN, PAD_CODE};
    use crate::logic::features::{encode, Vocabulary};
    use crate::logic::validator::is_valid;

    /// Lowercase letters, digits and common URL punctuation, codes from 2
    fn url_vocab() -> Vocabulary {
        let alphabet = "abcdefghijklmnopqrstuvwxyz0123456789:/.-_?=&%";
        let entries: Vec<String> = alphabet
            .chars()
            .enumerate()
            .map(|(i, ch)| format!("{:?}: {}", ch.to_string(), i + 2))
            .collect();
        Vocabulary::from_json_str(&format!("{{{}}}", entries.join(", "))).unwrap()
    }

    #[test]
    fn test_valid_urls_always_encode_to_max_len() {
        let vocab = url_vocab();
        let long_path = format!("https://example.com/{}", "a".repeat(500));
        let urls = [
            "a.io",
            "https://example.com/path",
            "www.google.com",
            long_path.as_str(),
        ];

        for url in urls {
            assert!(is_valid(url), "{} should be valid", url);
            let seq = encode(url, &vocab, MAX_LEN);
            assert_eq!(seq.len(), MAX_LEN, "wrong length for {}", url);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let vocab = url_vocab();
        let url = "http://login-secure.example.net/verify?id=42";
        assert_eq!(encode(url, &vocab, MAX_LEN), encode(url, &vocab, MAX_LEN));
    }

    #[test]
    fn test_long_url_keeps_prefix() {
        let vocab = url_vocab();
        let url = format!("https://example.com/{}", "b".repeat(400));
        let seq = encode(&url, &vocab, MAX_LEN);

        // Scheme survives, nothing is padded
        assert_eq!(seq.as_slice()[0], vocab.code_for('h'));
        assert_eq!(seq.as_slice()[4], vocab.code_for('s'));
        assert_eq!(seq.content_len(), MAX_LEN);
        assert!(!seq.as_slice().contains(&PAD_CODE));
    }

    #[test]
    fn test_uppercase_maps_to_fallback() {
        let vocab = url_vocab();
        let seq = encode("HTTPS://Example.com", &vocab, MAX_LEN);

        assert_eq!(seq.as_slice()[0], FALLBACK_CODE);
        assert_eq!(seq.as_slice()[8], FALLBACK_CODE);
        assert_eq!(seq.as_slice()[9], vocab.code_for('x'));
        assert_eq!(seq.content_len(), "HTTPS://Example.com".len());
    }
}
