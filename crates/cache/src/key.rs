use sha2::{Digest, Sha256};

/// Builds the content-addressed cache key: SHA-256 of the four fields
/// joined by the unit separator (spec §4.5), so a hit never crosses
/// conversational context since the last assistant turn's fingerprint is
/// folded in.
pub fn cache_key(
    normalized_query: &str,
    intent_label: &str,
    entity_fingerprint: &str,
    last_assistant_turn_fingerprint: &str,
) -> String {
    let joined = format!(
        "{normalized_query}\x1f{intent_label}\x1f{entity_fingerprint}\x1f{last_assistant_turn_fingerprint}"
    );
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_produce_same_key() {
        let a = cache_key("what's the weather", "weather", "location=baltimore", "");
        let b = cache_key("what's the weather", "weather", "location=baltimore", "");
        assert_eq!(a, b);
    }

    #[test]
    fn differing_last_turn_fingerprint_changes_key() {
        let a = cache_key("q", "weather", "e", "");
        let b = cache_key("q", "weather", "e", "prior-context");
        assert_ne!(a, b);
    }

    #[test]
    fn key_is_64_hex_chars() {
        let k = cache_key("q", "weather", "e", "");
        assert_eq!(k.len(), 64);
        assert!(k.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
