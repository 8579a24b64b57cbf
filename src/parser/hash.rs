//! Content hashing for paragraph ids and cache keys.

use md5::{Digest, Md5};

/// 32-bit multiplicative rolling hash (`h = h * 31 + c`).
///
/// Adequate for per-document uniqueness; collisions become possible on very
/// large documents.
pub fn rolling_hash(s: &str) -> u32 {
    s.chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}

/// Paragraph id derived from the dedup signature and running index.
pub fn paragraph_id(signature: &str, index: usize) -> String {
    format!("p-{:08x}", rolling_hash(&format!("{}#{}", signature, index)))
}

/// Heading anchor id derived from heading text.
pub fn anchor_id(text: &str, index: usize) -> String {
    format!("sec-{:08x}", rolling_hash(&format!("{}#{}", text, index)))
}

/// Content-addressed key for a caller-side parse cache.
///
/// Identical raw input always yields the same key.
pub fn content_key(raw: &str) -> String {
    format!("{:x}", Md5::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_hash_known_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_rolling_hash_wraps() {
        let long = "x".repeat(10_000);
        // Must not overflow-panic in debug builds
        let _ = rolling_hash(&long);
    }

    #[test]
    fn test_paragraph_id_format() {
        let id = paragraph_id("text|p|hello", 0);
        assert_eq!(id.len(), 10);
        assert!(id.starts_with("p-"));
        assert_ne!(id, paragraph_id("text|p|hello", 1));
        assert_eq!(id, paragraph_id("text|p|hello", 0));
    }

    #[test]
    fn test_content_key() {
        assert_eq!(content_key(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(content_key("<p>x</p>"), content_key("<p>x</p>"));
        assert_ne!(content_key("<p>x</p>"), content_key("<p>y</p>"));
    }
}
