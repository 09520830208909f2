//! Content hash used to detect edited chunks.
//!
//! djb2 variant (`h = h * 33 ^ unit`) over UTF-16 code units with 32-bit
//! wrapping arithmetic, rendered as lowercase hex. Not collision resistant;
//! it only has to notice that a chunk's text changed since it was embedded.

const SEED: u32 = 5381;

pub fn content_hash(text: &str) -> String {
    let h = text
        .encode_utf16()
        .fold(SEED, |h, unit| h.wrapping_mul(33) ^ u32::from(unit));
    format!("{h:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(content_hash(""), "1505");
        assert_eq!(content_hash("a"), "2b5c4");
        assert_eq!(
            content_hash("Title\n\nBody text that is long enough to wrap around"),
            "50141aa3"
        );
    }

    #[test]
    fn astral_chars_hash_as_surrogate_pairs() {
        assert_eq!(content_hash("😀"), "50fe98");
    }

    #[test]
    fn edits_change_the_hash() {
        assert_ne!(content_hash("Plan\n\n5 GB"), content_hash("Plan\n\n6 GB"));
    }
}
