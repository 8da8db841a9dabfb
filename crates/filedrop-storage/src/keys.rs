//! Object key generation for contact-form attachments.
//!
//! Key format: `contact-files/{uuid}_{timestamp}_{sanitized-name}`. The UUID
//! makes keys collision-resistant, the timestamp keeps listings readable, and
//! the sanitized original name keeps objects identifiable by hand.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Fixed prefix under which all attachments are stored.
pub const KEY_PREFIX: &str = "contact-files";

/// Replace every character outside `[A-Za-z0-9가-힣.\-_]` with `_`.
///
/// Hangul is preserved so Korean filenames stay readable in the key;
/// whitespace and anything else that could confuse URL or header handling
/// becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ('가'..='힣').contains(&c) || matches!(c, '.' | '-' | '_')
            {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Generate a unique object key for an attachment.
///
/// Returns the key and the sanitized filename embedded in it.
pub fn generate_object_key(original_name: &str, now: DateTime<Utc>) -> (String, String) {
    let safe_name = sanitize_file_name(original_name);
    let timestamp = now.format("%Y%m%dT%H%M%S");
    let key = format!("{}/{}_{}_{}", KEY_PREFIX, Uuid::new_v4(), timestamp, safe_name);
    (key, safe_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitize_keeps_ascii_and_hangul() {
        assert_eq!(sanitize_file_name("plan.docx"), "plan.docx");
        assert_eq!(sanitize_file_name("사업계획서.hwp"), "사업계획서.hwp");
        assert_eq!(sanitize_file_name("my plan (v2).pdf"), "my_plan__v2_.pdf");
        assert_eq!(sanitize_file_name("a\tb\nc.zip"), "a_b_c.zip");
        assert_eq!(sanitize_file_name("résumé.pdf"), "r_sum_.pdf");
    }

    #[test]
    fn key_contains_prefix_timestamp_and_sanitized_name() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let (key, safe_name) = generate_object_key("my plan.docx", now);

        assert!(key.starts_with("contact-files/"));
        assert!(key.contains("_20250314T150926_"));
        assert!(key.ends_with("my_plan.docx"));
        assert_eq!(safe_name, "my_plan.docx");
    }

    #[test]
    fn keys_are_unique_per_call() {
        let now = Utc::now();
        let (a, _) = generate_object_key("plan.docx", now);
        let (b, _) = generate_object_key("plan.docx", now);
        assert_ne!(a, b);
    }

    #[test]
    fn key_never_contains_separators_or_whitespace() {
        // Dots survive sanitization, but separators never do, so a hostile
        // name cannot address a path outside the prefix.
        let now = Utc::now();
        let (key, _) = generate_object_key("../../etc/passwd .pdf", now);
        let object_part = key.strip_prefix("contact-files/").unwrap();
        assert!(!object_part.contains('/'));
        assert!(!object_part.contains('\\'));
        assert!(!key.contains(' '));
    }
}
