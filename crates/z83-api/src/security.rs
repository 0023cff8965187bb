//! Input sanitization and validation helpers.

/// Maximum length of free-text fields (descriptions, cover letters, addresses).
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Maximum length of short fields (names, titles).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Extensions accepted for uploaded profile documents.
pub const ALLOWED_DOCUMENT_EXTENSIONS: [&str; 6] = ["pdf", "doc", "docx", "png", "jpg", "jpeg"];

/// Strip control characters (except newline and tab) and cap length.
pub fn sanitize_text(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(MAX_TEXT_LENGTH)
        .collect()
}

/// Trim and cap a single-line field.
pub fn sanitize_title(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_TITLE_LENGTH)
        .collect()
}

/// Validate an uploaded file name. No path traversal, no separators.
pub fn is_valid_file_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 256 {
        return false;
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
}

/// Lowercased extension of `name` if it is an accepted document type.
pub fn document_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_DOCUMENT_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_validation() {
        assert!(is_valid_file_name("cv.pdf"));
        assert!(is_valid_file_name("Jane Doe CV_2024-v2.docx"));
        assert!(!is_valid_file_name(""));
        assert!(!is_valid_file_name("../etc/passwd"));
        assert!(!is_valid_file_name("dir/cv.pdf"));
        assert!(!is_valid_file_name("dir\\cv.pdf"));
        assert!(!is_valid_file_name("cv$.pdf"));
    }

    #[test]
    fn test_document_extension() {
        assert_eq!(document_extension("cv.PDF").as_deref(), Some("pdf"));
        assert_eq!(document_extension("scan.jpeg").as_deref(), Some("jpeg"));
        assert_eq!(document_extension("script.sh"), None);
        assert_eq!(document_extension("noext"), None);
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  hello\u{0007}\nworld  "), "hello\nworld");
        assert_eq!(sanitize_text(&"a".repeat(MAX_TEXT_LENGTH + 10)).len(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("  Data\tAnalyst "), "DataAnalyst");
    }
}
