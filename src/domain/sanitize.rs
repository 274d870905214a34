//! Name sanitization for filesystem-safe keys.

/// Strips every non-word character from a display name.
///
/// Word characters are ASCII alphanumerics and underscores; everything
/// else (spaces, punctuation, non-ASCII) is dropped. The result is used as
/// the filesystem-facing part of journal and record keys, while the raw
/// name is kept for display.
///
/// The mapping is lossy: distinct names can sanitize to the same key.
///
/// # Examples
///
/// ```
/// use audiolog::domain::sanitize_name;
///
/// assert_eq!(sanitize_name("Work Notes!"), "WorkNotes");
/// assert_eq!(sanitize_name("trip_2024"), "trip_2024");
/// assert_eq!(sanitize_name("!!!"), "");
/// ```
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
