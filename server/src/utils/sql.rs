//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Only applied when the filter compiler runs with wildcard escaping enabled;
/// by default criteria values keep their wildcard meaning.
///
/// # Example
///
/// ```
/// use clinica_server::utils::sql::escape_like_pattern;
///
/// let user_input = "100% dosis_max";
/// let pattern = format!("%{}%", escape_like_pattern(user_input));
/// assert_eq!(pattern, "%100\\% dosis\\_max%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Whether `s` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
