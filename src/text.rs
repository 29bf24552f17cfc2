//! Helpful utilities for working with text.

/// Cuts `text` down to at most `max_chars` characters.
///
/// Truncation counts characters, not bytes, so multi-byte characters are
/// never split.
///
/// # Examples
///
/// ```
/// use subreport::text::truncate;
/// assert_eq!(truncate("Announcing Rust 1.86.0", 15), "Announcing Rust");
/// assert_eq!(truncate("short", 15), "short");
/// assert_eq!(truncate("héllo wörld", 7), "héllo w");
/// ```
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Encodes `text` as Latin-1 bytes, replacing anything Latin-1 can't
/// represent with `?`.
///
/// The standard PDF fonts only cover Latin-1.
///
/// # Examples
///
/// ```
/// use subreport::text::to_latin1;
/// assert_eq!(to_latin1("café"), b"caf\xe9");
/// assert_eq!(to_latin1("🦀 Rust"), b"? Rust");
/// ```
pub fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}
