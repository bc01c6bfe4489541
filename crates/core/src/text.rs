//! Text helpers for listing views.

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `limit` characters without splitting a word.
///
/// Text that already fits is returned unchanged. Otherwise the result is the
/// longest prefix of at most `limit` characters that ends at a word boundary,
/// right-trimmed, followed by [`ELLIPSIS`]. When the first word alone exceeds
/// the limit there is no boundary to cut at and the word is cut at `limit`.
///
/// # Example
///
/// ```rust
/// use orchard_core::text::limit_words;
///
/// assert_eq!(limit_words("The quick brown fox", 12), "The quick...");
/// assert_eq!(limit_words("short", 12), "short");
/// ```
#[must_use]
pub fn limit_words(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }

    // Byte index of the first character past the limit.
    let cut = text
        .char_indices()
        .nth(limit)
        .map_or(text.len(), |(idx, _)| idx);
    let (head, rest) = text.split_at(cut);

    let ends_on_boundary = rest.starts_with(char::is_whitespace)
        || head.ends_with(char::is_whitespace);

    let kept = if ends_on_boundary {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(space) => head.split_at(space).0,
            None => head,
        }
    };

    let mut out = kept.trim_end().to_owned();
    out.push_str(ELLIPSIS);
    out
}
