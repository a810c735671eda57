/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .trim_matches('.')
        .to_string()
}

/// Upper bound for generated file names; common filesystems allow 255 bytes.
pub const MAX_FILE_NAME_BYTES: usize = 200;

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }

    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= max)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// Build `<title>.<ext>`, falling back to `fallback` when the title sanitises
/// to nothing. The result never exceeds [`MAX_FILE_NAME_BYTES`].
pub fn output_file_name(title: &str, fallback: &str, ext: &str) -> String {
    let stem = [title, fallback]
        .iter()
        .map(|s| sanitize_filename(s))
        .find(|s| !s.is_empty())
        .unwrap_or_default();

    let budget = MAX_FILE_NAME_BYTES.saturating_sub(ext.len() + 1);
    let stem = truncate_at_char_boundary(&stem, budget)
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    let stem = if stem.is_empty() { "video" } else { stem };

    format!("{}.{}", stem, ext)
}
