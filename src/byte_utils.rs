//! Utilities for working [u8]

/// Render bytes for diagnostics, escaping anything that is not printable.
pub fn as_bstr(input: &[u8]) -> String {
    let mut result = String::new();

    for e in input {
        match char::from_u32(*e as u32) {
            Some('\n') => result += "\\n",
            Some('\r') => result += "\\r",
            Some('\t') => result += "\\t",
            Some('"') => result += "\\\"",
            Some('\\') => result += "\\\\",
            Some(c) if c == ' ' || c.is_ascii_graphic() => result.push(c),
            Some(_) | None => result += format!("\\x{e:02x}").as_str(),
        }
    }

    result
}

/// The bytes around `position`, at most `radius` on each side, rendered
/// with [`as_bstr`].
pub fn excerpt(input: &[u8], position: usize, radius: usize) -> String {
    let start = position.saturating_sub(radius);
    let end = position.saturating_add(radius + 1).min(input.len());
    if start >= end {
        return String::new();
    }
    as_bstr(&input[start..end])
}
