//! Token escaping for feature names written to text weight files.
//!
//! `%`, space, tab, `=`, `\n` and `\r` are percent-encoded anywhere in a name;
//! `#` and `-` are percent-encoded only in leading position. Decoding accepts
//! any `%XX` hex pair and leaves other `%` sequences untouched.
//!
//! The empty name is written as a lone `%`, a token `escape` never produces
//! for any other name since `%` itself encodes as `%25`.

use std::borrow::Cow;

const EMPTY_NAME_TOKEN: &str = "%";

/// Escapes `name` so it can be written as a bare token in a text weight file.
pub fn escape(name: &str) -> Cow<'_, str> {
    if name.is_empty() {
        return Cow::Borrowed(EMPTY_NAME_TOKEN);
    }
    let needs_escape = name
        .bytes()
        .enumerate()
        .any(|(position, byte)| is_reserved(byte, position == 0));
    if !needs_escape {
        return Cow::Borrowed(name);
    }

    let mut escaped = String::with_capacity(name.len() + 8);
    for (position, ch) in name.char_indices() {
        if ch.is_ascii() && is_reserved(ch as u8, position == 0) {
            escaped.push_str(&format!("%{:02X}", ch as u32));
        } else {
            escaped.push(ch);
        }
    }
    Cow::Owned(escaped)
}

/// Reverses [`escape`].
pub fn unescape(token: &str) -> Cow<'_, str> {
    if token == EMPTY_NAME_TOKEN {
        return Cow::Borrowed("");
    }
    if !token.contains('%') {
        return Cow::Borrowed(token);
    }

    let bytes = token.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    match String::from_utf8(decoded) {
        Ok(name) => Cow::Owned(name),
        Err(_) => Cow::Borrowed(token),
    }
}

fn is_reserved(byte: u8, leading: bool) -> bool {
    matches!(byte, b'%' | b' ' | b'\t' | b'=' | b'\n' | b'\r')
        || (leading && matches!(byte, b'#' | b'-'))
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|digit| digit as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn plain_names_are_borrowed() {
        assert!(matches!(escape("LanguageModel"), Cow::Borrowed(_)));
        assert!(matches!(unescape("LanguageModel"), Cow::Borrowed(_)));
    }

    #[rstest]
    #[case("a b", "a%20b")]
    #[case("a\tb", "a%09b")]
    #[case("x=y", "x%3Dy")]
    #[case("=y", "%3Dy")]
    #[case("#comment", "%23comment")]
    #[case("a#b", "a#b")]
    #[case("-neg", "%2Dneg")]
    #[case("a-b", "a-b")]
    #[case("100%", "100%25")]
    #[case("é è", "é%20è")]
    #[case("", "%")]
    #[case("%", "%25")]
    fn reserved_characters_are_encoded(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(escape(name), expected);
        assert_eq!(unescape(expected), name);
    }

    #[test]
    fn escaped_tokens_are_safe_as_bare_words() {
        for name in [" lead", "tab\there", "#x", "=x", "a = b", "multi\nline"] {
            let token = escape(name);
            assert!(!token.contains(' ') && !token.contains('\t') && !token.contains('\n'));
            assert!(!token.starts_with('#') && !token.starts_with('='));
            assert_eq!(unescape(&token), name);
        }
    }

    #[test]
    fn stray_percent_signs_survive_unescape() {
        assert_eq!(unescape("50%"), "50%");
        assert_eq!(unescape("%zz"), "%zz");
        assert_eq!(unescape("%4"), "%4");
    }
}
