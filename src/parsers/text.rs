//! Plain-text normalization for extracted page content.

use encoding_rs::{Encoding, UTF_8};

/// Decodes a response body into text using its declared charset.
///
/// Unknown or missing labels fall back to UTF-8. A leading byte order mark
/// is honored and dropped; malformed sequences become U+FFFD.
pub fn decode_body(body: &[u8], charset: Option<&str>) -> String {
    let encoding = match charset {
        Some(label) => Encoding::for_label(label.trim().as_bytes()).unwrap_or_else(|| {
            ::log::debug!("Unknown charset {:?}, decoding as UTF-8", label);
            UTF_8
        }),
        None => UTF_8,
    };

    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors {
        ::log::debug!("Body had malformed {} sequences", used.name());
    }
    decoded.into_owned()
}

/// Joins text nodes with newlines.
///
/// Each node is trimmed and nodes that are empty after trimming are
/// dropped, so the result has no blank lines and no surrounding whitespace.
pub fn join_text_nodes<'a, I>(nodes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    nodes
        .into_iter()
        .map(str::trim)
        .filter(|node| !node.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
