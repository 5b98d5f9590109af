use std::collections::HashSet;

/// Strips every HTML tag and returns plain text.
///
/// ammonia emits entity-encoded text, which is decoded again here because the
/// stored value is plain text and templates escape on output.
pub fn strip_all_html(input: &str) -> String {
    let cleaned = ammonia::Builder::new()
        .tags(HashSet::new())
        .clean(input)
        .to_string();
    html_escape::decode_html_entities(&cleaned).trim().to_string()
}
