use ammonia;

/// Clean comment HTML using the ammonia library.
///
/// Whitelist-based: safe inline tags (like <b>, <p>) survive, dangerous tags
/// (like <script>, <iframe>) are removed with their content, and event
/// attributes (like onclick) are stripped. Plain text is entity-escaped, so
/// the result is only fit for checking what would render, not for storage.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
