// src/utils/html.rs

/// Whitelist-based HTML sanitization for author-supplied question text.
///
/// Safe inline tags (<b>, <code>) survive; <script>, <iframe> and event-handler
/// attributes are stripped along with their content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
