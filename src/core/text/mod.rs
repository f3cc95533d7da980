use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use html2text::render::text_renderer::{TaggedLine, TextDecorator};

/// Maximum number of characters kept in a feed excerpt.
pub const EXCERPT_LIMIT: usize = 180;

const TEXT_WIDTH: usize = 4096;

const NAIVE_DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];
const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Formats a raw feed or project date as `Jan 01, 2024`.
///
/// Empty input yields an empty string; input that does not parse as a date
/// is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match parse_date(trimmed) {
        Some(date) => date.format("%b %d, %Y").to_string(),
        None => raw.to_string(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc2822(value) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    if let Some(timestamp) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(timestamp.date());
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Extracts the text content of an HTML fragment.
///
/// The fragment is parsed by `html2text`, which never executes scripts and
/// drops `script`/`style` bodies. Only text nodes reach the output: list
/// bullets, heading and quote prefixes, table borders and image alt text are
/// all suppressed. Whitespace runs collapse to single spaces.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let rendered = html2text::config::with_decorator(TextContent)
        .raw_mode(true)
        .string_from_read(html.as_bytes(), TEXT_WIDTH);
    match rendered {
        Ok(text) => collapse_whitespace(&text),
        Err(error) => {
            tracing::debug!("html fragment could not be rendered as text: {error}");
            String::new()
        }
    }
}

/// Decorator that emits nothing but the document's own text.
#[derive(Debug, Clone, Copy)]
struct TextContent;

impl TextDecorator for TextContent {
    type Annotation = ();

    fn decorate_link_start(&mut self, _url: &str) -> (String, ()) {
        (String::new(), ())
    }

    fn decorate_link_end(&mut self) -> String {
        String::new()
    }

    fn decorate_em_start(&self) -> (String, ()) {
        (String::new(), ())
    }

    fn decorate_em_end(&self) -> String {
        String::new()
    }

    fn decorate_strong_start(&self) -> (String, ()) {
        (String::new(), ())
    }

    fn decorate_strong_end(&self) -> String {
        String::new()
    }

    fn decorate_strikeout_start(&self) -> (String, ()) {
        (String::new(), ())
    }

    fn decorate_strikeout_end(&self) -> String {
        String::new()
    }

    fn decorate_code_start(&self) -> (String, ()) {
        (String::new(), ())
    }

    fn decorate_code_end(&self) -> String {
        String::new()
    }

    fn decorate_preformat_first(&self) {}

    fn decorate_preformat_cont(&self) {}

    // Alt and title attributes are not text content.
    fn decorate_image(&mut self, _src: &str, _title: &str) -> (String, ()) {
        (String::new(), ())
    }

    fn header_prefix(&self, _level: usize) -> String {
        String::new()
    }

    fn quote_prefix(&self) -> String {
        String::new()
    }

    fn unordered_item_prefix(&self) -> String {
        String::new()
    }

    fn ordered_item_prefix(&self, _index: i64) -> String {
        String::new()
    }

    fn make_subblock_decorator(&self) -> Self {
        TextContent
    }

    fn decorate_superscript_start(&self) -> (String, ()) {
        (String::new(), ())
    }

    fn decorate_superscript_end(&self) -> String {
        String::new()
    }

    fn finalise(&mut self, _links: Vec<String>) -> Vec<TaggedLine<()>> {
        Vec::new()
    }
}

/// Truncates on character boundaries, keeping at most `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

/// Plain-text summary of an HTML description, at most [`EXCERPT_LIMIT`] characters.
pub fn excerpt(html: &str) -> String {
    truncate_chars(&html_to_text(html), EXCERPT_LIMIT)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escapes text or attribute values interpolated into rendered markup.
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match escape_char(c) {
            Some(entity) => escaped.push_str(entity),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
