//! Turns the HTML fragments the service stores into plain terminal text.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_BREAK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr)>").ok());
static LIST_ITEM: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)<li[^>]*>").ok());
static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());
static BLANK_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\n{3,}").ok());

fn replace_all(re: &LazyLock<Option<Regex>>, text: String, with: &str) -> String {
    match re.as_ref() {
        Some(re) => re.replace_all(&text, with).into_owned(),
        None => text,
    }
}

/// Strips tags, keeping paragraph and line breaks. Math markup is left as is.
pub fn html_to_text(html: &str) -> String {
    let text = replace_all(&BLOCK_BREAK, html.to_string(), "\n");
    let text = replace_all(&LIST_ITEM, text, "• ");
    let text = replace_all(&TAG, text, "");
    let text = decode_entities(&text);

    let text = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    replace_all(&BLANK_RUN, text, "\n\n").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_become_lines() {
        let html = "<h3>Fractions</h3>\n  <p>A fraction is <strong>part</strong> of a whole.</p><p>1/2 &lt; 3/4</p>";
        assert_eq!(
            html_to_text(html),
            "Fractions\n\nA fraction is part of a whole.\n1/2 < 3/4"
        );
    }

    #[test]
    fn test_list_items_get_bullets() {
        let html = "<ul><li>halves</li><li>quarters</li></ul>";
        assert_eq!(html_to_text(html), "• halves\n• quarters");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(html_to_text("  x^2 + y^2 = r^2 "), "x^2 + y^2 = r^2");
        assert_eq!(html_to_text("a<br/>b"), "a\nb");
    }
}
