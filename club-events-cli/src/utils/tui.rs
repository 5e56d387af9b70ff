use std::borrow::Cow;
use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/", " "])
        .template("{msg} {spinner}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Remove HTML tags from text coming out of Google Calendar descriptions.
pub fn strip_html(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    let text = match HTML_TAG.as_ref() {
        Some(tag) => tag.replace_all(input, ""),
        None => Cow::Borrowed(input),
    };
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html(None), "");
        assert_eq!(strip_html(Some("  plain  ")), "plain");
        assert_eq!(
            strip_html(Some("<p>Bring a <b>laptop</b></p><br/>")),
            "Bring a laptop"
        );
        assert_eq!(strip_html(Some("a > b")), "a > b");
        assert_eq!(
            strip_html(Some("Pizza if RSVPs < 30, otherwise snacks")),
            "Pizza if RSVPs < 30, otherwise snacks"
        );
    }
}
