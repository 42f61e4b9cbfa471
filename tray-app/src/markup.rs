// SPDX-License-Identifier: GPL-3.0-only

//! Tooltip text in the small HTML subset tray hosts render.

/// Escape `&`, `<` and `>` for embedding in markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `<name> <tt><root></tt>`, each part escaped on its own.
pub fn tooltip_markup(name: &str, root: &str) -> String {
    format!("{} <tt>{}</tt>", escape_markup(name), escape_markup(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_and_path() {
        assert_eq!(
            tooltip_markup("USB Drive", "/media/usb0"),
            "USB Drive <tt>/media/usb0</tt>"
        );
    }

    #[test]
    fn special_characters_are_escaped_independently() {
        assert_eq!(
            tooltip_markup("Tom & Jerry <backup>", "/media/a&b"),
            "Tom &amp; Jerry &lt;backup&gt; <tt>/media/a&amp;b</tt>"
        );
    }

    #[test]
    fn entities_and_quotes_in_input() {
        assert_eq!(escape_markup("&amp;"), "&amp;amp;");
        assert_eq!(escape_markup("\"quoted\""), "\"quoted\"");
    }
}
